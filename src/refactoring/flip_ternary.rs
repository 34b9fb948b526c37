//! `C ? X : Y` becomes `!C ? Y : X`.

use super::negation::negate;
use super::{Transformation, write_or_refuse};
use crate::editor::{Editor, ErrorReason, Selection};
use crate::errors::ServiceError;
use crate::syntax::javascript::{self, Precedence, TERNARY};
use crate::syntax::{SyntaxTree, TextEdit, locate_kind};

pub async fn flip_ternary(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    write_or_refuse(code, transform(&tree, selection), editor).await
}

pub fn transform(tree: &SyntaxTree, selection: Selection) -> Transformation {
    let target =
        locate_kind(tree, selection, &[TERNARY]).ok_or(ErrorReason::DidNotFoundTernaryToFlip)?;
    let parts =
        javascript::ternary_parts(tree, target).ok_or(ErrorReason::DidNotFoundTernaryToFlip)?;

    // the condition of a ternary must bind tighter than the ternary itself
    let condition = negate(tree, parts.condition).wrapped_for(Precedence::Binary(1));

    Ok(vec![
        TextEdit::replace(tree.range(parts.condition), condition),
        TextEdit::replace(tree.range(parts.consequence), tree.text(parts.alternative)),
        TextEdit::replace(tree.range(parts.alternative), tree.text(parts.consequence)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::apply_text_edits;
    use ast_grep_language::SupportLang as Language;

    fn apply(code: &str, selection: Selection) -> Result<String, ErrorReason> {
        let tree = SyntaxTree::parse(code, Language::JavaScript).unwrap();
        transform(&tree, selection).map(|edits| apply_text_edits(code, edits).unwrap())
    }

    #[test]
    fn test_flips_ternary() {
        let code = "const label = isActive ? \"on\" : \"off\";";
        let result = apply(code, Selection::cursor_at(0, 20)).unwrap();
        assert_eq!(result, "const label = !isActive ? \"off\" : \"on\";");
    }

    #[test]
    fn test_flips_innermost_ternary() {
        let code = "const x = a ? (b ? 1 : 2) : 3;";
        let result = apply(code, Selection::cursor_at(0, 16)).unwrap();
        assert_eq!(result, "const x = a ? (!b ? 2 : 1) : 3;");
    }

    #[test]
    fn test_flip_twice_restores_code() {
        let code = "return count > 0 ? items : [];";
        let code = format!("function f() {{\n  {code}\n}}");
        let once = apply(&code, Selection::cursor_at(1, 10)).unwrap();
        assert!(once.contains("count <= 0 ? [] : items"));
        let twice = apply(&once, Selection::cursor_at(1, 10)).unwrap();
        assert_eq!(twice, code);
    }

    #[test]
    fn test_refuses_without_ternary() {
        assert_eq!(
            apply("const x = a;", Selection::cursor_at(0, 6)),
            Err(ErrorReason::DidNotFoundTernaryToFlip)
        );
    }
}
