//! Swap the branches of an if/else and negate its condition.

use super::negation::negate;
use super::{Transformation, write_or_refuse};
use crate::editor::{Editor, ErrorReason, Selection};
use crate::errors::ServiceError;
use crate::syntax::javascript::{self, IF_STATEMENT};
use crate::syntax::text::{detect_indent_unit, indentation_at, reindent};
use crate::syntax::{NodeId, SyntaxTree, TextEdit, locate};

pub async fn flip_if_else(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    write_or_refuse(code, transform(&tree, selection), editor).await
}

pub fn transform(tree: &SyntaxTree, selection: Selection) -> Transformation {
    let target = locate(tree, selection, has_else).ok_or(ErrorReason::DidNotFoundIfElseToFlip)?;
    let parts = javascript::if_parts(tree, target).ok_or(ErrorReason::DidNotFoundIfElseToFlip)?;
    let alternative = parts
        .alternative
        .ok_or(ErrorReason::DidNotFoundIfElseToFlip)?;
    let condition = tree
        .nth_significant(parts.condition, 0)
        .ok_or(ErrorReason::DidNotFoundIfElseToFlip)?;

    let source = tree.source();
    let indent = indentation_at(source, tree.range(target).start);

    // an `else if` moved into the consequence slot would capture our `else`
    let new_consequence = if tree.kind(alternative) == IF_STATEMENT {
        let unit = detect_indent_unit(source);
        let inner_indent = format!("{indent}{unit}");
        format!(
            "{{\n{inner_indent}{}\n{indent}}}",
            reindent(tree.text(alternative), indent, &inner_indent)
        )
    } else {
        tree.text(alternative).to_string()
    };

    Ok(vec![
        TextEdit::replace(tree.range(condition), negate(tree, condition).text),
        TextEdit::replace(tree.range(parts.consequence), new_consequence),
        TextEdit::replace(tree.range(alternative), tree.text(parts.consequence)),
    ])
}

fn has_else(tree: &SyntaxTree, id: NodeId) -> bool {
    javascript::if_parts(tree, id).is_some_and(|parts| parts.alternative.is_some())
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
    fn test_flips_branches_and_condition() {
        let code = "if (a > b) {\n  first();\n} else {\n  second();\n}";
        let result = apply(code, Selection::cursor_at(0, 0)).unwrap();
        assert_eq!(result, "if (a <= b) {\n  second();\n} else {\n  first();\n}");
    }

    #[test]
    fn test_else_if_is_wrapped_in_a_block() {
        let code = "if (a) {\n  one();\n} else if (b) {\n  two();\n}";
        let result = apply(code, Selection::cursor_at(0, 1)).unwrap();
        assert_eq!(
            result,
            "if (!a) {\n  if (b) {\n    two();\n  }\n} else {\n  one();\n}"
        );
    }

    #[test]
    fn test_refuses_if_without_else() {
        assert_eq!(
            apply("if (a) {\n  one();\n}", Selection::cursor_at(0, 0)),
            Err(ErrorReason::DidNotFoundIfElseToFlip)
        );
    }
}
