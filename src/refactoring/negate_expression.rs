//! Rewrite a boolean expression as the negation of its negation.
//!
//! `a && b` becomes `!(!a || !b)` and `!(a === b)` becomes `a !== b`: the
//! code keeps its meaning while the logic is inverted.

use super::negation::negate;
use super::{Transformation, read_then_write_or_refuse};
use crate::editor::{Editor, ErrorReason, Selection};
use crate::errors::ServiceError;
use crate::syntax::javascript::{self, PARENTHESIZED, Precedence, needs_parens_in};
use crate::syntax::{NodeId, SyntaxTree, TextEdit, locate};

pub async fn negate_expression(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    read_then_write_or_refuse(&tree, transform(&tree, selection), editor).await
}

pub fn transform(tree: &SyntaxTree, selection: Selection) -> Transformation {
    let found = locate(tree, selection, is_negatable)
        .ok_or(ErrorReason::DidNotFoundNegatableExpression)?;
    let target = enclosing_not(tree, found).unwrap_or(found);

    let (text, precedence) = match javascript::logical_not_argument(tree, target) {
        Some(argument) => {
            let negation = negate(tree, argument);
            (negation.text, negation.precedence)
        }
        None => (
            format!("!({})", negate(tree, target).text),
            Precedence::Unary,
        ),
    };
    let text = if needs_parens_in(tree, target, precedence) {
        format!("({text})")
    } else {
        text
    };
    Ok(vec![TextEdit::replace(tree.range(target), text)])
}

/// A comparison, a logical expression, or the `!` of one of those.
fn is_negatable(tree: &SyntaxTree, id: NodeId) -> bool {
    if javascript::is_comparison_or_logical(tree, id) {
        return true;
    }
    javascript::logical_not_argument(tree, id).is_some_and(|argument| {
        javascript::is_comparison_or_logical(tree, javascript::unparenthesized(tree, argument))
    })
}

/// The `!` directly applied to `id`, parentheses aside.
fn enclosing_not(tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
    let mut current = tree.parent(id)?;
    while tree.kind(current) == PARENTHESIZED {
        current = tree.parent(current)?;
    }
    javascript::logical_not_argument(tree, current).map(|_| current)
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
    fn test_negates_comparison() {
        let code = "if (a == b) {}";
        assert_eq!(apply(code, Selection::cursor_at(0, 5)).unwrap(), "if (!(a != b)) {}");
    }

    #[test]
    fn test_negates_logical_expression() {
        let code = "if (isValid && count > 0) {}";
        assert_eq!(
            apply(code, Selection::cursor_at(0, 4)).unwrap(),
            "if (!(!isValid || count <= 0)) {}"
        );
    }

    #[test]
    fn test_removes_existing_negation() {
        let code = "const ok = !(a === b);";
        assert_eq!(apply(code, Selection::cursor_at(0, 15)).unwrap(), "const ok = a !== b;");
    }

    #[test]
    fn test_parenthesises_in_tighter_context() {
        let code = "const ok = !(a && b) && c;";
        assert_eq!(
            apply(code, Selection::cursor_at(0, 13)).unwrap(),
            "const ok = (!a || !b) && c;"
        );
    }

    #[test]
    fn test_refuses_non_boolean_expression() {
        assert_eq!(
            apply("const total = a + b;", Selection::cursor_at(0, 15)),
            Err(ErrorReason::DidNotFoundNegatableExpression)
        );
        assert_eq!(
            apply("if (!isValid) {}", Selection::cursor_at(0, 6)),
            Err(ErrorReason::DidNotFoundNegatableExpression)
        );
    }
}
