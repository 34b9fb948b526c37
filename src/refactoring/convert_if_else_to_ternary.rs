//! Collapse an if/else whose branches return, throw or assign the same
//! target into a single statement with a ternary.

use super::{Transformation, write_or_refuse};
use crate::editor::{Editor, ErrorReason, Selection};
use crate::errors::ServiceError;
use crate::syntax::javascript::{
    self, EXPRESSION_STATEMENT, Precedence, RETURN, THROW, precedence_of,
};
use crate::syntax::{NodeId, SyntaxTree, TextEdit, locate};

pub async fn convert_if_else_to_ternary(
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let tree = SyntaxTree::parse(code, editor.language())?;
    write_or_refuse(code, transform(&tree, selection), editor).await
}

pub fn transform(tree: &SyntaxTree, selection: Selection) -> Transformation {
    let target = locate(tree, selection, |tree, id| ternary_statement(tree, id).is_some())
        .ok_or(ErrorReason::DidNotFoundIfElseToConvert)?;
    let replacement =
        ternary_statement(tree, target).ok_or(ErrorReason::DidNotFoundIfElseToConvert)?;
    Ok(vec![TextEdit::replace(tree.range(target), replacement)])
}

/// The statement replacing the if/else at `id`, when its branches match.
fn ternary_statement(tree: &SyntaxTree, id: NodeId) -> Option<String> {
    let parts = javascript::if_parts(tree, id)?;
    let consequence = javascript::single_statement(tree, parts.consequence)?;
    let alternative = javascript::single_statement(tree, parts.alternative?)?;
    let condition = tree.nth_significant(parts.condition, 0)?;

    let condition_text = if precedence_of(tree, condition) <= Precedence::Conditional {
        format!("({})", tree.text(condition))
    } else {
        tree.text(condition).to_string()
    };
    let ternary = |yes: NodeId, no: NodeId| {
        format!(
            "{condition_text} ? {} : {}",
            branch_text(tree, yes),
            branch_text(tree, no)
        )
    };

    match (tree.kind(consequence), tree.kind(alternative)) {
        (RETURN, RETURN) | (THROW, THROW) => {
            let keyword = if tree.kind(consequence) == RETURN {
                "return"
            } else {
                "throw"
            };
            let yes = tree.nth_significant(consequence, 0)?;
            let no = tree.nth_significant(alternative, 0)?;
            Some(format!("{keyword} {};", ternary(yes, no)))
        }
        (EXPRESSION_STATEMENT, EXPRESSION_STATEMENT) => {
            let (target, operator, yes) =
                javascript::assignment_parts(tree, tree.nth_significant(consequence, 0)?)?;
            let (other_target, other_operator, no) =
                javascript::assignment_parts(tree, tree.nth_significant(alternative, 0)?)?;
            if operator != other_operator || tree.text(target) != tree.text(other_target) {
                return None;
            }
            Some(format!(
                "{} {operator} {};",
                tree.text(target),
                ternary(yes, no)
            ))
        }
        _ => None,
    }
}

fn branch_text(tree: &SyntaxTree, id: NodeId) -> String {
    if precedence_of(tree, id) < Precedence::Assignment {
        format!("({})", tree.text(id))
    } else {
        tree.text(id).to_string()
    }
}
