//! # Refactoring Engine
//!
//! Dispatches a [`RefactoringKind`] to its implementation.

use super::types::RefactoringKind;
use super::{
    convert_if_else_to_ternary, convert_ternary_to_if_else, extract_variable, flip_if_else,
    flip_ternary, inline_variable, negate_expression, remove_redundant_else, rename_symbol,
};
use crate::editor::{Editor, Selection};
use crate::errors::ServiceError;
use tracing::{debug, error, info};

/// Run `kind` on `code` at `selection`, reporting through `editor`.
///
/// Refusals are reported with [`Editor::show_error_message`] and return `Ok`.
pub async fn execute(
    kind: RefactoringKind,
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    debug!("Executing {} at {}", kind, selection);
    match kind {
        RefactoringKind::RemoveRedundantElse => {
            remove_redundant_else::remove_redundant_else(code, selection, editor).await
        }
        RefactoringKind::FlipIfElse => flip_if_else::flip_if_else(code, selection, editor).await,
        RefactoringKind::FlipTernary => flip_ternary::flip_ternary(code, selection, editor).await,
        RefactoringKind::ConvertIfElseToTernary => {
            convert_if_else_to_ternary::convert_if_else_to_ternary(code, selection, editor).await
        }
        RefactoringKind::ConvertTernaryToIfElse => {
            convert_ternary_to_if_else::convert_ternary_to_if_else(code, selection, editor).await
        }
        RefactoringKind::NegateExpression => {
            negate_expression::negate_expression(code, selection, editor).await
        }
        RefactoringKind::ExtractVariable => {
            extract_variable::extract_variable(code, selection, editor).await
        }
        RefactoringKind::InlineVariable => {
            inline_variable::inline_variable(code, selection, editor).await
        }
        RefactoringKind::RenameSymbol => rename_symbol::rename_symbol(code, selection, editor).await,
    }
}

/// [`execute`], with cancellation by the host treated as success.
///
/// Other failures are logged and returned; the buffer is left untouched.
pub async fn execute_safely(
    kind: RefactoringKind,
    code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    match execute(kind, code, selection, editor).await {
        Err(err) if err.is_cancellation() => {
            info!("{} cancelled by the editor", kind);
            Ok(())
        }
        Err(err) => {
            error!("{} failed at {}: {}", kind, selection, err);
            Err(err)
        }
        Ok(()) => Ok(()),
    }
}
