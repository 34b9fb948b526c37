//! # Refactoring System
//!
//! One module per refactoring. Each exposes a pure `transform` computing
//! byte-range edits (or a refusal) from a parsed snapshot, and an async entry
//! point with the uniform signature `(code, selection, editor)` that hands the
//! result to the [`Editor`].

pub mod catalog;
pub mod convert_if_else_to_ternary;
pub mod convert_ternary_to_if_else;
pub mod engine;
pub mod extract_variable;
pub mod flip_if_else;
pub mod flip_ternary;
pub mod inline_variable;
pub mod negate_expression;
pub mod negation;
pub mod remove_redundant_else;
pub mod rename_symbol;
pub mod scope_analysis;
pub mod types;

pub use catalog::RefactoringCatalog;
pub use engine::{execute, execute_safely};
pub use types::{RefactoringCategory, RefactoringDefinition, RefactoringKind};

use crate::editor::{Edit, Editor, ErrorReason};
use crate::errors::ServiceError;
use crate::syntax::{SyntaxTree, TextEdit, apply_text_edits};
use std::ops::Range;
use tracing::{debug, warn};

/// Result of the pure part of a refactoring.
pub type Transformation = Result<Vec<TextEdit>, ErrorReason>;

/// Replace the whole buffer with the edited code, or report the refusal.
pub(crate) async fn write_or_refuse(
    code: &str,
    transformation: Transformation,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    match transformation {
        Ok(edits) => {
            let new_code = apply_text_edits(code, edits)?;
            editor.write(new_code).await
        }
        Err(reason) => {
            editor.show_error_message(reason).await;
            Ok(())
        }
    }
}

/// Hand the edits to [`Editor::read_then_write`], reading the span they cover.
///
/// The edits are byte ranges of the parsed snapshot; they are only applied if
/// the text read back still matches it.
pub(crate) async fn read_then_write_or_refuse(
    tree: &SyntaxTree,
    transformation: Transformation,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    let edits = match transformation {
        Ok(edits) => edits,
        Err(reason) => {
            editor.show_error_message(reason).await;
            return Ok(());
        }
    };
    let Some(covered) = covering_range(&edits) else {
        return Ok(());
    };

    let source = tree.source();
    let index = tree.line_index();
    let expected = source[covered.clone()].to_string();
    let selection = index.selection(source, covered);
    let edits: Vec<Edit> = edits
        .iter()
        .map(|edit| edit.to_edit(source, index))
        .collect();
    debug!("Writing {} edits within {}", edits.len(), selection);
    editor
        .read_then_write(
            selection,
            Box::new(move |read: &str| {
                if read == expected {
                    edits
                } else {
                    warn!("Buffer changed at {}, edits dropped", selection);
                    Vec::new()
                }
            }),
        )
        .await
}

fn covering_range(edits: &[TextEdit]) -> Option<Range<usize>> {
    let start = edits.iter().map(|edit| edit.range.start).min()?;
    let end = edits.iter().map(|edit| edit.range.end).max()?;
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::InMemoryEditor;
    use ast_grep_language::SupportLang as Language;

    #[tokio::test]
    async fn test_read_then_write_applies_edits_on_unchanged_buffer() {
        let code = "const x = a ? b : c;";
        let tree = SyntaxTree::parse(code, Language::JavaScript).unwrap();
        let editor = InMemoryEditor::new(code, Language::JavaScript);

        let edits = vec![TextEdit::replace(14..15, "d")];
        read_then_write_or_refuse(&tree, Ok(edits), &editor).await.unwrap();
        assert_eq!(editor.code(), "const x = a ? d : c;");
    }

    #[tokio::test]
    async fn test_read_then_write_drops_edits_when_buffer_changed() {
        let snapshot = "const x = a ? b : c;";
        let tree = SyntaxTree::parse(snapshot, Language::JavaScript).unwrap();
        let editor = InMemoryEditor::new("const x = a ? e : c;", Language::JavaScript);

        let edits = vec![TextEdit::replace(14..15, "d")];
        read_then_write_or_refuse(&tree, Ok(edits), &editor).await.unwrap();
        assert_eq!(editor.code(), "const x = a ? e : c;");
        assert_eq!(editor.write_count(), 0);
    }

    #[tokio::test]
    async fn test_refusal_is_shown_without_writing() {
        let code = "a;";
        let editor = InMemoryEditor::new(code, Language::JavaScript);
        write_or_refuse(code, Err(ErrorReason::DidNotFoundTernaryToFlip), &editor)
            .await
            .unwrap();
        assert_eq!(editor.error_reasons(), vec![ErrorReason::DidNotFoundTernaryToFlip]);
        assert_eq!(editor.write_count(), 0);
    }
}
