//! Rename is left to the host, which knows every file the symbol appears in.

use crate::editor::{DelegateAction, DelegateResult, Editor, Selection};
use crate::errors::ServiceError;
use tracing::debug;

pub async fn rename_symbol(
    _code: &str,
    selection: Selection,
    editor: &dyn Editor,
) -> Result<(), ServiceError> {
    match editor
        .delegate(DelegateAction::RenameSymbol { selection })
        .await?
    {
        DelegateResult::Cancelled => debug!("Rename at {} cancelled", selection),
        DelegateResult::Done | DelegateResult::Named(_) => {
            debug!("Rename at {} handled by the editor", selection)
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::InMemoryEditor;
    use ast_grep_language::SupportLang as Language;

    #[tokio::test]
    async fn test_delegates_to_editor() {
        let editor = InMemoryEditor::new("const a = 1;", Language::JavaScript)
            .with_rename_answer(DelegateResult::Done);
        let selection = Selection::cursor_at(0, 6);
        rename_symbol(&editor.code(), selection, &editor).await.unwrap();

        assert_eq!(
            editor.delegated_actions(),
            vec![DelegateAction::RenameSymbol { selection }]
        );
        assert_eq!(editor.write_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_rename_is_not_an_error() {
        let editor = InMemoryEditor::new("const a = 1;", Language::JavaScript);
        let result = rename_symbol(&editor.code(), Selection::cursor_at(0, 6), &editor).await;
        assert!(result.is_ok());
        assert_eq!(editor.code(), "const a = 1;");
    }
}
