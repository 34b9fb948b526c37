// Common test utilities
#![allow(dead_code)]

use abracadabra::editor::{InMemoryEditor, Selection};
use abracadabra::refactoring::{RefactoringKind, execute};
use ast_grep_language::SupportLang as Language;

/// Run `kind` on JavaScript `code` and return the editor holding the result.
pub async fn run(kind: RefactoringKind, code: &str, selection: Selection) -> InMemoryEditor {
    run_with(InMemoryEditor::new(code, Language::JavaScript), kind, selection).await
}

pub async fn run_typescript(
    kind: RefactoringKind,
    code: &str,
    selection: Selection,
) -> InMemoryEditor {
    run_with(InMemoryEditor::new(code, Language::TypeScript), kind, selection).await
}

pub async fn run_with(
    editor: InMemoryEditor,
    kind: RefactoringKind,
    selection: Selection,
) -> InMemoryEditor {
    let code = editor.code();
    execute(kind, &code, selection, &editor)
        .await
        .unwrap_or_else(|e| panic!("{kind} failed: {e}"));
    editor
}

/// Assert the refactoring refused with `reason` and left the code alone.
pub fn assert_refused(editor: &InMemoryEditor, code: &str, reason: abracadabra::ErrorReason) {
    assert_eq!(editor.error_reasons(), vec![reason]);
    assert_eq!(editor.write_count(), 0);
    assert_eq!(editor.code(), code);
}
