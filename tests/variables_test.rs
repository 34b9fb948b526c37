mod common;

use abracadabra::editor::{DelegateAction, ErrorReason, InMemoryEditor, Selection};
use abracadabra::refactoring::RefactoringKind;
use ast_grep_language::SupportLang as Language;
use common::{assert_refused, run, run_with};

const COLLIDING: &str = "const extracted = 1;\nlog(a + b);";

#[tokio::test]
async fn test_extract_variable() {
    let code = "console.log(\"Hello!\");";
    let editor = run(RefactoringKind::ExtractVariable, code, Selection::cursor_at(0, 14)).await;
    assert_eq!(
        editor.code(),
        "const extracted = \"Hello!\";\nconsole.log(extracted);"
    );
    assert!(editor.delegated_actions().is_empty());
}

#[tokio::test]
async fn test_extract_variable_uses_proposed_name() {
    let code = "function area(r) {\n  return 3.14159 * r * r;\n}";
    let editor = InMemoryEditor::new(code, Language::JavaScript).with_proposed_variable_name("pi");
    let editor = run_with(
        editor,
        RefactoringKind::ExtractVariable,
        Selection::new((1, 9), (1, 16)),
    )
    .await;
    assert_eq!(
        editor.code(),
        "function area(r) {\n  const pi = 3.14159;\n  return pi * r * r;\n}"
    );
}

#[tokio::test]
async fn test_extract_variable_asks_for_a_name_on_collision() {
    let editor =
        InMemoryEditor::new(COLLIDING, Language::JavaScript).with_variable_name_answer("sum");
    let editor = run_with(
        editor,
        RefactoringKind::ExtractVariable,
        Selection::cursor_at(1, 6),
    )
    .await;

    assert_eq!(
        editor.code(),
        "const extracted = 1;\nconst sum = a + b;\nlog(sum);"
    );
    let delegated = editor.delegated_actions();
    assert_eq!(delegated.len(), 1);
    assert!(matches!(
        &delegated[0],
        DelegateAction::ChooseVariableName { proposed, taken }
            if proposed == "extracted" && taken.contains(&"extracted".to_string())
    ));
}

#[tokio::test]
async fn test_extract_variable_cancelled_naming_changes_nothing() {
    let editor = run(
        RefactoringKind::ExtractVariable,
        COLLIDING,
        Selection::cursor_at(1, 6),
    )
    .await;
    assert_eq!(editor.code(), COLLIDING);
    assert_eq!(editor.write_count(), 0);
    assert!(editor.error_reasons().is_empty());
    assert_eq!(editor.delegated_actions().len(), 1);
}

#[tokio::test]
async fn test_extract_variable_rejects_invalid_name() {
    let editor =
        InMemoryEditor::new(COLLIDING, Language::JavaScript).with_variable_name_answer("2fast");
    let editor = run_with(
        editor,
        RefactoringKind::ExtractVariable,
        Selection::cursor_at(1, 6),
    )
    .await;
    assert_refused(&editor, COLLIDING, ErrorReason::InvalidVariableName);
}

#[tokio::test]
async fn test_extract_variable_rejects_name_in_scope() {
    let editor =
        InMemoryEditor::new(COLLIDING, Language::JavaScript).with_variable_name_answer("a");
    let editor = run_with(
        editor,
        RefactoringKind::ExtractVariable,
        Selection::cursor_at(1, 6),
    )
    .await;
    assert_refused(&editor, COLLIDING, ErrorReason::VariableNameAlreadyInScope);
}

#[tokio::test]
async fn test_extract_variable_invalid_proposed_name_asks_for_another() {
    let code = "log(a + b);";
    let editor = InMemoryEditor::new(code, Language::JavaScript)
        .with_proposed_variable_name("my-sum")
        .with_variable_name_answer("total");
    let editor = run_with(
        editor,
        RefactoringKind::ExtractVariable,
        Selection::cursor_at(0, 6),
    )
    .await;
    assert_eq!(editor.code(), "const total = a + b;\nlog(total);");
}

#[tokio::test]
async fn test_extract_variable_refuses_bare_identifier() {
    let code = "let total = count;";
    let editor = run(RefactoringKind::ExtractVariable, code, Selection::cursor_at(0, 14)).await;
    assert_refused(&editor, code, ErrorReason::DidNotFoundExtractableCode);
}

#[tokio::test]
async fn test_extract_variable_refuses_braceless_loop_body() {
    let code = "for (const item of items) console.log(item.name);";
    let editor = run(RefactoringKind::ExtractVariable, code, Selection::new((0, 38), (0, 47))).await;
    assert_refused(&editor, code, ErrorReason::DidNotFoundExtractableCode);
}

#[tokio::test]
async fn test_extract_variable_refuses_braceless_if_body() {
    let code = "if (user) send(user.name);";
    let editor = run(RefactoringKind::ExtractVariable, code, Selection::new((0, 15), (0, 24))).await;
    assert_refused(&editor, code, ErrorReason::DidNotFoundExtractableCode);
}

#[tokio::test]
async fn test_extract_variable_inside_braced_loop_body() {
    let code = "for (const item of items) {\n  console.log(item.name);\n}";
    let editor = run(RefactoringKind::ExtractVariable, code, Selection::new((1, 14), (1, 23))).await;
    assert_eq!(
        editor.code(),
        "for (const item of items) {\n  const extracted = item.name;\n  console.log(extracted);\n}"
    );
}

#[tokio::test]
async fn test_inline_variable() {
    let code = "const total = price * quantity;\nsend(total + shipping);";
    let editor = run(RefactoringKind::InlineVariable, code, Selection::cursor_at(0, 7)).await;
    assert_eq!(editor.code(), "send(price * quantity + shipping);");
    assert_eq!(editor.write_count(), 1);
}

#[tokio::test]
async fn test_inline_variable_keeps_other_declarators() {
    let code = "function f() {\n  let a = x + 1, b = 2;\n  return a * b;\n}";
    let editor = run(RefactoringKind::InlineVariable, code, Selection::cursor_at(1, 6)).await;
    assert_eq!(
        editor.code(),
        "function f() {\n  let b = 2;\n  return (x + 1) * b;\n}"
    );
}

#[tokio::test]
async fn test_inline_destructured_binding() {
    let code = "const { name, age } = user;\ngreet(name, age);";
    let editor = run(RefactoringKind::InlineVariable, code, Selection::cursor_at(0, 9)).await;
    assert_eq!(editor.code(), "const { age } = user;\ngreet(user.name, age);");
}

#[tokio::test]
async fn test_inline_variable_refuses_reassigned_variable() {
    let code = "let count = 0;\ncount += 1;\nlog(count);";
    let editor = run(RefactoringKind::InlineVariable, code, Selection::cursor_at(0, 5)).await;
    assert_refused(&editor, code, ErrorReason::CantInlineReassignedVariable);
}

#[tokio::test]
async fn test_inline_variable_refuses_shadowed_identifiers() {
    let code = "const greeting = name;\nfunction hello(name) {\n  return greeting;\n}";
    let editor = run(RefactoringKind::InlineVariable, code, Selection::cursor_at(0, 8)).await;
    assert_refused(&editor, code, ErrorReason::InlinedIdentifiersWouldCollide);
}

#[tokio::test]
async fn test_inline_variable_refuses_unused_variable() {
    let code = "const unused = 1;\nlog();";
    let editor = run(RefactoringKind::InlineVariable, code, Selection::cursor_at(0, 8)).await;
    assert_refused(&editor, code, ErrorReason::DidNotFoundInlinableCodeIdentifiers);
}

#[tokio::test]
async fn test_inline_variable_refuses_outside_declaration() {
    let code = "log(value);";
    let editor = run(RefactoringKind::InlineVariable, code, Selection::cursor_at(0, 5)).await;
    assert_refused(&editor, code, ErrorReason::DidNotFoundInlinableCode);
}

#[tokio::test]
async fn test_rename_symbol_is_delegated() {
    let code = "const a = 1;";
    let editor = run(RefactoringKind::RenameSymbol, code, Selection::cursor_at(0, 6)).await;
    assert_eq!(
        editor.delegated_actions(),
        vec![DelegateAction::RenameSymbol {
            selection: Selection::cursor_at(0, 6)
        }]
    );
    assert_eq!(editor.code(), code);
}
