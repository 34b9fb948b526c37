use crate::editor::{DelegateAction, ErrorReason, Position, Selection};
use crate::refactoring::RefactoringDefinition;
use serde::{Deserialize, Serialize};

/// 0-based position as sent by MCP clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostPosition {
    pub line: usize,
    pub character: usize,
}

impl From<HostPosition> for Position {
    fn from(position: HostPosition) -> Self {
        Position::new(position.line, position.character)
    }
}

/// Cursor (`end` omitted) or range selected by the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostSelection {
    pub start: HostPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<HostPosition>,
}

impl From<HostSelection> for Selection {
    fn from(selection: HostSelection) -> Self {
        let start = Position::from(selection.start);
        let end = selection.end.map_or(start, Position::from);
        Selection::from_positions(start, end)
    }
}

// Refactoring types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorParam {
    /// Refactoring id, e.g. `flip_if_else`
    pub refactoring: String,
    pub code: String,
    /// Defaults to the configured language
    #[serde(default)]
    pub language: Option<String>,
    pub selection: HostSelection,
    /// Name for `extract_variable` when the proposed one is taken
    #[serde(default)]
    pub variable_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefactorResult {
    pub refactoring: String,
    /// Whether the code was modified
    pub applied: bool,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<ErrorReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Steps the client has to carry out itself, such as a rename
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delegated: Vec<DelegateAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRefactoringsParam {
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListRefactoringsResult {
    pub refactorings: Vec<RefactoringDefinition>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListLanguagesResult {
    pub languages: Vec<String>,
}

// AST generation types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAstParam {
    pub code: String,
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateAstResult {
    pub ast: String,
    pub language: String,
    pub code_length: usize,
    pub node_kinds: Vec<String>,
    /// Position of the first syntax error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_at: Option<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refactor_param_with_cursor() {
        let json = serde_json::json!({
            "refactoring": "flip_if_else",
            "code": "if (a) {} else {}",
            "selection": { "start": { "line": 0, "character": 4 } }
        });
        let param: RefactorParam = serde_json::from_value(json).unwrap();
        assert!(param.language.is_none());
        assert!(param.variable_name.is_none());

        let selection = Selection::from(param.selection);
        assert!(selection.is_empty());
        assert_eq!(selection.start(), Position::new(0, 4));
    }

    #[test]
    fn test_reversed_host_selection_is_normalised() {
        let selection = Selection::from(HostSelection {
            start: HostPosition { line: 2, character: 1 },
            end: Some(HostPosition { line: 0, character: 3 }),
        });
        assert_eq!(selection.start(), Position::new(0, 3));
        assert_eq!(selection.end(), Position::new(2, 1));
    }

    #[test]
    fn test_refactor_result_omits_empty_fields() {
        let result = RefactorResult {
            refactoring: "flip_ternary".to_string(),
            applied: true,
            code: "x".to_string(),
            error_reason: None,
            message: None,
            delegated: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error_reason").is_none());
        assert!(json.get("delegated").is_none());
    }

    #[test]
    fn test_refactor_result_serializes_reason_snake_case() {
        let result = RefactorResult {
            refactoring: "flip_ternary".to_string(),
            applied: false,
            code: "x".to_string(),
            error_reason: Some(ErrorReason::DidNotFoundTernaryToFlip),
            message: Some(ErrorReason::DidNotFoundTernaryToFlip.message().to_string()),
            delegated: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error_reason"], "did_not_found_ternary_to_flip");
    }
}
