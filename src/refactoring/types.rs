//! # Refactoring System Types
//!
//! The closed set of refactorings and the catalog entries describing them.

use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every refactoring the engine can run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RefactoringKind {
    RemoveRedundantElse,
    FlipIfElse,
    FlipTernary,
    ConvertIfElseToTernary,
    ConvertTernaryToIfElse,
    NegateExpression,
    ExtractVariable,
    InlineVariable,
    RenameSymbol,
}

impl RefactoringKind {
    pub fn all() -> &'static [RefactoringKind] {
        &[
            RefactoringKind::RemoveRedundantElse,
            RefactoringKind::FlipIfElse,
            RefactoringKind::FlipTernary,
            RefactoringKind::ConvertIfElseToTernary,
            RefactoringKind::ConvertTernaryToIfElse,
            RefactoringKind::NegateExpression,
            RefactoringKind::ExtractVariable,
            RefactoringKind::InlineVariable,
            RefactoringKind::RenameSymbol,
        ]
    }

    /// Identifier used by the catalog and the `refactor` tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefactoringKind::RemoveRedundantElse => "remove_redundant_else",
            RefactoringKind::FlipIfElse => "flip_if_else",
            RefactoringKind::FlipTernary => "flip_ternary",
            RefactoringKind::ConvertIfElseToTernary => "convert_if_else_to_ternary",
            RefactoringKind::ConvertTernaryToIfElse => "convert_ternary_to_if_else",
            RefactoringKind::NegateExpression => "negate_expression",
            RefactoringKind::ExtractVariable => "extract_variable",
            RefactoringKind::InlineVariable => "inline_variable",
            RefactoringKind::RenameSymbol => "rename_symbol",
        }
    }
}

impl fmt::Display for RefactoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefactoringKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        RefactoringKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown refactoring: {s}")))
    }
}

/// Catalog entry describing a refactoring to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactoringDefinition {
    pub id: RefactoringKind,

    /// Human-readable name
    pub name: String,

    pub category: RefactoringCategory,

    pub description: String,

    /// Languages this refactoring supports
    pub supported_languages: Vec<String>,

    pub complexity: RefactoringComplexity,

    /// Whether the refactoring hands a step over to the editor
    #[serde(default)]
    pub interactive: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<RefactoringExample>,
}

impl RefactoringDefinition {
    pub fn supports(&self, language: &str) -> bool {
        self.supported_languages
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(language))
    }
}

/// Category of refactoring operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RefactoringCategory {
    SimplifyingConditionals,
    ComposingMethods,
    OrganizingCode,
}

/// Complexity level of refactoring
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RefactoringComplexity {
    Simple,
    Moderate,
    Complex,
}

/// Code before and after the refactoring runs at the marked selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactoringExample {
    pub before: String,
    pub after: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in RefactoringKind::all() {
            assert_eq!(kind.as_str().parse::<RefactoringKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_kind_parsing_is_lenient() {
        assert_eq!(
            "Flip-If-Else".parse::<RefactoringKind>().unwrap(),
            RefactoringKind::FlipIfElse
        );
        assert!("extract_method".parse::<RefactoringKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&RefactoringKind::ConvertTernaryToIfElse).unwrap();
        assert_eq!(json, "\"convert_ternary_to_if_else\"");
    }
}
