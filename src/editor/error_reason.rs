use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a refactoring refused to run at the given selection.
///
/// Refusals are the normal outcome of a non-matching selection. They are
/// reported through [`Editor::show_error_message`](super::Editor::show_error_message),
/// never raised as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    DidNotFoundRedundantElse,
    DidNotFoundIfElseToFlip,
    DidNotFoundTernaryToFlip,
    DidNotFoundIfElseToConvert,
    DidNotFoundTernaryToConvert,
    DidNotFoundNegatableExpression,
    DidNotFoundExtractableCode,
    DidNotFoundInlinableCode,
    DidNotFoundInlinableCodeIdentifiers,
    InlinedIdentifiersWouldCollide,
    CantInlineReassignedVariable,
    VariableNameAlreadyInScope,
    InvalidVariableName,
}

impl ErrorReason {
    /// Message shown to the user by hosts that display refusals.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorReason::DidNotFoundRedundantElse => {
                "I didn't find a redundant else in the current selection"
            }
            ErrorReason::DidNotFoundIfElseToFlip => {
                "I didn't find an if/else statement to flip in the current selection"
            }
            ErrorReason::DidNotFoundTernaryToFlip => {
                "I didn't find a ternary to flip in the current selection"
            }
            ErrorReason::DidNotFoundIfElseToConvert => {
                "I didn't find an if/else with matching branches to convert into a ternary"
            }
            ErrorReason::DidNotFoundTernaryToConvert => {
                "I didn't find a ternary I can convert into an if/else statement"
            }
            ErrorReason::DidNotFoundNegatableExpression => {
                "I didn't find a boolean expression to negate in the current selection"
            }
            ErrorReason::DidNotFoundExtractableCode => {
                "I didn't find an expression to extract in the current selection"
            }
            ErrorReason::DidNotFoundInlinableCode => {
                "I didn't find a variable declaration to inline in the current selection"
            }
            ErrorReason::DidNotFoundInlinableCodeIdentifiers => {
                "I found a declaration, but no identifier I can safely inline"
            }
            ErrorReason::InlinedIdentifiersWouldCollide => {
                "Inlining would make identifiers of the initializer refer to other variables"
            }
            ErrorReason::CantInlineReassignedVariable => {
                "This variable is reassigned, inlining it would change the behaviour"
            }
            ErrorReason::VariableNameAlreadyInScope => {
                "This name is already used in the current scope"
            }
            ErrorReason::InvalidVariableName => "This is not a valid variable name",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
