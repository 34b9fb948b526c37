//! Boundary between the refactoring engine and its host editor.

use super::error_reason::ErrorReason;
use super::selection::Selection;
use crate::errors::ServiceError;
use ast_grep_language::SupportLang as Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Full buffer content at the time a refactoring runs.
pub type Code = String;

/// Name proposed for extracted variables when the host has no preference.
pub const DEFAULT_VARIABLE_NAME: &str = "extracted";

/// Replace the text covered by `selection` with `text`.
///
/// An empty selection inserts. Edits describe a mutation; they carry no I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub selection: Selection,
    pub text: String,
}

impl Edit {
    pub fn new(selection: Selection, text: impl Into<String>) -> Self {
        Self {
            selection,
            text: text.into(),
        }
    }
}

/// Computes the edits to apply from the freshly read text of a selection.
pub type ComputeEdits = Box<dyn FnOnce(&str) -> Vec<Edit> + Send>;

/// Interactive sub-step forwarded to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DelegateAction {
    /// Run the host's own semantic rename at the selection.
    RenameSymbol { selection: Selection },
    /// Ask the user for a variable name, `proposed` being already taken.
    ChooseVariableName {
        proposed: String,
        taken: Vec<String>,
    },
}

/// Outcome of a delegated step. `Cancelled` is a first-class, non-error result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegateResult {
    Done,
    Named(String),
    Cancelled,
}

/// Everything a refactoring needs from its host.
#[async_trait]
pub trait Editor: Send + Sync {
    /// Grammar used to parse the buffer.
    fn language(&self) -> Language;

    /// Name proposed for an extracted variable.
    fn proposed_variable_name(&self) -> String {
        DEFAULT_VARIABLE_NAME.to_string()
    }

    /// Replace the whole buffer. Must be atomic from the caller's view.
    async fn write(&self, code: Code) -> Result<(), ServiceError>;

    /// Read the current text at `selection`, then apply the edits `compute`
    /// derives from it, atomically.
    async fn read_then_write(
        &self,
        selection: Selection,
        compute: ComputeEdits,
    ) -> Result<(), ServiceError>;

    /// Surface a refusal to the user. Never fails.
    async fn show_error_message(&self, reason: ErrorReason);

    /// Forward an interactive step to the host.
    async fn delegate(&self, action: DelegateAction) -> Result<DelegateResult, ServiceError>;
}
