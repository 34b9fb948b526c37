//! Editor adapter backed by a string buffer.
//!
//! Used by the MCP server for each tool call and by the test suites, which
//! inspect the recorded writes, refusals and delegated steps.

use super::adapter::{Code, ComputeEdits, DelegateAction, DelegateResult, Editor};
use super::error_reason::ErrorReason;
use super::selection::Selection;
use crate::errors::ServiceError;
use crate::syntax::text::{LineIndex, apply_edits};
use ast_grep_language::SupportLang as Language;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug)]
struct State {
    code: String,
    writes: usize,
    error_reasons: Vec<ErrorReason>,
    delegated: Vec<DelegateAction>,
}

#[derive(Debug)]
pub struct InMemoryEditor {
    language: Language,
    proposed_variable_name: Option<String>,
    /// Answer to `ChooseVariableName`; `None` cancels.
    variable_name_answer: Option<String>,
    rename_answer: DelegateResult,
    state: Mutex<State>,
}

impl InMemoryEditor {
    pub fn new(code: impl Into<String>, language: Language) -> Self {
        Self {
            language,
            proposed_variable_name: None,
            variable_name_answer: None,
            rename_answer: DelegateResult::Cancelled,
            state: Mutex::new(State {
                code: code.into(),
                writes: 0,
                error_reasons: Vec::new(),
                delegated: Vec::new(),
            }),
        }
    }

    pub fn with_proposed_variable_name(mut self, name: impl Into<String>) -> Self {
        self.proposed_variable_name = Some(name.into());
        self
    }

    /// Name returned when asked to choose a variable name.
    pub fn with_variable_name_answer(mut self, name: impl Into<String>) -> Self {
        self.variable_name_answer = Some(name.into());
        self
    }

    pub fn with_rename_answer(mut self, answer: DelegateResult) -> Self {
        self.rename_answer = answer;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn code(&self) -> Code {
        self.state().code.clone()
    }

    /// Number of successful buffer mutations.
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    pub fn error_reasons(&self) -> Vec<ErrorReason> {
        self.state().error_reasons.clone()
    }

    pub fn last_error_reason(&self) -> Option<ErrorReason> {
        self.state().error_reasons.last().copied()
    }

    pub fn delegated_actions(&self) -> Vec<DelegateAction> {
        self.state().delegated.clone()
    }
}

#[async_trait]
impl Editor for InMemoryEditor {
    fn language(&self) -> Language {
        self.language
    }

    fn proposed_variable_name(&self) -> String {
        self.proposed_variable_name
            .clone()
            .unwrap_or_else(|| super::DEFAULT_VARIABLE_NAME.to_string())
    }

    async fn write(&self, code: Code) -> Result<(), ServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ServiceError::Adapter("buffer lock poisoned".to_string()))?;
        state.code = code;
        state.writes += 1;
        Ok(())
    }

    async fn read_then_write(
        &self,
        selection: Selection,
        compute: ComputeEdits,
    ) -> Result<(), ServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ServiceError::Adapter("buffer lock poisoned".to_string()))?;

        let index = LineIndex::new(&state.code);
        let range = index.range(&state.code, selection);
        let edits = compute(&state.code[range]);
        if edits.is_empty() {
            return Ok(());
        }

        debug!("Applying {} edits read at {}", edits.len(), selection);
        state.code = apply_edits(&state.code, &edits)?;
        state.writes += 1;
        Ok(())
    }

    async fn show_error_message(&self, reason: ErrorReason) {
        debug!("Refused: {}", reason);
        self.state().error_reasons.push(reason);
    }

    async fn delegate(&self, action: DelegateAction) -> Result<DelegateResult, ServiceError> {
        let result = match &action {
            DelegateAction::RenameSymbol { .. } => self.rename_answer.clone(),
            DelegateAction::ChooseVariableName { .. } => match &self.variable_name_answer {
                Some(name) => DelegateResult::Named(name.clone()),
                None => DelegateResult::Cancelled,
            },
        };
        self.state().delegated.push(action);
        Ok(result)
    }
}
