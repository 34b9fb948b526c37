//! # Error Types
//!
//! Unexpected failures of the refactoring engine and its hosts.
//!
//! Refusals ("nothing to refactor here") are not errors: they travel as
//! [`ErrorReason`](crate::editor::ErrorReason) through the editor adapter.
//! Everything in this module is a genuine failure that propagates out of a
//! refactoring call and is converted to MCP `ErrorData` at the server boundary.

use rmcp::model::ErrorData;
use std::fmt;

/// Error types that can occur while running a refactoring.
#[derive(Debug)]
pub enum ServiceError {
    /// Source code could not be parsed without syntax errors
    ParserError(String),
    /// Language name not supported by the engine
    UnsupportedLanguage(String),
    /// Request parameters are out of range or malformed
    InvalidInput(String),
    /// Host adapter failed to write, read or delegate
    Adapter(String),
    /// Host reported that an interactive step was cancelled
    Cancelled,
    /// Internal engine error with custom message
    Internal(String),
    /// I/O error reading configuration
    Io(std::io::Error),
    /// Error parsing YAML configuration or catalog
    SerdeYaml(serde_yaml::Error),
    /// Error parsing JSON data
    SerdeJson(serde_json::Error),
    /// Regular expression compilation error
    Regex(regex::Error),
}

impl ServiceError {
    /// Whether this failure is the benign cancellation of a delegated step.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ServiceError::Cancelled)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ParserError(msg) => write!(f, "Parser error: {msg}"),
            ServiceError::UnsupportedLanguage(lang) => write!(f, "Unsupported language: {lang}"),
            ServiceError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            ServiceError::Adapter(msg) => write!(f, "Editor adapter error: {msg}"),
            ServiceError::Cancelled => write!(f, "Cancelled"),
            ServiceError::Internal(msg) => write!(f, "Internal error: {msg}"),
            ServiceError::Io(err) => write!(f, "IO error: {err}"),
            ServiceError::SerdeYaml(err) => write!(f, "YAML parsing error: {err}"),
            ServiceError::SerdeJson(err) => write!(f, "JSON parsing error: {err}"),
            ServiceError::Regex(err) => write!(f, "Regex error: {err}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io(err)
    }
}

impl From<serde_yaml::Error> for ServiceError {
    fn from(err: serde_yaml::Error) -> Self {
        ServiceError::SerdeYaml(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerdeJson(err)
    }
}

impl From<regex::Error> for ServiceError {
    fn from(err: regex::Error) -> Self {
        ServiceError::Regex(err)
    }
}

impl From<ServiceError> for ErrorData {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::UnsupportedLanguage(_) | ServiceError::InvalidInput(_) => {
                ErrorData::invalid_params(err.to_string(), None)
            }
            _ => ErrorData::internal_error(err.to_string(), None),
        }
    }
}
