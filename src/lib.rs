pub mod config;
pub mod editor;
pub mod errors;
pub mod refactoring;
pub mod refactoring_service;
pub mod syntax;
pub mod tool_router;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use editor::{Editor, ErrorReason, InMemoryEditor, Selection};
pub use refactoring::RefactoringKind;
pub use types::*;
