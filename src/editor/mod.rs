//! # Editor Boundary
//!
//! Value types shared by every refactoring (positions, selections, refusal
//! reasons, edits) and the [`Editor`] trait hosts implement to receive the
//! results.

pub mod adapter;
pub mod error_reason;
pub mod in_memory;
pub mod position;
pub mod selection;

pub use adapter::{
    Code, ComputeEdits, DEFAULT_VARIABLE_NAME, DelegateAction, DelegateResult, Edit, Editor,
};
pub use error_reason::ErrorReason;
pub use in_memory::InMemoryEditor;
pub use position::Position;
pub use selection::Selection;
