//! # Syntax
//!
//! Parsing, node lookup and text editing primitives shared by the refactorings.

pub mod javascript;
pub mod locator;
pub mod text;
pub mod tree;

pub use locator::{locate, locate_kind};
pub use text::{LineIndex, TextEdit, apply_edits, apply_text_edits};
pub use tree::{NodeId, SyntaxNode, SyntaxTree, is_supported, parse_language};
