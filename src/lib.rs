//! newline-doubler: LSP server library that doubles every newline in a document
//!
//! This library provides the core functionality for the newline-doubler server:
//! - The pure newline-doubling transformation and its line-ending policy
//! - Document collaborators that the transformation reads from and writes to
//! - Workspace edits and configuration for the language server
//!
//! # Example
//!
//! ```
//! use newline_doubler::document::{double_newlines, Document};
//! use newline_doubler::transform::{normalize, LineEndingPolicy};
//!
//! assert_eq!(normalize("a\nb"), "a\n\nb");
//!
//! let mut doc = Document::new("one\ntwo".to_string(), 1);
//! double_newlines(&mut doc, LineEndingPolicy::Preserve).unwrap();
//! assert_eq!(doc.text, "one\n\ntwo");
//! ```

pub mod config;
pub mod document;
pub mod edits;
pub mod error;
pub mod transform;

mod backend;

pub use backend::{Backend, DOUBLE_NEWLINES_COMMAND, DOUBLE_NEWLINES_KIND};
