//! Text transformations applied to whole documents

mod line_endings;
mod newlines;

pub use line_endings::{normalize_line_endings, LineEndingPolicy};
pub use newlines::{newline_count, normalize, normalize_with};
