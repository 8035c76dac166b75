//! Carriage-return handling
//!
//! Newline doubling only targets the line-feed character. Documents written
//! with CRLF or bare CR terminators can either keep their carriage returns
//! (`"a\r\nb"` becomes `"a\r\n\nb"`) or be converted to LF first.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    /// CRLF pair or a lone CR
    static ref CARRIAGE_RETURN: Regex = Regex::new(r"\r\n?").expect("valid regex");
}

/// What to do with carriage returns before doubling newlines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEndingPolicy {
    /// Leave `\r` untouched; only `\n` is doubled
    #[default]
    Preserve,
    /// Convert `\r\n` and lone `\r` to `\n` before doubling
    NormalizeToLf,
}

/// Convert CRLF and lone CR terminators to LF.
///
/// Returns the input unchanged (borrowed) when it contains no carriage return.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    CARRIAGE_RETURN.replace_all(input, "\n")
}
