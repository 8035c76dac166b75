//! Newline doubling
//!
//! Every line-feed is replaced by two line-feeds. Matches are found left to
//! right and never overlap, so a run of N newlines becomes a run of 2N rather
//! than being collapsed first.

use lazy_static::lazy_static;
use regex::Regex;

use super::line_endings::{normalize_line_endings, LineEndingPolicy};

lazy_static! {
    static ref NEWLINE: Regex = Regex::new(r"\n").expect("valid regex");
}

/// Replace every `\n` in `input` with `\n\n`.
///
/// Carriage returns are left untouched. Any string is valid input.
pub fn normalize(input: &str) -> String {
    NEWLINE.replace_all(input, "\n\n").into_owned()
}

/// Double newlines after applying the given line-ending policy
pub fn normalize_with(input: &str, policy: LineEndingPolicy) -> String {
    match policy {
        LineEndingPolicy::Preserve => normalize(input),
        LineEndingPolicy::NormalizeToLf => normalize(&normalize_line_endings(input)),
    }
}

/// Number of line-feed characters in `input`
pub fn newline_count(input: &str) -> usize {
    input.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "abc",
        "\n",
        "a\nb",
        "a\n\nb",
        "\n\n\n",
        "trailing\n",
        "\nleading",
        "héllo\nwörld\n🦀\n",
        "a\r\nb\r\n",
        "tabs\tand spaces \n end",
    ];

    #[test]
    fn test_empty_string() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_no_newlines_unchanged() {
        assert_eq!(normalize("abc"), "abc");
    }

    #[test]
    fn test_single_newline_doubled() {
        assert_eq!(normalize("a\nb"), "a\n\nb");
    }

    #[test]
    fn test_existing_double_newline_each_doubled() {
        assert_eq!(normalize("a\n\nb"), "a\n\n\n\nb");
    }

    #[test]
    fn test_run_of_newlines_doubles_length() {
        assert_eq!(normalize("\n\n\n"), "\n\n\n\n\n\n");
    }

    #[test]
    fn test_newline_count_doubles() {
        for s in SAMPLES {
            let k = newline_count(s);
            assert_eq!(newline_count(&normalize(s)), 2 * k, "input: {:?}", s);
        }
    }

    #[test]
    fn test_length_grows_by_newline_count() {
        for s in SAMPLES {
            let k = newline_count(s);
            assert_eq!(normalize(s).len(), s.len() + k, "input: {:?}", s);
        }
    }

    #[test]
    fn test_not_idempotent() {
        for s in SAMPLES.iter().filter(|s| s.contains('\n')) {
            let once = normalize(s);
            let twice = normalize(&once);
            assert_ne!(once, twice, "input: {:?}", s);
            assert_eq!(newline_count(&twice), 4 * newline_count(s));
        }
    }

    #[test]
    fn test_non_newline_content_preserved() {
        for s in SAMPLES {
            let stripped: String = s.chars().filter(|&c| c != '\n').collect();
            let result: String = normalize(s).chars().filter(|&c| c != '\n').collect();
            assert_eq!(result, stripped);
        }
    }

    #[test]
    fn test_carriage_return_untouched_by_default() {
        assert_eq!(normalize("a\r\nb"), "a\r\n\nb");
        assert_eq!(normalize("a\rb"), "a\rb");
        assert_eq!(
            normalize_with("a\r\nb", LineEndingPolicy::Preserve),
            "a\r\n\nb"
        );
    }

    #[test]
    fn test_normalize_to_lf_policy() {
        assert_eq!(
            normalize_with("a\r\nb\rc\nd", LineEndingPolicy::NormalizeToLf),
            "a\n\nb\n\nc\n\nd"
        );
    }

    #[test]
    fn test_input_left_unchanged() {
        let input = String::from("x\ny");
        let output = normalize(&input);
        assert_eq!(input, "x\ny");
        assert_eq!(output, "x\n\ny");
    }
}
