//! Path text normalization helpers.
//!
//! # Responsibility
//! - Turn raw slash-delimited path text into clean segment lists.
//! - Strip the surrounding quote characters tolerated at the CLI boundary.
//!
//! # Invariants
//! - Parsed segments are never empty strings.
//! - Normalization never touches characters inside a segment, only its
//!   surrounding noise.

use crate::model::node::ROOT_NAME;
use once_cell::sync::Lazy;
use regex::Regex;

static PATH_EDGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[\s/"']+|[\s/"']+$"#).expect("valid path edge regex"));
static VALUE_EDGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[\s"']+|[\s"']+$"#).expect("valid value edge regex"));

/// Strips surrounding whitespace and quote characters from one value.
///
/// Applied to every name/content value before it reaches the store. This is
/// interface compatibility with quoted CLI input, not an escaping mechanism;
/// all statements are parameterized.
pub fn strip_quotes(value: &str) -> String {
    VALUE_EDGE_RE.replace_all(value, "").into_owned()
}

/// Parses a raw path into normalized segments.
///
/// Surrounding slashes, whitespace and quotes are stripped from the path and
/// from each segment. Returns `None` when no segment remains or when any
/// segment normalizes to an empty string (`Root//A` is not a valid path).
pub fn parse_segments(raw: &str) -> Option<Vec<String>> {
    let trimmed = PATH_EDGE_RE.replace_all(raw, "");
    if trimmed.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    for piece in trimmed.split('/') {
        let segment = strip_quotes(piece);
        if segment.is_empty() {
            return None;
        }
        segments.push(segment);
    }
    Some(segments)
}

/// Case-insensitive check against the root folder name.
pub fn is_root_segment(segment: &str) -> bool {
    segment.eq_ignore_ascii_case(ROOT_NAME)
}

#[cfg(test)]
mod tests {
    use super::{is_root_segment, parse_segments, strip_quotes};

    #[test]
    fn strip_quotes_removes_surrounding_noise_only() {
        assert_eq!(strip_quotes("\"My Folder\""), "My Folder");
        assert_eq!(strip_quotes("  'notes.txt' "), "notes.txt");
        assert_eq!(strip_quotes("a\"b"), "a\"b");
    }

    #[test]
    fn parse_segments_strips_path_edges() {
        assert_eq!(
            parse_segments("/Root/My/Folder/").expect("path should parse"),
            vec!["Root", "My", "Folder"]
        );
        assert_eq!(
            parse_segments("\"Root/Docs\"").expect("quoted path should parse"),
            vec!["Root", "Docs"]
        );
    }

    #[test]
    fn parse_segments_rejects_empty_and_degenerate_paths() {
        assert!(parse_segments("").is_none());
        assert!(parse_segments("  \"\" ").is_none());
        assert!(parse_segments("Root//A").is_none());
    }

    #[test]
    fn root_segment_check_is_case_insensitive() {
        assert!(is_root_segment("Root"));
        assert!(is_root_segment("rOoT"));
        assert!(!is_root_segment("Rooted"));
    }
}
