// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! Safetensors `__metadata__` extraction by balanced-brace matching.
//!
//! Safetensors model headers embed training metadata as a JSON object with
//! no length prefix, so the object's extent has to be found by counting
//! braces. Several well-known keys hold values that are themselves
//! JSON-encoded strings (the trainer double-encodes them); those are parsed
//! a second time and replaced in the record with the nested structure.

use std::fmt;

use serde_json::{Map, Value};

/// Literal marker that opens the metadata block.
pub const METADATA_MARKER: &str = "__metadata__";

/// Bytes to skip from the marker's start to land just inside the object's
/// opening brace. Assumes the marker is followed by exactly three bytes of
/// punctuation (`':{` or `":{`) — a structural property of the surrounding
/// header format, not a tunable.
const MARKER_SKIP: usize = 15;

/// Keys whose values are JSON documents encoded as strings.
const NESTED_JSON_KEYS: [&str; 4] = [
    "ss_bucket_info",
    "ss_network_args",
    "ss_dataset_dirs",
    "ss_tag_frequency",
];

/// Errors that can occur during metadata extraction.
#[derive(Debug)]
pub enum MetaError {
    /// The buffer contains no `__metadata__` marker.
    MarkerNotFound,
    /// The buffer ended before the metadata object's braces balanced.
    PrematureEnd,
    /// The extracted text (or a nested JSON-encoded string) failed to parse.
    InvalidJson(serde_json::Error),
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkerNotFound => write!(f, "no {METADATA_MARKER} marker in buffer"),
            Self::PrematureEnd => write!(f, "buffer ended inside the metadata object"),
            Self::InvalidJson(e) => write!(f, "metadata is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for MetaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidJson(e) => Some(e),
            _ => None,
        }
    }
}

/// Extract and parse the `__metadata__` object from a text buffer.
///
/// Scans for the first [`METADATA_MARKER`], skips the fixed punctuation
/// after it, and accumulates until the braces balance. The opening brace
/// sits inside the skipped punctuation, so the depth counter starts at 1
/// and a `{` is prepended before parsing. Known double-encoded keys are
/// re-parsed in place; keys absent from the record are skipped.
///
/// Offsets are byte offsets: the header region this format wraps is ASCII
/// JSON, and braces are ASCII, so the scan never splits a character. A
/// marker skip that lands inside a multi-byte character is reported as
/// [`MetaError::PrematureEnd`].
pub fn extract_metadata(content: &str) -> Result<Map<String, Value>, MetaError> {
    let marker = content.find(METADATA_MARKER).ok_or(MetaError::MarkerNotFound)?;
    let region = content
        .get(marker + MARKER_SKIP..)
        .ok_or(MetaError::PrematureEnd)?;

    // Find the byte just past the brace that closes the object.
    let mut depth = 1usize;
    let mut end = None;
    for (i, &b) in region.as_bytes().iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i + 1);
                    break;
                }
            }
            _ => {}
        }
    }
    let end = end.ok_or(MetaError::PrematureEnd)?;

    // The skipped opening brace was never copied; restore it.
    let mut text = String::with_capacity(end + 1);
    text.push('{');
    text.push_str(&region[..end]);

    let mut record: Map<String, Value> =
        serde_json::from_str(&text).map_err(MetaError::InvalidJson)?;

    for key in NESTED_JSON_KEYS {
        let nested = match record.get(key) {
            Some(Value::String(s)) => serde_json::from_str(s).map_err(MetaError::InvalidJson)?,
            _ => continue,
        };
        record.insert(key.to_string(), nested);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_object() {
        let content = r#"prefix __metadata__':{"a":1,"b":"two"} suffix"#;
        let record = extract_metadata(content).unwrap();
        assert_eq!(record["a"], 1);
        assert_eq!(record["b"], "two");
    }

    #[test]
    fn double_quote_delimiter_also_accepted() {
        // The skip is a fixed byte count, so `":{` works the same as `':{`.
        let content = r#"{"__metadata__":{"a":1},"tensor":{"dtype":"F16"}}"#;
        let record = extract_metadata(content).unwrap();
        assert_eq!(record["a"], 1);
    }

    #[test]
    fn nested_object_extracted_in_full() {
        let content = r#"__metadata__':{"a":{"b":1},"c":2}"#;
        let record = extract_metadata(content).unwrap();
        assert_eq!(record["a"]["b"], 1);
        assert_eq!(record["c"], 2);
    }

    #[test]
    fn nested_json_string_keys_reparsed() {
        let content = r#"__metadata__':{"a":1,"ss_tag_frequency":"{\"x\":2}"}"#;
        let record = extract_metadata(content).unwrap();
        assert_eq!(record["a"], 1);
        assert_eq!(record["ss_tag_frequency"]["x"], 2);
    }

    #[test]
    fn all_known_nested_keys_reparsed() {
        let content = concat!(
            r#"__metadata__':{"#,
            r#""ss_bucket_info":"{\"buckets\":{}}","#,
            r#""ss_network_args":"{\"dim\":8}","#,
            r#""ss_dataset_dirs":"{\"img\":{\"n_repeats\":10}}","#,
            r#""ss_tag_frequency":"{\"img\":{\"cat\":3}}"}"#,
        );
        let record = extract_metadata(content).unwrap();
        assert!(record["ss_bucket_info"]["buckets"].is_object());
        assert_eq!(record["ss_network_args"]["dim"], 8);
        assert_eq!(record["ss_dataset_dirs"]["img"]["n_repeats"], 10);
        assert_eq!(record["ss_tag_frequency"]["img"]["cat"], 3);
    }

    #[test]
    fn absent_nested_keys_skipped() {
        let content = r#"__metadata__':{"ss_network_args":"{\"dim\":4}"}"#;
        let record = extract_metadata(content).unwrap();
        assert_eq!(record["ss_network_args"]["dim"], 4);
        assert!(!record.contains_key("ss_tag_frequency"));
    }

    #[test]
    fn non_string_nested_key_left_alone() {
        let content = r#"__metadata__':{"ss_network_args":{"dim":4}}"#;
        let record = extract_metadata(content).unwrap();
        assert_eq!(record["ss_network_args"]["dim"], 4);
    }

    #[test]
    fn missing_marker() {
        assert!(matches!(
            extract_metadata(r#"{"a":1}"#),
            Err(MetaError::MarkerNotFound)
        ));
    }

    #[test]
    fn unbalanced_braces() {
        let content = r#"__metadata__':{"a":{"b":1}"#;
        assert!(matches!(
            extract_metadata(content),
            Err(MetaError::PrematureEnd)
        ));
    }

    #[test]
    fn marker_at_end_of_buffer() {
        assert!(matches!(
            extract_metadata("__metadata__"),
            Err(MetaError::PrematureEnd)
        ));
    }

    #[test]
    fn invalid_metadata_json() {
        let content = r#"__metadata__':{"a":}"#;
        assert!(matches!(
            extract_metadata(content),
            Err(MetaError::InvalidJson(_))
        ));
    }

    #[test]
    fn invalid_nested_json_string() {
        let content = r#"__metadata__':{"ss_tag_frequency":"not json"}"#;
        assert!(matches!(
            extract_metadata(content),
            Err(MetaError::InvalidJson(_))
        ));
    }
}
