//! Front matter parsing for Markdown documents
//!
//! A front matter header is a leading block delimited by `---` lines holding
//! `key: value` pairs. Documents without such a block parse to an empty
//! mapping with the full text as body; a header that never closes is treated
//! the same way.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Parse an optional front matter header from `content`.
///
/// Returns the metadata mapping and the remaining body text. Never fails:
/// missing or malformed headers degrade to an empty mapping.
pub fn parse_front_matter(content: &str) -> (BTreeMap<String, String>, String) {
    let metadata = BTreeMap::new();

    let Some(after_open) = strip_opening_delimiter(content) else {
        return (metadata, content.to_string());
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if is_delimiter_line(line) {
            let header = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (parse_header_lines(header), body.to_string());
        }
        offset += line.len();
    }

    // Opening delimiter without a closing one: no header
    (metadata, content.to_string())
}

/// Strip the opening `---` line, returning the rest of the document
fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let (first, rest) = content.split_once('\n')?;
    if first.trim_end_matches('\r').trim() == DELIMITER {
        Some(rest)
    } else {
        None
    }
}

fn is_delimiter_line(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']).trim() == DELIMITER
}

/// Parse `key: value` lines, skipping blanks and anything without a colon
fn parse_header_lines(header: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    for line in header.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            metadata.insert(key.to_string(), unquote(value.trim()).to_string());
        }
    }

    metadata
}

/// Strip one layer of matching single or double quotes
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_front_matter() {
        let (metadata, body) = parse_front_matter("# Title\n\nJust a document.\n");
        assert!(metadata.is_empty());
        assert_eq!(body, "# Title\n\nJust a document.\n");
    }

    #[test]
    fn test_basic_front_matter() {
        let (metadata, body) = parse_front_matter("---\ntitle: Intro\n---\nBody text.");
        assert_eq!(metadata.get("title").map(String::as_str), Some("Intro"));
        assert_eq!(body, "Body text.");
    }

    #[test]
    fn test_multiple_fields_and_quotes() {
        let content = "---\ntitle: \"Getting Started\"\nauthor: 'ada'\ntags: intro, setup\n---\n\n# Hello\n";
        let (metadata, body) = parse_front_matter(content);
        assert_eq!(
            metadata.get("title").map(String::as_str),
            Some("Getting Started")
        );
        assert_eq!(metadata.get("author").map(String::as_str), Some("ada"));
        assert_eq!(
            metadata.get("tags").map(String::as_str),
            Some("intro, setup")
        );
        assert_eq!(body, "\n# Hello\n");
    }

    #[test]
    fn test_unclosed_header_is_body() {
        let content = "---\ntitle: Broken\nno closing delimiter here\n";
        let (metadata, body) = parse_front_matter(content);
        assert!(metadata.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_crlf_line_endings() {
        let (metadata, body) = parse_front_matter("---\r\ntitle: Windows\r\n---\r\nBody\r\n");
        assert_eq!(metadata.get("title").map(String::as_str), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_lines_without_colon_are_skipped() {
        let (metadata, body) = parse_front_matter("---\njust some words\ntitle: Ok\n---\nBody");
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get("title").map(String::as_str), Some("Ok"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_horizontal_rule_later_in_body_is_not_a_header() {
        let content = "# Title\n\n---\n\nMore text.\n";
        let (metadata, body) = parse_front_matter(content);
        assert!(metadata.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_value_colons_are_preserved() {
        let (metadata, _) = parse_front_matter("---\nurl: https://example.com/docs\n---\n");
        assert_eq!(
            metadata.get("url").map(String::as_str),
            Some("https://example.com/docs")
        );
    }
}
