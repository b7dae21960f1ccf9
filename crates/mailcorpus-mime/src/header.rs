//! Message header handling.

use tracing::debug;

/// Collection of email headers.
///
/// Headers keep their original spelling and arrival order. Lookups are
/// case-insensitive. Duplicates are retained, so callers decide whether the
/// first or the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets the last value for a header.
    #[must_use]
    pub fn get_last(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Number of header lines (duplicates counted separately).
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns an iterator over all headers in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parses headers from raw text.
    ///
    /// Headers are in the format:
    /// ```text
    /// Header-Name: value
    ///   continuation line
    /// ```
    ///
    /// Parsing stops at the first empty line or at the first line that is
    /// neither a header nor a continuation. A continuation line with no
    /// header to attach to is dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_block(text).0
    }

    /// Parses the header block and returns the byte offset where the body starts.
    pub(crate) fn parse_block(text: &str) -> (Self, usize) {
        let mut headers = Self::new();
        let mut current: Option<(String, String)> = None;
        let mut last_terminator = "";
        let mut offset = 0;

        for raw in text.split_inclusive('\n') {
            let (line, terminator) = split_terminator(raw);

            if line.is_empty() {
                // Blank separator belongs to neither headers nor body
                if let Some((name, value)) = current.take() {
                    headers.add(name, value);
                }
                return (headers, offset + raw.len());
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(last_terminator);
                    value.push_str(line);
                } else {
                    debug!(line, "Dropping continuation line before any header");
                }
            } else if line.starts_with("From ") {
                // mbox envelope line, carries no header data
            } else if let Some((name, value)) = split_header(line) {
                if let Some((name, value)) = current.take() {
                    headers.add(name, value);
                }
                current = Some((name.to_string(), value.trim_start().to_string()));
            } else {
                if let Some((name, value)) = current.take() {
                    headers.add(name, value);
                }
                return (headers, offset);
            }

            last_terminator = terminator;
            offset += raw.len();
        }

        if let Some((name, value)) = current {
            headers.add(name, value);
        }

        (headers, text.len())
    }
}

/// Splits a raw line into its content and its line terminator.
fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}

/// Splits `Name: value`, requiring a non-empty name of printable ASCII.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let valid = !name.is_empty() && name.bytes().all(|b| (0x21..=0x7e).contains(&b));
    valid.then_some((name, value))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_headers_first_and_last() {
        let mut headers = Headers::new();
        headers.add("X-Folder", "inbox");
        headers.add("x-folder", "archive");
        assert_eq!(headers.get("X-Folder"), Some("inbox"));
        assert_eq!(headers.get_last("x-FOLDER"), Some("archive"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_headers_parse() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: Test Message\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8\r\n",
            "\r\n"
        );

        let headers = Headers::parse(text);
        assert_eq!(headers.get("From"), Some("sender@example.com"));
        assert_eq!(headers.get("To"), Some("recipient@example.com"));
        assert_eq!(headers.get("Subject"), Some("Test Message"));
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain;\r\n charset=utf-8")
        );
    }

    #[test]
    fn test_headers_parse_keeps_folding() {
        let text = "To: a@example.com,\n\tb@example.com\nSubject: x\n\nbody";
        let headers = Headers::parse(text);
        assert_eq!(headers.get("to"), Some("a@example.com,\n\tb@example.com"));
    }

    #[test]
    fn test_headers_parse_trims_leading_value_space_only() {
        let headers = Headers::parse("Subject:    spaced out   \n\n");
        assert_eq!(headers.get("subject"), Some("spaced out   "));
    }

    #[test]
    fn test_headers_parse_skips_envelope_line() {
        let text = "From alice@example.com Mon Jan  1 00:00:00 2001\nTo: bob@example.com\n\n";
        let headers = Headers::parse(text);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("to"), Some("bob@example.com"));
    }

    #[test]
    fn test_headers_parse_block_offsets() {
        let text = "A: 1\nB: 2\n\nbody here";
        let (headers, offset) = Headers::parse_block(text);
        assert_eq!(headers.len(), 2);
        assert_eq!(&text[offset..], "body here");
    }

    #[test]
    fn test_headers_parse_stops_at_non_header_line() {
        let text = "A: 1\nthis is not a header\nmore";
        let (headers, offset) = Headers::parse_block(text);
        assert_eq!(headers.len(), 1);
        assert_eq!(&text[offset..], "this is not a header\nmore");
    }

    #[test]
    fn test_headers_parse_drops_leading_continuation() {
        let text = " lead\nDate: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\n\nbody";
        let (headers, offset) = Headers::parse_block(text);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("date"), Some("Mon, 1 Jan 2001 00:00:00 +0000"));
        assert_eq!(headers.get("subject"), Some("s"));
        assert_eq!(&text[offset..], "body");
    }

    #[test]
    fn test_headers_parse_drops_repeated_leading_continuations() {
        let headers = Headers::parse("\tone\n two\nA: 1\n more\n\n");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("a"), Some("1\n more"));
    }

    #[test]
    fn test_headers_iter() {
        let mut headers = Headers::new();
        headers.add("From", "sender@example.com");
        headers.add("To", "recipient@example.com");

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["From", "To"]);
    }

    mod props {
        use super::super::Headers;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parsed_values_round_trip(
                name in "[A-Za-z][A-Za-z0-9-]{0,15}",
                value in "[!-~][ -~]{0,40}",
            ) {
                let text = format!("{name}: {value}\n\nbody");
                let headers = Headers::parse(&text);
                prop_assert_eq!(headers.get(&name), Some(value.as_str()));
            }
        }
    }
}
