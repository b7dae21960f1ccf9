//! Message structure and handling.

use crate::content_type::ContentType;
use crate::error::{Error, Result};
use crate::header::Headers;

/// Decodes raw message bytes into text.
///
/// Valid UTF-8 is taken as is. Anything else is read as ISO-8859-1, which maps
/// every byte to exactly one character and therefore never fails.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// A structurally parsed email message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Payload after the header block, untouched.
    pub body: String,
}

impl Message {
    /// Creates a message from already parsed parts.
    #[must_use]
    pub const fn new(headers: Headers, body: String) -> Self {
        Self { headers, body }
    }

    /// Parses a message from text.
    ///
    /// Never fails: whatever follows the header block is the body.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let (headers, body_start) = Headers::parse_block(text);
        Self::new(headers, text[body_start..].to_string())
    }

    /// Parses a message from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&decode_text(bytes))
    }

    /// Gets the content type, defaulting to `text/plain`.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.headers
            .get("content-type")
            .map_or_else(ContentType::text_plain, ContentType::parse_lenient)
    }

    /// Checks if this is a multipart message.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type().has_parts()
    }

    /// Gets a header value that must be present (last occurrence).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeader`] if the header is absent.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.headers
            .get_last(name)
            .ok_or_else(|| Error::MissingHeader(name.to_string()))
    }
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

    const ENRON_STYLE: &str = concat!(
        "Message-ID: <18782981.1075855378110.JavaMail.evans@thyme>\r\n",
        "Date: Mon, 14 May 2001 16:39:00 -0700 (PDT)\r\n",
        "From: phillip.allen@enron.com\r\n",
        "To: tim.belden@enron.com\r\n",
        "Subject: \r\n",
        "Mime-Version: 1.0\r\n",
        "Content-Type: text/plain; charset=us-ascii\r\n",
        "Content-Transfer-Encoding: 7bit\r\n",
        "\r\n",
        "Here is our forecast\r\n",
        "\r\n",
        " "
    );

    #[test]
    fn test_message_parse() {
        let message = Message::parse(ENRON_STYLE);
        let headers = &message.headers;

        assert_eq!(headers.get("from"), Some("phillip.allen@enron.com"));
        assert_eq!(headers.get("to"), Some("tim.belden@enron.com"));
        assert_eq!(headers.get("subject"), Some(""));
        assert_eq!(
            message.require("date").unwrap(),
            "Mon, 14 May 2001 16:39:00 -0700 (PDT)"
        );
        assert_eq!(
            headers.get("message-id"),
            Some("<18782981.1075855378110.JavaMail.evans@thyme>")
        );
        assert_eq!(message.body, "Here is our forecast\r\n\r\n ");
        assert!(!message.is_multipart());
    }

    #[test]
    fn test_message_headers_only() {
        let message = Message::parse("Subject: nothing else");
        assert_eq!(message.headers.get("subject"), Some("nothing else"));
        assert_eq!(message.body, "");
    }

    #[test]
    fn test_message_empty_input() {
        let message = Message::parse("");
        assert!(message.headers.is_empty());
        assert_eq!(message.body, "");
    }

    #[test]
    fn test_message_multipart() {
        let text = concat!(
            "Content-Type: multipart/mixed; boundary=abc123\n",
            "\n",
            "--abc123\n",
            "Content-Type: text/plain\n",
            "\n",
            "Part 1\n",
            "--abc123--\n"
        );
        let message = Message::parse(text);
        assert!(message.is_multipart());
    }

    #[test]
    fn test_message_bad_content_type_is_single_part() {
        let message = Message::parse("Content-Type: nonsense\n\nbody");
        assert_eq!(message.content_type(), ContentType::text_plain());
        assert!(!message.is_multipart());
    }

    #[test]
    fn test_message_require() {
        let message = Message::parse("Date: a\nDate: b\n\n");
        assert_eq!(message.require("date").unwrap(), "b");
        assert!(matches!(
            message.require("subject"),
            Err(Error::MissingHeader(name)) if name == "subject"
        ));
    }

    #[test]
    fn test_from_bytes_latin1_fallback() {
        let bytes = b"Subject: caf\xe9\n\nna\xefve";
        let message = Message::from_bytes(bytes);
        assert_eq!(message.headers.get("subject"), Some("caf\u{e9}"));
        assert_eq!(message.body, "na\u{ef}ve");
    }

    #[test]
    fn test_message_orphan_continuation_is_not_fatal() {
        let message = Message::parse(" lead\nSubject: s\n\nbody");
        assert_eq!(message.require("subject").unwrap(), "s");
        assert_eq!(message.body, "body");
    }

    #[test]
    fn test_decode_text_utf8() {
        assert_eq!(decode_text("héllo".as_bytes()), "héllo");
    }
}
