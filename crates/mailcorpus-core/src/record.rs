//! Email record normalization.
//!
//! One raw message becomes one flat JSON object: every header under its
//! camel-cased lower-case name, plus synthetic fields (`id`, `dateRaw`,
//! `date`, `body`, `subject`, `noRecipient`, `categories`) and recipient
//! headers split into lists.

use mailcorpus_mime::Message;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::categories::CategoryLabel;
use crate::config::{Options, PRIMARY_RECIPIENT_FIELDS};
use crate::date::{normalize_date, to_iso8601};
use crate::error::Result;
use crate::keys::to_camel_case;

/// A normalized email, keyed by camel-cased field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailRecord {
    fields: Map<String, Value>,
}

/// Result of normalizing one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// A record was built.
    Record(EmailRecord),
    /// The message is multipart and intentionally not converted.
    Multipart,
}

impl EmailRecord {
    /// Sets a field, camel-casing its name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(to_camel_case(name), value.into());
    }

    /// Gets a field by its camel-cased name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Gets a string field by its camel-cased name.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The record identifier (source filename).
    #[must_use]
    pub fn id(&self) -> &str {
        self.get_str("id").unwrap_or_default()
    }

    /// The addresses of a recipient field, empty when the field is absent.
    #[must_use]
    pub fn recipients(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether the message has no `to`, `cc` or `bcc` recipient.
    #[must_use]
    pub fn no_recipient(&self) -> bool {
        self.get("noRecipient")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Attaches category labels, replacing any previous ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the labels cannot be serialized.
    pub fn set_categories(&mut self, labels: &[CategoryLabel]) -> Result<()> {
        self.set("categories", serde_json::to_value(labels)?);
        Ok(())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over field names in output order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Splits a recipient header on commas, trimming and dropping empty entries.
#[must_use]
pub fn split_recipients(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

/// Removes every CR and LF, then trims surrounding whitespace.
#[must_use]
pub fn clean_subject(subject: &str) -> String {
    subject
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalizes one raw message into a record.
///
/// # Errors
///
/// Returns an error if the `date` or `subject` header is missing, or the
/// date cannot be parsed.
pub fn normalize_email(id: &str, raw: &[u8], options: &Options) -> Result<Normalized> {
    let message = Message::from_bytes(raw);

    if message.is_multipart() {
        return Ok(Normalized::Multipart);
    }

    let mut record = EmailRecord::default();

    // Duplicate headers: the last occurrence wins
    for (name, value) in message.headers.iter() {
        record.set(&name.to_lowercase(), value);
    }

    record.set("id", id);

    let date_raw = message.require("date")?;
    let date = normalize_date(date_raw)?;
    record.set("dateRaw", date_raw);
    record.set("date", to_iso8601(&date));

    for field in &options.recipient_fields {
        let addresses = message
            .headers
            .get_last(field)
            .map(split_recipients)
            .unwrap_or_default();
        record.set(field, addresses);
    }

    let no_recipient = PRIMARY_RECIPIENT_FIELDS
        .iter()
        .all(|field| record.recipients(field).is_empty());
    record.set("noRecipient", no_recipient);
    if no_recipient {
        warn!(id, "No recipient in [to, cc, bcc], setting 'noRecipient' flag");
    }

    record.set("body", message.body.as_str());
    record.set("subject", clean_subject(message.require("subject")?));
    record.set_categories(&[])?;

    Ok(Normalized::Record(record))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::needless_pass_by_value)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    fn normalize(raw: &str) -> Result<Normalized> {
        normalize_email("1.txt", raw.as_bytes(), &Options::default())
    }

    fn record(raw: &str) -> EmailRecord {
        match normalize(raw).unwrap() {
            Normalized::Record(record) => record,
            Normalized::Multipart => panic!("unexpected multipart"),
        }
    }

    const SIMPLE: &str = concat!(
        "Message-ID: <1@thyme>\n",
        "Date: Mon, 1 Jan 2001 00:00:00 -0800\n",
        "From: alice@enron.com\n",
        "To: bob@enron.com, carol@enron.com,\n",
        "\t dave@enron.com\n",
        "Subject: Re: forecast\n",
        "X-To: Bob, Carol\n",
        "X-cc: \n",
        "Content-Transfer-Encoding: 7bit\n",
        "\n",
        "Numbers attached.\n"
    );

    #[test]
    fn test_synthetic_fields() {
        let record = record(SIMPLE);
        assert_eq!(record.id(), "1.txt");
        assert_eq!(
            record.get_str("dateRaw"),
            Some("Mon, 1 Jan 2001 00:00:00 -0800")
        );
        assert_eq!(record.get_str("date"), Some("2001-01-01T08:00:00+00:00"));
        assert_eq!(record.get_str("subject"), Some("Re: forecast"));
        assert_eq!(record.get_str("body"), Some("Numbers attached.\n"));
        assert!(!record.no_recipient());
        assert_eq!(record.get("categories"), Some(&serde_json::json!([])));
    }

    #[test]
    fn test_headers_copied_with_camel_case_keys() {
        let record = record(SIMPLE);
        assert_eq!(record.get_str("messageId"), Some("<1@thyme>"));
        assert_eq!(record.get_str("from"), Some("alice@enron.com"));
        assert_eq!(record.get_str("contentTransferEncoding"), Some("7bit"));
        assert!(record.keys().all(|key| !key.contains('-')));
    }

    #[test]
    fn test_recipients_split_and_trimmed() {
        let record = record(SIMPLE);
        assert_eq!(
            record.recipients("to"),
            vec!["bob@enron.com", "carol@enron.com", "dave@enron.com"]
        );
        assert_eq!(record.recipients("xTo"), vec!["Bob", "Carol"]);
        assert!(record.recipients("xCc").is_empty());
    }

    #[test]
    fn test_recipient_lists_always_present() {
        let record = record("Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: hi\n\n");
        for key in ["to", "xTo", "cc", "xCc", "bcc", "xBcc"] {
            assert_eq!(record.get(key), Some(&serde_json::json!([])), "{key}");
        }
        assert!(record.no_recipient());
    }

    #[test]
    fn test_bcc_alone_counts_as_recipient() {
        let record = record("Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\nBcc: x@y\n\n");
        assert!(!record.no_recipient());
    }

    #[test]
    fn test_only_x_recipients_flags_no_recipient() {
        let record = record("Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\nX-To: Bob\n\n");
        assert!(record.no_recipient());
    }

    #[test]
    fn test_subject_newlines_removed() {
        let raw = "Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject:  long\r\n subject line \n\n";
        let record = record(raw);
        assert_eq!(record.get_str("subject"), Some("long subject line"));
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let raw = "Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\nX-Folder: a\nX-Folder: b\n\n";
        assert_eq!(record(raw).get_str("xFolder"), Some("b"));
    }

    #[test]
    fn test_synthetic_fields_win_over_headers() {
        let raw = "Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\nId: spoofed\nDate-Raw: x\n\n";
        let record = record(raw);
        assert_eq!(record.id(), "1.txt");
        assert_eq!(
            record.get_str("dateRaw"),
            Some("Mon, 1 Jan 2001 00:00:00 +0000")
        );
    }

    #[test]
    fn test_multipart_skipped() {
        let raw = concat!(
            "Date: Mon, 1 Jan 2001 00:00:00 +0000\n",
            "Subject: s\n",
            "Content-Type: multipart/mixed; boundary=\"xyz\"\n",
            "\n",
            "--xyz\n\npart\n--xyz--\n"
        );
        assert_eq!(normalize(raw).unwrap(), Normalized::Multipart);
    }

    #[test]
    fn test_missing_date_fails() {
        let err = normalize("Subject: s\n\n").unwrap_err();
        assert!(matches!(err, Error::Mime(_)));
    }

    #[test]
    fn test_malformed_date_fails() {
        let err = normalize("Date: someday\nSubject: s\n\n").unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[test]
    fn test_missing_subject_fails() {
        let err = normalize("Date: Mon, 1 Jan 2001 00:00:00 +0000\n\n").unwrap_err();
        assert!(matches!(err, Error::Mime(_)));
    }

    #[test]
    fn test_leading_continuation_line_dropped() {
        let record = record(" lead\nDate: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\n\nbody");
        assert_eq!(record.get_str("subject"), Some("s"));
        assert_eq!(record.get_str("body"), Some("body"));
        assert!(record.keys().all(|key| key != "lead" && !key.is_empty()));
    }

    #[test]
    fn test_serializes_non_ascii_literally() {
        let raw = "Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: café\n\nnaïve";
        let json = serde_json::to_string(&record(raw)).unwrap();
        assert!(json.contains("\"subject\":\"café\""));
        assert!(json.contains("\"body\":\"naïve\""));
    }

    #[test]
    fn test_set_categories() {
        let mut record = record(SIMPLE);
        record
            .set_categories(&[CategoryLabel::new("1", "1"), CategoryLabel::new("3", "5")])
            .unwrap();
        assert_eq!(
            record.get("categories"),
            Some(&serde_json::json!([{"n1": "1", "n2": "1"}, {"n1": "3", "n2": "5"}]))
        );
    }

    proptest! {
        #[test]
        fn split_recipients_has_no_blank_or_padded_entries(value in "[a-z@. ,\t]{0,60}") {
            for addr in split_recipients(&value) {
                prop_assert!(!addr.is_empty());
                prop_assert_eq!(addr.trim(), addr.as_str());
                prop_assert!(!addr.contains(','));
            }
        }

        #[test]
        fn no_recipient_iff_primary_lists_empty(
            to in "[a-z, ]{0,12}",
            cc in "[a-z, ]{0,12}",
            bcc in "[a-z, ]{0,12}",
        ) {
            let raw = format!(
                "Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\nTo: {to}\nCc: {cc}\nBcc: {bcc}\n\n"
            );
            let record = record(&raw);
            let expected = split_recipients(&to).is_empty()
                && split_recipients(&cc).is_empty()
                && split_recipients(&bcc).is_empty();
            prop_assert_eq!(record.no_recipient(), expected);
        }
    }
}
