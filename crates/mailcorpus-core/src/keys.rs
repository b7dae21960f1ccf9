//! Field name normalization.
//!
//! Downstream schema inference wants identifier-like keys, so hyphenated
//! header names such as `x-to` become `xTo`.

/// Converts a hyphenated name to camel case.
///
/// The first segment is kept as is. Every following segment gets its first
/// character upper-cased and the rest left untouched. Empty segments vanish
/// from the joined output.
///
/// ```ignore
/// assert_eq!(to_camel_case("content-transfer-encoding"), "contentTransferEncoding");
/// ```
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let mut parts = name.split('-');
    let mut out = String::with_capacity(name.len());
    out.push_str(parts.next().unwrap_or_default());

    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_segment_unchanged() {
        assert_eq!(to_camel_case("subject"), "subject");
        assert_eq!(to_camel_case("dateRaw"), "dateRaw");
    }

    #[test]
    fn test_recipient_fields() {
        assert_eq!(to_camel_case("x-to"), "xTo");
        assert_eq!(to_camel_case("x-cc"), "xCc");
        assert_eq!(to_camel_case("x-bcc"), "xBcc");
    }

    #[test]
    fn test_multiple_segments() {
        assert_eq!(
            to_camel_case("content-transfer-encoding"),
            "contentTransferEncoding"
        );
        assert_eq!(to_camel_case("mime-version"), "mimeVersion");
    }

    #[test]
    fn test_empty_segments() {
        assert_eq!(to_camel_case(""), "");
        assert_eq!(to_camel_case("a--b"), "aB");
        assert_eq!(to_camel_case("-a"), "A");
        assert_eq!(to_camel_case("a-"), "a");
    }

    #[test]
    fn test_rest_of_segment_untouched() {
        assert_eq!(to_camel_case("x-fileName"), "xFileName");
    }

    proptest! {
        #[test]
        fn lower_hyphenated_names_become_identifiers(
            name in "[a-z][a-z0-9]{0,8}(-[a-z][a-z0-9]{0,8}){0,4}"
        ) {
            let camel = to_camel_case(&name);
            prop_assert!(!camel.contains('-'));
            prop_assert!(camel.chars().next().is_some_and(|c| c.is_ascii_lowercase()));
            prop_assert_eq!(camel.to_lowercase(), name.replace('-', ""));
        }
    }
}
