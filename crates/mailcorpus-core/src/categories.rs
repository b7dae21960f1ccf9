//! Category sidecar parsing.
//!
//! A `.cats` file holds one label per line:
//!
//! ```text
//! n1,n2,n3
//! ```
//!
//! `n1` is the top-level category, `n2` the second-level category and `n3`
//! how often annotators assigned it. The frequency is read but not kept:
//! nested arrays of mixed records trip up the downstream schema inference.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A two-level taxonomy label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryLabel {
    /// Top-level category.
    pub n1: String,
    /// Second-level category.
    pub n2: String,
}

impl CategoryLabel {
    /// Creates a label.
    #[must_use]
    pub fn new(n1: impl Into<String>, n2: impl Into<String>) -> Self {
        Self {
            n1: n1.into(),
            n2: n2.into(),
        }
    }
}

/// Parses a single category line, terminator already stripped.
fn parse_line(line_no: usize, line: &str) -> Result<CategoryLabel> {
    let mut fields = line.split(',');
    match (fields.next(), fields.next()) {
        (Some(n1), Some(n2)) => {
            let _frequency = fields.next();
            Ok(CategoryLabel::new(n1, n2))
        }
        _ => Err(Error::MalformedCategory {
            line: line_no,
            content: line.to_string(),
        }),
    }
}

/// Parses category labels from a reader, preserving line order.
///
/// Empty lines are ignored. Duplicates are kept.
///
/// # Errors
///
/// Returns [`Error::MalformedCategory`] for a line with fewer than two
/// comma-separated fields, or an I/O error from the reader.
pub fn parse_categories<R: BufRead>(reader: R) -> Result<Vec<CategoryLabel>> {
    let mut labels = Vec::new();

    for (index, line) in reader.split(b'\n').enumerate() {
        let line = mailcorpus_mime::decode_text(&line?);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        labels.push(parse_line(index + 1, line)?);
    }

    Ok(labels)
}
