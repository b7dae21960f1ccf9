//! Run options.

/// Recipient-style headers that are split into address lists.
pub const RECIPIENT_FIELDS: [&str; 6] = ["to", "x-to", "cc", "x-cc", "bcc", "x-bcc"];

/// Recipient headers that decide the `noRecipient` flag.
pub const PRIMARY_RECIPIENT_FIELDS: [&str; 3] = ["to", "cc", "bcc"];

/// Options controlling how a tree is grouped and records are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Suffix that marks a category sidecar file.
    pub category_suffix: String,
    /// Files that form no record when they are alone in their group.
    pub ignored_files: Vec<String>,
    /// Headers split into address lists (always present in the output).
    pub recipient_fields: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            category_suffix: ".cats".to_string(),
            // Ships with the labeled corpus archive as a taxonomy legend
            ignored_files: vec!["categories.txt".to_string()],
            recipient_fields: RECIPIENT_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Options {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the category suffix.
    #[must_use]
    pub fn with_category_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.category_suffix = suffix.into();
        self
    }

    /// Returns true if `filename` is a category sidecar.
    #[must_use]
    pub fn is_category_file(&self, filename: &str) -> bool {
        filename.ends_with(&self.category_suffix)
    }

    /// Returns true if a group made of exactly `filenames` must be ignored.
    #[must_use]
    pub fn is_ignored_group(&self, filenames: &[String]) -> bool {
        matches!(filenames, [only] if self.ignored_files.contains(only))
    }
}
