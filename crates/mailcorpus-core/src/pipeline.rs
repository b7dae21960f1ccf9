//! Group-by-group conversion with fault isolation.
//!
//! Each [`FileGroup`] is turned into at most one output line. A malformed
//! message or category file only costs its own group: the failure is logged
//! with the group's files and the run moves on. Only output failures stop
//! the run.

use std::io::Write;

use tracing::{error, info, warn};

use crate::categories::parse_categories;
use crate::config::Options;
use crate::error::{Error, Result};
use crate::group::{FileGroup, SkipReason};
use crate::record::{EmailRecord, Normalized, normalize_email};
use crate::sink::JsonLinesWriter;
use crate::source::ContentSource;

/// What happened to one group.
#[derive(Debug)]
pub enum Outcome {
    /// A record was written.
    Written,
    /// The group intentionally produced no record.
    Skipped(SkipReason),
    /// Building the record failed; the group was dropped.
    Failed(Error),
}

/// Counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records written.
    pub written: usize,
    /// Groups skipped on purpose.
    pub skipped: usize,
    /// Groups dropped because of an error.
    pub failed: usize,
    /// Directories or entries that could not be scanned.
    pub scan_errors: usize,
}

impl RunSummary {
    /// Counts one outcome.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Written => self.written += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Converts file groups into JSON lines.
#[derive(Debug)]
pub struct Pipeline<S> {
    source: S,
    options: Options,
}

impl<S: ContentSource> Pipeline<S> {
    /// Creates a pipeline reading through `source`.
    pub const fn new(source: S, options: Options) -> Self {
        Self { source, options }
    }

    /// Builds the record for one group without writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed.
    pub fn build(&self, group: &FileGroup) -> Result<std::result::Result<EmailRecord, SkipReason>> {
        let files = match group.resolve(&self.options) {
            Ok(files) => files,
            Err(reason) => return Ok(Err(reason)),
        };

        let raw = self.source.read(&group.path(&files.email))?;
        let mut record = match normalize_email(&files.email, &raw, &self.options)? {
            Normalized::Record(record) => record,
            Normalized::Multipart => return Ok(Err(SkipReason::Multipart)),
        };

        if let Some(category) = &files.category {
            let content = self.source.read(&group.path(category))?;
            record.set_categories(&parse_categories(content.as_slice())?)?;
        }

        Ok(Ok(record))
    }

    /// Converts one group and writes its record, if any.
    ///
    /// Per-group problems are logged and reported in the [`Outcome`].
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the sink fails.
    pub fn process_group<W: Write>(
        &self,
        group: &FileGroup,
        sink: &mut JsonLinesWriter<W>,
    ) -> Result<Outcome> {
        match self.build(group) {
            Ok(Ok(record)) => {
                sink.write(&record)?;
                Ok(Outcome::Written)
            }
            Ok(Err(reason)) => {
                warn!(
                    dir = %group.dir.display(),
                    files = ?group.filenames,
                    %reason,
                    "Skipping group"
                );
                Ok(Outcome::Skipped(reason))
            }
            Err(e) => {
                error!(
                    dir = %group.dir.display(),
                    files = ?group.filenames,
                    error = %e,
                    "Failed to parse group"
                );
                Ok(Outcome::Failed(e))
            }
        }
    }

    /// Converts every group, continuing past per-group failures.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the sink fails.
    pub fn run<I, W>(&self, groups: I, sink: &mut JsonLinesWriter<W>) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<FileGroup>>,
        W: Write,
    {
        let mut summary = RunSummary::default();

        for group in groups {
            let group = match group {
                Ok(group) => group,
                Err(e) => {
                    error!(error = %e, "Failed to scan directory");
                    summary.scan_errors += 1;
                    continue;
                }
            };
            let outcome = self.process_group(&group, sink)?;
            summary.record(&outcome);
        }

        sink.flush()?;
        info!(
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failed,
            scan_errors = summary.scan_errors,
            "Conversion finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::path::PathBuf;

    const EMAIL: &str = concat!(
        "Date: Mon, 1 Jan 2001 00:00:00 -0800\n",
        "To: bob@enron.com\n",
        "Subject: hello\n",
        "\n",
        "body\n"
    );

    fn group(names: &[&str]) -> FileGroup {
        FileGroup {
            dir: PathBuf::from("/corpus/1"),
            base: "1".to_string(),
            filenames: names.iter().map(ToString::to_string).collect(),
        }
    }

    fn pipeline(source: MemorySource) -> Pipeline<MemorySource> {
        Pipeline::new(source, Options::default())
    }

    fn output(sink: JsonLinesWriter<Vec<u8>>) -> Vec<serde_json::Value> {
        let bytes = sink.into_inner().unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_email_with_categories() {
        let source = MemorySource::new()
            .with_file("/corpus/1/1.txt", EMAIL)
            .with_file("/corpus/1/1.cats", "1,1,1\n3,5,2\n");
        let mut sink = JsonLinesWriter::new(Vec::new());

        let outcome = pipeline(source)
            .process_group(&group(&["1.cats", "1.txt"]), &mut sink)
            .unwrap();
        assert!(matches!(outcome, Outcome::Written));

        let lines = output(sink);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["id"], "1.txt");
        assert_eq!(
            lines[0]["categories"],
            serde_json::json!([{"n1": "1", "n2": "1"}, {"n1": "3", "n2": "5"}])
        );
    }

    #[test]
    fn test_email_without_categories() {
        let source = MemorySource::new().with_file("/corpus/1/1.txt", EMAIL);
        let record = pipeline(source).build(&group(&["1.txt"])).unwrap().unwrap();
        assert_eq!(record.get("categories"), Some(&serde_json::json!([])));
    }

    #[test]
    fn test_orphan_category_skipped() {
        let source = MemorySource::new().with_file("/corpus/1/1.cats", "1,1,1\n");
        let mut sink = JsonLinesWriter::new(Vec::new());
        let outcome = pipeline(source)
            .process_group(&group(&["1.cats"]), &mut sink)
            .unwrap();
        assert!(matches!(
            outcome,
            Outcome::Skipped(SkipReason::MissingEmail { category: Some(_) })
        ));
        assert_eq!(sink.lines(), 0);
    }

    #[test]
    fn test_multipart_skipped() {
        let email = "Date: Mon, 1 Jan 2001 00:00:00 +0000\nSubject: s\nContent-Type: multipart/mixed; boundary=b\n\n--b\n\nx\n--b--\n";
        let source = MemorySource::new().with_file("/corpus/1/1.txt", email);
        let mut sink = JsonLinesWriter::new(Vec::new());
        let outcome = pipeline(source)
            .process_group(&group(&["1.txt"]), &mut sink)
            .unwrap();
        assert!(matches!(outcome, Outcome::Skipped(SkipReason::Multipart)));
        assert_eq!(sink.lines(), 0);
    }

    #[test]
    fn test_malformed_category_fails_group() {
        let source = MemorySource::new()
            .with_file("/corpus/1/1.txt", EMAIL)
            .with_file("/corpus/1/1.cats", "oops\n");
        let mut sink = JsonLinesWriter::new(Vec::new());
        let outcome = pipeline(source)
            .process_group(&group(&["1.cats", "1.txt"]), &mut sink)
            .unwrap();
        assert!(matches!(
            outcome,
            Outcome::Failed(Error::MalformedCategory { line: 1, .. })
        ));
        assert_eq!(sink.lines(), 0);
    }

    #[test]
    fn test_unreadable_file_fails_group() {
        let mut sink = JsonLinesWriter::new(Vec::new());
        let outcome = pipeline(MemorySource::new())
            .process_group(&group(&["1.txt"]), &mut sink)
            .unwrap();
        assert!(matches!(outcome, Outcome::Failed(Error::Io(_))));
    }

    #[test]
    fn test_run_isolates_failures() {
        let bad = "Date: whenever\nSubject: s\n\n";
        let source = MemorySource::new()
            .with_file("/corpus/1/1.txt", bad)
            .with_file("/corpus/1/2.txt", EMAIL)
            .with_file("/corpus/1/3.cats", "1,1,1\n");
        let groups = vec![
            Ok(group(&["1.txt"])),
            Err(Error::Io(std::io::Error::other("unreadable dir"))),
            Ok(group(&["2.txt"])),
            Ok(group(&["3.cats"])),
        ];
        let mut sink = JsonLinesWriter::new(Vec::new());

        let summary = pipeline(source).run(groups, &mut sink).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                written: 1,
                skipped: 1,
                failed: 1,
                scan_errors: 1,
            }
        );
        let lines = output(sink);
        assert_eq!(lines[0]["id"], "2.txt");
    }

    #[test]
    fn test_sink_failure_is_fatal() {
        struct BrokenPipe;
        impl Write for BrokenPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let source = MemorySource::new().with_file("/corpus/1/1.txt", EMAIL);
        let mut sink = JsonLinesWriter::new(BrokenPipe);
        let result = pipeline(source).run(vec![Ok(group(&["1.txt"]))], &mut sink);
        assert!(result.is_err());
    }
}
