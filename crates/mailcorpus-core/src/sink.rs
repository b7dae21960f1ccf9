//! Newline-delimited JSON output.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// Append-only writer of one compact JSON object per line.
///
/// Non-ASCII text is written as UTF-8, not escaped.
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    /// Wraps an output stream.
    pub const fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Writes one value followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Number of lines written so far.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_object_per_line() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.write(&json!({"id": "1.txt"})).unwrap();
        writer.write(&json!({"id": "2.txt", "subject": "héllo"})).unwrap();
        assert_eq!(writer.lines(), 2);

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "{\"id\":\"1.txt\"}\n{\"id\":\"2.txt\",\"subject\":\"héllo\"}\n"
        );
    }
}
