//! Script output: CRLF text with `GO` batch separators.

use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Batch separator line.
pub const BATCH_SEPARATOR: &str = "GO";

const CRLF: &str = "\r\n";

/// Appends lines, statements and batch separators to a text sink.
///
/// Every line ends with CRLF. Line endings embedded in statement text are
/// normalized, so a module body stored with LF endings comes out as CRLF too.
pub struct ScriptWriter<W: Write> {
    inner: W,
}

impl<W: Write> ScriptWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one line of text.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        for part in split_lines(text) {
            self.inner.write_all(part.as_bytes())?;
            self.inner.write_all(CRLF.as_bytes())?;
        }
        Ok(())
    }

    /// Write `text` verbatim plus CRLF. Used for statements carrying data
    /// literals, where embedded line endings are part of the value.
    ///
    /// A value holding a line that reads `GO` on its own still ends up on a
    /// line of its own here, and sqlcmd or SSMS will split the batch there.
    /// Literals are not rewritten to avoid it.
    pub fn verbatim_line(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())?;
        self.inner.write_all(CRLF.as_bytes())
    }

    pub fn blank_line(&mut self) -> io::Result<()> {
        self.inner.write_all(CRLF.as_bytes())
    }

    /// Write a `-- text` comment line.
    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        self.line(&format!("-- {}", text))
    }

    /// Write a section header: a comment followed by a blank line.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        self.comment(title)?;
        self.blank_line()
    }

    /// Write a bare `GO` line.
    pub fn batch_separator(&mut self) -> io::Result<()> {
        self.line(BATCH_SEPARATOR)
    }

    /// Write one statement, trimmed, followed by `GO` and a blank line.
    pub fn statement(&mut self, sql: &str) -> io::Result<()> {
        self.line(sql.trim())?;
        self.batch_separator()?;
        self.blank_line()
    }

    /// Write each statement in order.
    pub fn statements<I, S>(&mut self, statements: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for sql in statements {
            self.statement(sql.as_ref())?;
        }
        Ok(())
    }

    /// Flush and return the underlying sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Split on CRLF, CR or LF. A trailing line ending does not add an empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let trimmed = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text);

    trimmed
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| line.split('\r'))
}

/// Replace `path` with `contents` (create or truncate).
///
/// Callers render a whole category into memory first, so a failure while
/// reading the catalog never leaves a partial script behind.
pub fn write_script_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents)?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut ScriptWriter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut writer = ScriptWriter::new(Vec::new());
        f(&mut writer).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_statement_gets_separator_and_blank() {
        let out = render(|w| w.statement("  CREATE TABLE [dbo].[T] ([Id] [int])\n"));
        assert_eq!(out, "CREATE TABLE [dbo].[T] ([Id] [int])\r\nGO\r\n\r\n");
    }

    #[test]
    fn test_embedded_line_endings_normalized() {
        let out = render(|w| w.statement("CREATE VIEW v\nAS\r\nSELECT 1\rFROM t"));
        assert_eq!(out, "CREATE VIEW v\r\nAS\r\nSELECT 1\r\nFROM t\r\nGO\r\n\r\n");
    }

    #[test]
    fn test_section_header() {
        let out = render(|w| w.section("TABLES"));
        assert_eq!(out, "-- TABLES\r\n\r\n");
    }

    #[test]
    fn test_statements_in_order() {
        let out = render(|w| w.statements(["SELECT 1", "SELECT 2"]));
        assert_eq!(out, "SELECT 1\r\nGO\r\n\r\nSELECT 2\r\nGO\r\n\r\n");
    }

    #[test]
    fn test_blank_lines_inside_body_preserved() {
        let out = render(|w| w.line("a\n\nb"));
        assert_eq!(out, "a\r\n\r\nb\r\n");
    }

    #[test]
    fn test_verbatim_line_keeps_embedded_newlines() {
        let out = render(|w| w.verbatim_line("insert into t (a) values ('x\ny')"));
        assert_eq!(out, "insert into t (a) values ('x\ny')\r\n");
    }

    #[test]
    fn test_write_script_file_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.sql");
        std::fs::write(&path, "old content that is longer").unwrap();

        write_script_file(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
