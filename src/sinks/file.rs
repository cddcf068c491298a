//! Append-only file sink

use super::format_line;
use crate::core::{LoggerError, Message, Result, Sink};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one text line per message to a file it holds an exclusive lock on.
///
/// A second process (or a second sink) pointing at the same path fails with
/// [`LoggerError::FileLockError`] instead of interleaving lines.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("opening log file", path.display().to_string(), e))?;

        file.try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn receive(&mut self, message: &Message) -> Result<()> {
        let line = format_line(message, message.level().to_str());
        writeln!(self.writer, "{}", line)
            .map_err(|e| LoggerError::file_sink(self.path.display().to_string(), e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.flush();
        let _ = FileExt::unlock(self.writer.get_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_writes_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        {
            let mut sink = FileSink::new(&path).unwrap();
            sink.receive(&Message::new(LogLevel::Info, "first")).unwrap();
            sink.receive(&Message::new(LogLevel::Error, "second")).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("INFO ") && lines[0].ends_with("] first"));
        assert!(lines[1].starts_with("ERROR ") && lines[1].ends_with("] second"));
    }

    #[test]
    fn test_second_sink_on_same_file_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.log");

        let _first = FileSink::new(&path).unwrap();
        assert!(matches!(
            FileSink::new(&path),
            Err(LoggerError::FileLockError { .. })
        ));
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        assert!(matches!(
            FileSink::new(&path),
            Err(LoggerError::IoOperation { .. })
        ));
    }
}
