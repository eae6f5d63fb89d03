//! Record sinks: where selected rows end up

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::OutputFormat;

/// Target name that writes to standard output
pub const STDOUT: &str = "STDOUT";

/// Errors that can occur while writing records
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to open output {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write output: {0}")]
    Write(#[from] io::Error),
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Anything that accepts one ordered record of string fields at a time
pub trait Sink {
    fn store(&mut self, record: &[String]) -> Result<(), SinkError>;
}

/// Collects records in memory
impl Sink for Vec<Vec<String>> {
    fn store(&mut self, record: &[String]) -> Result<(), SinkError> {
        self.push(record.to_vec());
        Ok(())
    }
}

/// Buffered writer that formats each record on its own line.
///
/// The buffer is flushed by `finish`, and on drop as a fallback.
pub struct RecordSink {
    format: OutputFormat,
    writer: BufWriter<Box<dyn Write>>,
}

impl RecordSink {
    /// Open `STDOUT` or a file path; the format follows the file extension
    /// and missing parent directories are created
    pub fn open(target: &str) -> Result<Self, SinkError> {
        if target == STDOUT {
            return Ok(Self::from_writer(Box::new(io::stdout()), OutputFormat::Text));
        }

        let path = Path::new(target);
        let open_error = |source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_error)?;
        }
        let file = File::create(path).map_err(open_error)?;

        Ok(Self::from_writer(Box::new(file), OutputFormat::from_path(path)))
    }

    pub fn from_writer(writer: Box<dyn Write>, format: OutputFormat) -> Self {
        RecordSink {
            format,
            writer: BufWriter::new(writer),
        }
    }

    /// Override the format picked from the target
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Flush everything written so far
    pub fn finish(mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Sink for RecordSink {
    fn store(&mut self, record: &[String]) -> Result<(), SinkError> {
        let line = self.format.format_record(record)?;
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/values.jsonl");

        let mut sink = RecordSink::open(path.to_str().unwrap()).unwrap();
        assert_eq!(sink.format(), OutputFormat::JsonLines);
        sink.store(&record(&["filename", "value"])).unwrap();
        sink.store(&record(&["a.pdf", "java"])).unwrap();
        sink.finish().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[\"filename\",\"value\"]\n[\"a.pdf\",\"java\"]\n");
    }

    #[test]
    fn test_delimited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.tsv");

        let mut sink = RecordSink::open(path.to_str().unwrap()).unwrap();
        sink.store(&record(&["a.pdf", "it's"])).unwrap();
        sink.finish().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a.pdf\t'it''s'\n");
    }

    #[test]
    fn test_flush_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.txt");
        {
            let mut sink = RecordSink::open(path.to_str().unwrap()).unwrap();
            sink.store(&record(&["a", "b"])).unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\tb\n");
    }

    #[test]
    fn test_open_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let target = blocker.join("values.csv");

        let err = RecordSink::open(target.to_str().unwrap()).err().unwrap();
        assert!(matches!(err, SinkError::Open { .. }));
        assert!(err.to_string().contains("values.csv") || err.to_string().contains("file"));
    }

    #[test]
    fn test_vec_sink() {
        let mut rows: Vec<Vec<String>> = Vec::new();
        rows.store(&record(&["x"])).unwrap();
        assert_eq!(rows, vec![vec!["x".to_string()]]);
    }
}
