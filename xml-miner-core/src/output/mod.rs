//! Output of selected values
//!
//! Supports three record formats, chosen from the output file extension:
//! - csv/tsv: tab-delimited columns with minimal `'` quoting
//! - jsonl: one JSON array per record
//! - anything else (and STDOUT): tab-joined plain text

mod formatter;
mod sink;

pub use formatter::{normalize_value, OutputFormat};
pub use sink::{RecordSink, Sink, SinkError, STDOUT};
