//! Record formatters for the supported output formats

use std::path::Path;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated columns, `'`-quoted when needed
    Delimited,
    /// One JSON array per line
    JsonLines,
    /// Tab-joined fields, no quoting
    Text,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" | "tsv" => Some(OutputFormat::Delimited),
            "jsonl" => Some(OutputFormat::JsonLines),
            "txt" | "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }

    /// Get list of all valid format names
    pub fn valid_formats() -> &'static [&'static str] {
        &["csv", "tsv", "jsonl", "txt"]
    }

    /// Pick the format from an output path's extension; anything unknown
    /// is plain text
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
            .unwrap_or(OutputFormat::Text)
    }

    /// Render one record as a single terminated line
    pub fn format_record<S: AsRef<str>>(&self, record: &[S]) -> Result<String, serde_json::Error> {
        let mut line = match self {
            OutputFormat::Delimited => format_delimited(record),
            OutputFormat::JsonLines => {
                let fields: Vec<&str> = record.iter().map(|field| field.as_ref()).collect();
                serde_json::to_string(&fields)?
            }
            OutputFormat::Text => record.iter().map(|field| field.as_ref()).collect::<Vec<_>>().join("\t"),
        };
        line.push('\n');
        Ok(line)
    }
}

const DELIMITER: char = '\t';
const QUOTE: char = '\'';

fn format_delimited<S: AsRef<str>>(record: &[S]) -> String {
    record
        .iter()
        .map(|field| quote_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join("\t")
}

/// Quote a field only if it contains the delimiter, the quote character or
/// a line break; embedded quotes are doubled
fn quote_field(field: &str) -> String {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r');

    if !needs_quotes {
        return field.to_string();
    }

    let escaped = field.replace(QUOTE, "''");
    format!("{QUOTE}{escaped}{QUOTE}")
}

/// Make a value safe for one-record-per-line output:
/// newlines become `__NEWLINE__`, tabs become four spaces
pub fn normalize_value(value: &str) -> String {
    value.replace('\n', "__NEWLINE__").replace('\t', "    ")
}
