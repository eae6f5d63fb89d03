use std::fs;
use std::path::Path;
use std::vec;

use super::SourceError;
use crate::selector::DocumentKind;

/// First-line prefix of each document in a multi-document xml file
pub const XML_HEADER: &str = "<begin ";
/// First-line prefix of each document in a multi-document trxml file
pub const TRXML_HEADER: &str = "<TextractorResult ";

const DECLARATION: &str = "<?xml";

pub fn header_for(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Xml => XML_HEADER,
        DocumentKind::Trxml => TRXML_HEADER,
    }
}

/// Split concatenated documents at every line starting with `header`.
///
/// XML declaration lines are dropped. Lines before the first header belong
/// to the first document.
pub fn split_documents(text: &str, header: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.starts_with(header) {
            if !lines.is_empty() {
                documents.push(lines.join("\n"));
                lines.clear();
            }
            lines.push(line);
        } else if !line.starts_with(DECLARATION) {
            lines.push(line);
        }
    }

    if lines.iter().any(|line| !line.trim().is_empty()) {
        documents.push(lines.join("\n"));
    }
    documents
}

/// Documents of one multi-document file
pub struct ContainerSource {
    documents: vec::IntoIter<String>,
}

impl ContainerSource {
    pub fn open(path: &Path, header: &str) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_string(&text, header))
    }

    pub fn from_string(text: &str, header: &str) -> Self {
        ContainerSource {
            documents: split_documents(text, header).into_iter(),
        }
    }
}

impl Iterator for ContainerSource {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.documents.next()
    }
}
