//! Document model for flat XML and itemized TRXML records
//!
//! Both document kinds own a parsed `Tree` and expose a working entity, the
//! sub-root that selectors are evaluated against, plus a filename used as
//! the record key in every output row.

mod tree;
mod trxml;
mod xml;

pub use tree::{Entity, Tree};
pub use trxml::TrxmlDocument;
pub use xml::XmlDocument;

use std::path::PathBuf;
use thiserror::Error;

/// Filename used when a document does not carry one
pub const UNKNOWN_FILENAME: &str = "__UNKNOWN__";

/// Attribute holding the original filename
pub(crate) const FILENAME_ATTRIBUTE: &str = "filename";

/// Errors that can occur while loading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse: {0}")]
    Parse(String),
}

/// A parsed document that selectors can be applied to
pub trait Document {
    /// The underlying tree
    fn tree(&self) -> &Tree;

    /// Sub-root under which selection operates, if the document has one
    fn working_entity(&self) -> Option<Entity<'_>>;

    /// Best-effort identifier of the original file
    fn filename(&self) -> &str;

    /// The document element
    fn root(&self) -> Entity<'_> {
        self.tree().root()
    }
}

pub(crate) fn read_file(path: &std::path::Path) -> Result<String, DocumentError> {
    std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })
}
