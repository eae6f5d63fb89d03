//! Document sources
//!
//! A source yields the raw text of one logical document at a time, whether
//! the documents live in a directory, in one multi-document container file,
//! or behind an annotation server.

mod annotation;
mod container;
mod directory;

pub use annotation::{AnnotationClient, AnnotationServerSource, ServerQuery};
pub use container::{header_for, split_documents, ContainerSource, TRXML_HEADER, XML_HEADER};
pub use directory::DirectorySource;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::selector::DocumentKind;

/// Errors that can occur while locating or reading documents
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("could not determine source type of '{0}': expected a directory, a file or host:port")]
    Unresolved(String),
    #[error("annotation server sources are only supported for xml documents: '{0}'")]
    UnsupportedServer(String),
    #[error("no file found in {}, please check the directory contains documents", .0.display())]
    EmptyDirectory(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid annotation server address '{0}', expected host:port")]
    InvalidAddress(String),
    #[error("not able to send or receive data from {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("unexpected welcome message from {host}:{port}: '{response}'")]
    Handshake {
        host: String,
        port: u16,
        response: String,
    },
    #[error("failed to decode the message from {host}:{port}")]
    Decode { host: String, port: u16 },
    #[error("failed to fetch document {id}: {source}")]
    Fetch {
        id: String,
        #[source]
        source: Box<SourceError>,
    },
}

/// Where documents come from, resolved from a command-line string
pub enum DocumentSource {
    Directory(DirectorySource),
    Container(ContainerSource),
    AnnotationServer(AnnotationServerSource),
}

impl DocumentSource {
    /// Resolve `location` as, in order: an existing directory, an existing
    /// container file, or a `host:port` annotation server (xml only)
    pub fn resolve(location: &str, kind: DocumentKind, query: &ServerQuery) -> Result<Self, SourceError> {
        let path = Path::new(location);

        if path.is_dir() {
            info!("reading {} documents in dir {}", kind, location);
            return Ok(DocumentSource::Directory(DirectorySource::open(path)?));
        }

        if path.is_file() {
            info!("reading multi-document {} file {}", kind, location);
            return Ok(DocumentSource::Container(ContainerSource::open(path, header_for(kind))?));
        }

        if location.contains(':') {
            if kind != DocumentKind::Xml {
                return Err(SourceError::UnsupportedServer(location.to_string()));
            }
            let (host, port) = AnnotationClient::parse_address(location)?;
            info!("connecting annotation server: host {} and port {}", host, port);
            let client = AnnotationClient::new(host, port, &query.user, &query.password);
            return Ok(DocumentSource::AnnotationServer(AnnotationServerSource::open(client, &query.query)?));
        }

        Err(SourceError::Unresolved(location.to_string()))
    }
}

impl Iterator for DocumentSource {
    type Item = Result<String, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            DocumentSource::Directory(source) => source.next(),
            DocumentSource::Container(source) => source.next().map(Ok),
            DocumentSource::AnnotationServer(source) => source.next(),
        }
    }
}
