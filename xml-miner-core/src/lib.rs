//! xml-miner-core: field extraction from XML and TRXML documents
//!
//! This library provides:
//! - A small document model over flat XML and TRXML
//! - Flat and itemized selectors, grouped and validated as selector sets
//! - Document sources: directories, multi-document files, annotation servers
//! - Record output as tab-delimited, JSON lines or plain text

pub mod document;
pub mod miner;
pub mod output;
pub mod selector;
pub mod source;

pub use document::{Document, DocumentError, Entity, Tree, TrxmlDocument, XmlDocument, UNKNOWN_FILENAME};
pub use miner::{MineSummary, Mined, MinerError, Reporter, SkipReason, TracingReporter, TrxmlMiner, XmlMiner};
pub use output::{normalize_value, OutputFormat, RecordSink, Sink, SinkError, STDOUT};
pub use selector::{
    Cardinality, DocumentKind, Fields, FlatSelection, ItemIndex, ItemSelection, ItemizedSelector, Mode,
    Selection, Selector, SelectorError, SelectorSet, SingletonSelection,
};
pub use source::{DocumentSource, ServerQuery, SourceError};
