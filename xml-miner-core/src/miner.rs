//! Miners: run a selector set over a stream of documents
//!
//! `XmlMiner` handles flat XML with flat selectors, `TrxmlMiner` handles
//! TRXML with itemized selectors. Both parse each document, select its
//! values and hand rows to a `Sink`. Problems with a single document are
//! reported and the document is skipped.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::{Document, DocumentError, TrxmlDocument, XmlDocument};
use crate::output::{normalize_value, Sink, SinkError};
use crate::selector::{
    DocumentKind, Fields, FlatSelection, Mode, Selection, SelectorError, SelectorSet,
};
use crate::source::SourceError;

/// Errors that abort a whole mining run
#[derive(Error, Debug)]
pub enum MinerError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Why a single document was skipped
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("failed to load document: {0}")]
    Source(#[from] SourceError),
    #[error("can not parse document: {0}")]
    Parse(#[from] DocumentError),
    #[error("can not select from document: {0}")]
    Select(#[from] SelectorError),
}

/// Receives progress from a mining run
pub trait Reporter {
    /// A document was skipped; `document` is its raw text, if any was read
    fn skipped(&mut self, reason: &SkipReason, document: &str);

    /// The run is complete
    fn summary(&mut self, summary: &MineSummary);
}

/// Reports through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn skipped(&mut self, reason: &SkipReason, document: &str) {
        warn!("{}, skip", reason);
        if !document.is_empty() {
            debug!("skipped document:\n{}", document);
        }
    }

    fn summary(&mut self, summary: &MineSummary) {
        info!(
            "found total {} values from {} docs",
            summary.values, summary.documents
        );
        if summary.per_selector.len() > 1 {
            for (selector, count) in summary.per_selector.iter() {
                info!("- found {} {}", count, selector);
            }
        }
    }
}

/// Counts gathered while saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineSummary {
    /// Documents that were parsed and selected from
    pub documents: usize,
    /// Non-empty values written
    pub values: usize,
    /// Non-empty values written per selector, in selector order
    pub per_selector: Fields<usize>,
}

impl MineSummary {
    fn new(selectors: &SelectorSet) -> Self {
        MineSummary {
            documents: 0,
            values: 0,
            per_selector: selectors.iter().map(|s| (s.text(), 0)).collect(),
        }
    }

    fn record(&mut self, selector: &str) {
        self.values += 1;
        let count = self.per_selector.get(selector).copied().unwrap_or(0);
        self.per_selector.insert(selector, count + 1);
    }
}

/// What was selected from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mined<T> {
    pub filename: String,
    pub selection: T,
}

fn mine_documents<'a, I, D, T>(
    documents: I,
    reporter: &'a mut dyn Reporter,
    parse: fn(&str) -> Result<D, DocumentError>,
    select: impl Fn(&D) -> Result<T, SelectorError> + 'a,
) -> impl Iterator<Item = Mined<T>> + 'a
where
    I: IntoIterator<Item = Result<String, SourceError>>,
    I::IntoIter: 'a,
    D: Document + 'a,
    T: 'a,
{
    documents.into_iter().filter_map(move |document| {
        let text = match document {
            Ok(text) => text,
            Err(e) => {
                reporter.skipped(&SkipReason::Source(e), "");
                return None;
            }
        };

        let parsed = match parse(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                reporter.skipped(&SkipReason::Parse(e), &text);
                return None;
            }
        };

        match select(&parsed) {
            Ok(selection) => Some(Mined {
                filename: parsed.filename().to_string(),
                selection,
            }),
            Err(e) => {
                reporter.skipped(&SkipReason::Select(e), &text);
                None
            }
        }
    })
}

/// Selects flat selectors from XML documents
#[derive(Debug, Clone)]
pub struct XmlMiner {
    selectors: SelectorSet,
    with_field_name: bool,
}

impl XmlMiner {
    /// Fails when the set is not made of flat selectors
    pub fn new(selectors: SelectorSet, with_field_name: bool) -> Result<Self, SelectorError> {
        selectors.expect_kind(DocumentKind::Xml)?;
        Ok(XmlMiner {
            selectors,
            with_field_name,
        })
    }

    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// `filename`, `value` and, with field names, `field`
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["filename".to_string(), "value".to_string()];
        if self.with_field_name {
            header.push("field".to_string());
        }
        header
    }

    pub fn mine<'a, I>(
        &'a self,
        documents: I,
        reporter: &'a mut dyn Reporter,
    ) -> impl Iterator<Item = Mined<FlatSelection>> + 'a
    where
        I: IntoIterator<Item = Result<String, SourceError>>,
        I::IntoIter: 'a,
    {
        mine_documents(documents, reporter, XmlDocument::from_string, move |document: &XmlDocument| {
            self.selectors.select_flat(document)
        })
    }

    /// Write the header, then one row per non-empty value
    pub fn mine_and_save<I>(
        &self,
        documents: I,
        sink: &mut dyn Sink,
        reporter: &mut dyn Reporter,
    ) -> Result<MineSummary, MinerError>
    where
        I: IntoIterator<Item = Result<String, SourceError>>,
    {
        let mut summary = MineSummary::new(&self.selectors);
        sink.store(&self.header())?;

        for mined in self.mine(documents, &mut *reporter) {
            summary.documents += 1;
            for (selector, values) in mined.selection.iter() {
                for value in values {
                    let value = normalize_value(value);
                    if value.is_empty() {
                        continue;
                    }
                    let mut row = vec![mined.filename.clone(), value];
                    if self.with_field_name {
                        row.push(selector.to_string());
                    }
                    sink.store(&row)?;
                    summary.record(selector);
                }
            }
        }

        reporter.summary(&summary);
        Ok(summary)
    }
}

/// Selects itemized selectors from TRXML documents
#[derive(Debug, Clone)]
pub struct TrxmlMiner {
    selectors: SelectorSet,
}

impl TrxmlMiner {
    /// Fails when the set is not made of itemized selectors
    pub fn new(selectors: SelectorSet) -> Result<Self, SelectorError> {
        selectors.expect_kind(DocumentKind::Trxml)?;
        Ok(TrxmlMiner { selectors })
    }

    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// Singleton sets: `filename` then every selector.
    /// Multi-item sets: `filename`, the item group, then every field name.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["filename".to_string()];
        match self.selectors.mode() {
            Mode::MultiItem => {
                header.push(self.selectors.shared_itemgroup().unwrap_or_default().to_string());
                header.extend(
                    self.selectors
                        .iter()
                        .filter_map(|s| s.as_itemized())
                        .map(|s| s.field().to_string()),
                );
            }
            _ => header.extend(self.selectors.iter().map(|s| s.text().to_string())),
        }
        header
    }

    pub fn mine<'a, I>(
        &'a self,
        documents: I,
        reporter: &'a mut dyn Reporter,
    ) -> impl Iterator<Item = Mined<Selection>> + 'a
    where
        I: IntoIterator<Item = Result<String, SourceError>>,
        I::IntoIter: 'a,
    {
        mine_documents(documents, reporter, TrxmlDocument::from_string, move |document: &TrxmlDocument| {
            self.selectors.select(document)
        })
    }

    /// Write the header, then one row per document (singleton) or per
    /// item (multi-item)
    pub fn mine_and_save<I>(
        &self,
        documents: I,
        sink: &mut dyn Sink,
        reporter: &mut dyn Reporter,
    ) -> Result<MineSummary, MinerError>
    where
        I: IntoIterator<Item = Result<String, SourceError>>,
    {
        let mut summary = MineSummary::new(&self.selectors);
        sink.store(&self.header())?;

        match self.selectors.mode() {
            Mode::MultiItem => {
                let select = |document: &TrxmlDocument| self.selectors.select_items(document);
                for mined in mine_documents(documents, &mut *reporter, TrxmlDocument::from_string, select) {
                    summary.documents += 1;
                    for (index, fields) in mined.selection {
                        let row = document_row(&mined.filename, Some(index.as_str()), &fields, &mut summary);
                        sink.store(&row)?;
                    }
                }
            }
            _ => {
                let select = |document: &TrxmlDocument| self.selectors.select_singletons(document);
                for mined in mine_documents(documents, &mut *reporter, TrxmlDocument::from_string, select) {
                    summary.documents += 1;
                    let row = document_row(&mined.filename, None, &mined.selection, &mut summary);
                    sink.store(&row)?;
                }
            }
        }

        reporter.summary(&summary);
        Ok(summary)
    }
}

fn document_row(filename: &str, index: Option<&str>, fields: &Fields<String>, summary: &mut MineSummary) -> Vec<String> {
    let mut row = vec![filename.to_string()];
    row.extend(index.map(str::to_string));
    for (selector, value) in fields.iter() {
        let value = normalize_value(value);
        if !value.is_empty() {
            summary.record(selector);
        }
        row.push(value);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        skipped: Vec<String>,
        summaries: usize,
    }

    impl Reporter for Collect {
        fn skipped(&mut self, reason: &SkipReason, _document: &str) {
            self.skipped.push(reason.to_string());
        }

        fn summary(&mut self, _summary: &MineSummary) {
            self.summaries += 1;
        }
    }

    fn docs(texts: &[&str]) -> Vec<Result<String, SourceError>> {
        texts.iter().map(|t| Ok(t.to_string())).collect()
    }

    #[test]
    fn test_xml_miner_rejects_itemized_selectors() {
        let selectors = SelectorSet::from_selector_string("education.degree").unwrap();
        assert!(matches!(
            XmlMiner::new(selectors, false),
            Err(SelectorError::UnexpectedKind { .. })
        ));
    }

    #[test]
    fn test_trxml_miner_rejects_flat_selectors() {
        let selectors = SelectorSet::from_selector_string("name").unwrap();
        assert!(TrxmlMiner::new(selectors).is_err());
    }

    #[test]
    fn test_xml_rows_skip_empty_values() {
        let miner = XmlMiner::new(SelectorSet::from_selector_string("name,skill").unwrap(), true).unwrap();
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut reporter = Collect::default();

        let summary = miner
            .mine_and_save(
                docs(&["<begin filename=\"a.pdf\"><name>Foo</name><name></name><skill>java</skill></begin>"]),
                &mut rows,
                &mut reporter,
            )
            .unwrap();

        assert_eq!(
            rows,
            vec![
                vec!["filename", "value", "field"],
                vec!["a.pdf", "Foo", "name"],
                vec!["a.pdf", "java", "skill"],
            ]
        );
        assert_eq!(summary.documents, 1);
        assert_eq!(summary.values, 2);
        assert_eq!(summary.per_selector.get("name"), Some(&1));
        assert_eq!(reporter.summaries, 1);
    }

    #[test]
    fn test_unparsable_document_is_skipped() {
        let miner = XmlMiner::new(SelectorSet::from_selector_string("name").unwrap(), false).unwrap();
        let mut reporter = Collect::default();

        let mined: Vec<_> = miner
            .mine(docs(&["<begin><name>", "<begin filename=\"b\"><name>x</name></begin>"]), &mut reporter)
            .collect();

        assert_eq!(mined.len(), 1);
        assert_eq!(mined[0].filename, "b");
        assert_eq!(reporter.skipped.len(), 1);
        assert!(reporter.skipped[0].starts_with("can not parse document"));
    }

    #[test]
    fn test_trxml_without_structure_is_skipped() {
        let miner = TrxmlMiner::new(SelectorSet::from_selector_string("personal.name").unwrap()).unwrap();
        let mut reporter = Collect::default();

        let mined: Vec<_> = miner
            .mine(docs(&["<TextractorResult><Document filename=\"a\"/></TextractorResult>"]), &mut reporter)
            .collect();

        assert!(mined.is_empty());
        assert_eq!(reporter.skipped.len(), 1);
    }

    #[test]
    fn test_trxml_headers() {
        let singleton = TrxmlMiner::new(SelectorSet::from_selector_string("personal.0.name,education.0.degree").unwrap()).unwrap();
        assert_eq!(singleton.header(), vec!["filename", "personal.0.name", "education.0.degree"]);

        let multi = TrxmlMiner::new(SelectorSet::from_itemgroup_and_fields("education", "degree,institute").unwrap()).unwrap();
        assert_eq!(multi.header(), vec!["filename", "education", "degree", "institute"]);
    }

    const RESUME: &str = r#"<TextractorResult>
  <Document filename="cv.pdf"/>
  <DocumentStructure>
    <ItemGroup key="personal">
      <Item index="0"><Field key="name"><Value>Foo Bar</Value></Field></Item>
    </ItemGroup>
    <ItemGroup key="education">
      <Item index="0"><Field key="degree"><Value>BSc</Value></Field></Item>
      <Item index="1"><Field key="degree"><Value>MSc</Value></Field></Item>
    </ItemGroup>
  </DocumentStructure>
</TextractorResult>"#;

    #[test]
    fn test_trxml_singleton_rows() {
        let miner = TrxmlMiner::new(SelectorSet::from_selector_string("personal.0.name,education.1.degree").unwrap()).unwrap();
        let mut rows: Vec<Vec<String>> = Vec::new();

        let summary = miner.mine_and_save(docs(&[RESUME]), &mut rows, &mut Collect::default()).unwrap();

        assert_eq!(
            rows,
            vec![
                vec!["filename", "personal.0.name", "education.1.degree"],
                vec!["cv.pdf", "Foo Bar", "MSc"],
            ]
        );
        assert_eq!(summary.values, 2);
    }

    #[test]
    fn test_trxml_multi_item_rows() {
        let miner = TrxmlMiner::new(SelectorSet::from_itemgroup_and_fields("education", "degree").unwrap()).unwrap();
        let mut rows: Vec<Vec<String>> = Vec::new();

        miner.mine_and_save(docs(&[RESUME]), &mut rows, &mut Collect::default()).unwrap();

        assert_eq!(
            rows,
            vec![
                vec!["filename", "education", "degree"],
                vec!["cv.pdf", "0", "BSc"],
                vec!["cv.pdf", "1", "MSc"],
            ]
        );
    }
}
