//! Ordered selector sets and batch extraction

use std::fmt;

use strum_macros::Display;

use super::path::{find_item_group, items};
use super::selection::{Fields, FlatSelection, ItemSelection, Selection, SingletonSelection};
use super::validate::{uniform_attribute, valid_field_name};
use super::{Cardinality, DocumentKind, ItemizedSelector, MismatchKind, Selector, SelectorError};
use crate::document::{Document, Entity};

/// Extraction algorithm a selector set runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Mode {
    /// Tag search over flat XML
    #[strum(serialize = "flat")]
    Flat,
    /// One fixed item per selector
    #[strum(serialize = "singleton")]
    Singleton,
    /// Every item of one shared item group
    #[strum(serialize = "multi-item")]
    MultiItem,
}

/// Selectors sharing one origin string, classified once at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    selectors: Vec<Selector>,
    origin: String,
    mode: Mode,
    shared_itemgroup: Option<String>,
}

impl SelectorSet {
    /// Build a set, inferring its mode from the selectors
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Result<Self, SelectorError> {
        Self::with_overrides(selectors, None, None)
    }

    /// Build a set with an explicit cardinality and/or shared item group
    /// instead of inferring them
    pub fn with_overrides<S: AsRef<str>>(
        selectors: &[S],
        cardinality: Option<Cardinality>,
        shared_itemgroup: Option<String>,
    ) -> Result<Self, SelectorError> {
        let mut unique: Vec<Selector> = Vec::with_capacity(selectors.len());
        for text in selectors {
            let selector = Selector::parse(text.as_ref())?;
            // repeated selectors would collide as selection keys
            if !unique.contains(&selector) {
                unique.push(selector);
            }
        }
        let selectors = unique;

        let kind = uniform_attribute(&selectors, MismatchKind::DocumentKind, Selector::document_kind)?;

        let (mode, shared_itemgroup) = match kind {
            DocumentKind::Xml => (Mode::Flat, None),
            DocumentKind::Trxml => {
                let itemized: Vec<&ItemizedSelector> =
                    selectors.iter().filter_map(Selector::as_itemized).collect();

                let cardinality = match cardinality {
                    Some(cardinality) => cardinality,
                    None => uniform_attribute(&itemized, MismatchKind::Cardinality, |s| s.cardinality())?,
                };

                match cardinality {
                    Cardinality::Singleton => (Mode::Singleton, None),
                    Cardinality::Multiple => {
                        let group = match shared_itemgroup {
                            Some(group) => group,
                            None => uniform_attribute(&itemized, MismatchKind::ItemGroup, |s| {
                                s.itemgroup().to_string()
                            })?,
                        };
                        (Mode::MultiItem, Some(group))
                    }
                }
            }
        };

        let origin = selectors
            .iter()
            .map(Selector::text)
            .collect::<Vec<_>>()
            .join(",");

        Ok(SelectorSet {
            selectors,
            origin,
            mode,
            shared_itemgroup,
        })
    }

    /// Build from comma-separated selectors, e.g. `name.0.name,address.0.address`
    pub fn from_selector_string(selectors: &str) -> Result<Self, SelectorError> {
        let selectors: Vec<&str> = selectors.split(',').collect();
        Self::new(&selectors)
    }

    /// Build a multi-item set from an item group and comma-separated fields,
    /// e.g. `experienceitem` and `jobtitle,startdate,enddate`
    pub fn from_itemgroup_and_fields(itemgroup: &str, fields: &str) -> Result<Self, SelectorError> {
        valid_field_name(itemgroup)?;
        valid_field_name(fields)?;

        if fields.contains('.') {
            return Err(SelectorError::DottedField {
                fields: fields.to_string(),
            });
        }

        let selectors: Vec<String> = fields
            .split(',')
            .map(|field| format!("{}.{}.{}", itemgroup, super::ItemIndex::WILDCARD, field))
            .collect();

        Self::with_overrides(&selectors, Some(Cardinality::Multiple), Some(itemgroup.to_string()))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn document_kind(&self) -> DocumentKind {
        match self.mode {
            Mode::Flat => DocumentKind::Xml,
            Mode::Singleton | Mode::MultiItem => DocumentKind::Trxml,
        }
    }

    /// Fail unless the set targets the given document kind
    pub fn expect_kind(&self, expected: DocumentKind) -> Result<(), SelectorError> {
        let found = self.document_kind();
        if found == expected {
            Ok(())
        } else {
            Err(SelectorError::UnexpectedKind {
                expected,
                found,
                selectors: self.origin.clone(),
            })
        }
    }

    /// Item group shared by a multi-item set
    pub fn shared_itemgroup(&self) -> Option<&str> {
        self.shared_itemgroup.as_deref()
    }

    /// The comma-joined selector texts
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.selectors.iter()
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Apply the extraction algorithm matching this set's mode
    pub fn select<D: Document>(&self, document: &D) -> Result<Selection, SelectorError> {
        match self.mode {
            Mode::Flat => self.select_flat(document).map(Selection::Flat),
            Mode::Singleton => self.select_singletons(document).map(Selection::Singleton),
            Mode::MultiItem => self.select_items(document).map(Selection::Items),
        }
    }

    /// Every value matching each flat selector
    pub fn select_flat<D: Document>(&self, document: &D) -> Result<FlatSelection, SelectorError> {
        self.require_mode(Mode::Flat)?;
        let entity = working_entity(document)?;

        Ok(self
            .selectors
            .iter()
            .map(|selector| (selector.text(), selector.select_all_values(entity)))
            .collect())
    }

    /// The single addressed value for each singleton selector
    pub fn select_singletons<D: Document>(&self, document: &D) -> Result<SingletonSelection, SelectorError> {
        self.require_mode(Mode::Singleton)?;
        let entity = working_entity(document)?;

        Ok(self
            .itemized()
            .map(|selector| (selector.text(), selector.select_value(entity)))
            .collect())
    }

    /// Field values for every item of the shared item group, keyed by each
    /// item's own index. A repeated index keeps the last item's values; a
    /// missing group yields no items.
    pub fn select_items<D: Document>(&self, document: &D) -> Result<ItemSelection, SelectorError> {
        self.require_mode(Mode::MultiItem)?;
        let entity = working_entity(document)?;

        let mut selection = ItemSelection::new();
        let Some(group) = self
            .shared_itemgroup
            .as_deref()
            .and_then(|itemgroup| find_item_group(entity, itemgroup))
        else {
            return Ok(selection);
        };

        for (index, item) in items(group) {
            let fields: Fields<String> = self
                .itemized()
                .map(|selector| (selector.text(), selector.field_value_from_item(item)))
                .collect();
            selection.insert(index, fields);
        }

        Ok(selection)
    }

    fn itemized(&self) -> impl Iterator<Item = &ItemizedSelector> {
        self.selectors.iter().filter_map(Selector::as_itemized)
    }

    fn require_mode(&self, called: Mode) -> Result<(), SelectorError> {
        if self.mode == called {
            Ok(())
        } else {
            Err(SelectorError::WrongMode {
                called,
                mode: self.mode,
            })
        }
    }
}

fn working_entity<D: Document>(document: &D) -> Result<Entity<'_>, SelectorError> {
    document
        .working_entity()
        .ok_or(SelectorError::MissingWorkingEntity)
}

impl fmt::Display for SelectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

impl<'a> IntoIterator for &'a SelectorSet {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}
