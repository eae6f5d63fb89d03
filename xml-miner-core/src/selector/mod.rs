//! Selector engine
//!
//! A selector addresses a field in a document:
//! - flat: `tag_name` matches every element with that tag under the root
//! - itemized: `itemgroup.field`, `itemgroup.*.field` or `itemgroup.0.field`
//!   addresses a field inside the items of a TRXML item group
//!
//! Selectors are grouped into a `SelectorSet`, which checks that its members
//! agree on document kind, cardinality and item group before any document
//! is read.

mod path;
mod selection;
mod set;
pub mod validate;

pub use path::{ItemIndex, ItemPath};
pub use selection::{Fields, FlatSelection, ItemSelection, Selection, SingletonSelection};
pub use set::{Mode, SelectorSet};
pub use validate::{uniform_attribute, valid_field_name};

use std::fmt;

use strum_macros::Display;
use thiserror::Error;

use crate::document::Entity;

/// Errors raised while building or applying selectors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("tag name '{name}' needs at least one alphabet char")]
    InvalidFieldName { name: String },
    #[error(
        "unable to parse the trxml selector '{selector}', expected one of: \
         itemgroup.field, itemgroup.*.field, itemgroup.0.field"
    )]
    ItemizedForm { selector: String },
    #[error("invalid item index '{index}' in selector '{selector}': expected a non-negative integer or '*'")]
    InvalidIndex { selector: String, index: String },
    #[error("'.' not allowed in the field names '{fields}'")]
    DottedField { fields: String },
    #[error("selector '{selector}' has a different {kind} than the others: '{found}' vs. '{expected}'")]
    Mismatch {
        selector: String,
        kind: MismatchKind,
        expected: String,
        found: String,
    },
    #[error("no selectors given")]
    Empty,
    #[error("expected {expected} selectors, got {found} selectors '{selectors}'")]
    UnexpectedKind {
        expected: DocumentKind,
        found: DocumentKind,
        selectors: String,
    },
    #[error("{called} selection called on a {mode} selector set")]
    WrongMode { called: Mode, mode: Mode },
    #[error("document has no working entity")]
    MissingWorkingEntity,
}

/// Which attribute disagreed across a selector set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MismatchKind {
    #[strum(serialize = "document kind (xml vs. trxml)")]
    DocumentKind,
    #[strum(serialize = "cardinality (singleton vs. multi-item)")]
    Cardinality,
    #[strum(serialize = "itemgroup")]
    ItemGroup,
}

/// The kind of document a selector applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    Xml,
    Trxml,
}

/// Whether an itemized selector pins one item or spans all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Cardinality {
    #[strum(serialize = "singleton")]
    Singleton,
    #[strum(serialize = "multi-item")]
    Multiple,
}

/// A single parsed selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Tag name matched anywhere under the working entity
    Flat(String),
    /// Field addressed through an item group
    Itemized(ItemizedSelector),
}

impl Selector {
    /// Parse and validate one selector string
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        valid_field_name(text)?;
        if text.contains('.') {
            Ok(Selector::Itemized(ItemizedSelector::parse(text)?))
        } else {
            Ok(Selector::Flat(text.to_string()))
        }
    }

    /// The selector as written
    pub fn text(&self) -> &str {
        match self {
            Selector::Flat(tag) => tag,
            Selector::Itemized(selector) => selector.text(),
        }
    }

    pub fn document_kind(&self) -> DocumentKind {
        match self {
            Selector::Flat(_) => DocumentKind::Xml,
            Selector::Itemized(_) => DocumentKind::Trxml,
        }
    }

    pub fn as_itemized(&self) -> Option<&ItemizedSelector> {
        match self {
            Selector::Itemized(selector) => Some(selector),
            Selector::Flat(_) => None,
        }
    }

    /// Text of every element matching a flat selector, in document order.
    ///
    /// Mixed content is flattened by concatenating all descendant text.
    /// Itemized selectors never match here.
    pub fn select_all_values(&self, entity: Entity<'_>) -> Vec<String> {
        match self {
            Selector::Flat(tag) => entity
                .descendants_by_tag(tag)
                .map(|element| element.string_value())
                .collect(),
            Selector::Itemized(_) => Vec::new(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// `itemgroup.index.field` selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemizedSelector {
    text: String,
    path: ItemPath,
}

impl ItemizedSelector {
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        valid_field_name(text)?;
        let (itemgroup, index, field) = parse_trxml_selector(text)?;
        Ok(ItemizedSelector {
            text: text.to_string(),
            path: ItemPath::new(itemgroup, index, field),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn path(&self) -> &ItemPath {
        &self.path
    }

    pub fn itemgroup(&self) -> &str {
        self.path.itemgroup()
    }

    pub fn index(&self) -> &ItemIndex {
        self.path.index()
    }

    pub fn field(&self) -> &str {
        self.path.field()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.path.index().cardinality()
    }

    /// Value addressed by this selector under the working entity, or an
    /// empty string when any step is missing
    pub fn select_value(&self, entity: Entity<'_>) -> String {
        self.path.value(entity)
    }

    /// Value of this selector's field inside one item
    pub fn field_value_from_item(&self, item: Entity<'_>) -> String {
        self.path.field_value(item)
    }
}

impl fmt::Display for ItemizedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split an itemized selector into (itemgroup, index, field).
///
/// ```text
/// ig.index.field  ->  (ig, index, field)
/// ig.*.field      ->  (ig, *, field)
/// ig.field        ->  (ig, *, field)
/// ```
pub fn parse_trxml_selector(text: &str) -> Result<(String, ItemIndex, String), SelectorError> {
    let segments: Vec<&str> = text.split('.').collect();
    let (itemgroup, index, field) = match segments.as_slice() {
        [itemgroup, field] => (*itemgroup, ItemIndex::Any, *field),
        [itemgroup, index, field] => {
            let index = ItemIndex::parse(index).ok_or_else(|| SelectorError::InvalidIndex {
                selector: text.to_string(),
                index: index.to_string(),
            })?;
            (*itemgroup, index, *field)
        }
        _ => {
            return Err(SelectorError::ItemizedForm {
                selector: text.to_string(),
            })
        }
    };

    valid_field_name(itemgroup)?;
    valid_field_name(field)?;

    Ok((itemgroup.to_string(), index, field.to_string()))
}
