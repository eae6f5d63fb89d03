//! Item-group addressing for TRXML documents

use std::fmt;

use super::Cardinality;
use crate::document::Entity;

const ITEM_GROUP_TAG: &str = "ItemGroup";
const ITEM_TAG: &str = "Item";
const FIELD_TAG: &str = "Field";
const VALUE_TAG: &str = "Value";
const KEY_ATTRIBUTE: &str = "key";
const INDEX_ATTRIBUTE: &str = "index";

/// Item index of an itemized selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemIndex {
    /// Concrete index, kept as written so it compares against the
    /// document's `index` attribute verbatim
    At(String),
    /// `*`: every item in the group
    Any,
}

impl ItemIndex {
    pub const WILDCARD: &'static str = "*";

    /// `*` or a decimal non-negative integer
    pub fn parse(text: &str) -> Option<Self> {
        if text == Self::WILDCARD {
            Some(ItemIndex::Any)
        } else if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            Some(ItemIndex::At(text.to_string()))
        } else {
            None
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            ItemIndex::At(_) => Cardinality::Singleton,
            ItemIndex::Any => Cardinality::Multiple,
        }
    }
}

impl fmt::Display for ItemIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemIndex::At(index) => f.write_str(index),
            ItemIndex::Any => f.write_str(Self::WILDCARD),
        }
    }
}

/// Address of a field value: item group, then item, then field.
///
/// The group and field steps are shared between singleton lookups, which
/// descend through one item, and multi-item lookups, which iterate the
/// group's items and apply the field step to each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPath {
    itemgroup: String,
    index: ItemIndex,
    field: String,
}

impl ItemPath {
    pub fn new(itemgroup: impl Into<String>, index: ItemIndex, field: impl Into<String>) -> Self {
        ItemPath {
            itemgroup: itemgroup.into(),
            index,
            field: field.into(),
        }
    }

    pub fn itemgroup(&self) -> &str {
        &self.itemgroup
    }

    pub fn index(&self) -> &ItemIndex {
        &self.index
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// The `ItemGroup` container for this path's group
    pub fn item_group<'a>(&self, entity: Entity<'a>) -> Option<Entity<'a>> {
        find_item_group(entity, &self.itemgroup)
    }

    /// The item this path's index selects; the first item for a wildcard
    pub fn item<'a>(&self, group: Entity<'a>) -> Option<Entity<'a>> {
        match &self.index {
            ItemIndex::At(index) => group.find_child_by_attribute(ITEM_TAG, INDEX_ATTRIBUTE, index),
            ItemIndex::Any => group.first_child_by_tag(ITEM_TAG),
        }
    }

    /// Text of this path's field inside `item`, empty when absent
    pub fn field_value(&self, item: Entity<'_>) -> String {
        item.find_child_by_attribute(FIELD_TAG, KEY_ATTRIBUTE, &self.field)
            .and_then(|field| field.first_child_by_tag(VALUE_TAG))
            .map(|value| value.text())
            .unwrap_or_default()
    }

    /// Full descent from the working entity, empty when any step is absent
    pub fn value(&self, entity: Entity<'_>) -> String {
        self.item_group(entity)
            .and_then(|group| self.item(group))
            .map(|item| self.field_value(item))
            .unwrap_or_default()
    }
}

pub(crate) fn find_item_group<'a>(entity: Entity<'a>, itemgroup: &str) -> Option<Entity<'a>> {
    entity.find_child_by_attribute(ITEM_GROUP_TAG, KEY_ATTRIBUTE, itemgroup)
}

/// Items of a group in document order, paired with their own index
/// attribute (empty when missing)
pub(crate) fn items<'a>(group: Entity<'a>) -> impl Iterator<Item = (String, Entity<'a>)> + 'a {
    group
        .children_by_tag(ITEM_TAG)
        .map(|item| (item.attribute(INDEX_ATTRIBUTE).unwrap_or_default().to_string(), item))
}
