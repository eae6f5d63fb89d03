//! Ordered results of applying a selector set to one document

use indexmap::IndexMap;

/// Values keyed by selector text, in selector order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields<T> {
    entries: IndexMap<String, T>,
}

impl<T> Fields<T> {
    pub fn new() -> Self {
        Fields {
            entries: IndexMap::new(),
        }
    }

    /// Insert a value, replacing an earlier one for the same key in place
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Fields<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Fields<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Fields {
            entries: iter.into_iter().map(|(key, value)| (key.into(), value)).collect(),
        }
    }
}

/// Flat mode: every matching value per selector
pub type FlatSelection = Fields<Vec<String>>;

/// Singleton mode: one value per selector
pub type SingletonSelection = Fields<String>;

/// Multi-item mode: field values keyed by each item's own `index`
/// attribute, in document order. A repeated index keeps its first position
/// and the last item's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSelection {
    items: IndexMap<String, Fields<String>>,
}

impl ItemSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: impl Into<String>, fields: Fields<String>) {
        self.items.insert(index.into(), fields);
    }

    pub fn get(&self, index: &str) -> Option<&Fields<String>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fields<String>)> {
        self.items.iter().map(|(index, fields)| (index.as_str(), fields))
    }

    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ItemSelection {
    type Item = (String, Fields<String>);
    type IntoIter = indexmap::map::IntoIter<String, Fields<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Result of `SelectorSet::select`, shaped by the set's mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Flat(FlatSelection),
    Singleton(SingletonSelection),
    Items(ItemSelection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_insertion_order() {
        let fields: Fields<u32> = [("b", 1), ("a", 2), ("c", 3)].into_iter().collect();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(fields.get("a"), Some(&2));
        assert_eq!(fields.get("z"), None);
    }

    #[test]
    fn test_fields_insert_replaces_in_place() {
        let mut fields = Fields::new();
        fields.insert("x", 1);
        fields.insert("y", 2);
        fields.insert("x", 3);
        assert_eq!(fields.iter().collect::<Vec<_>>(), vec![("x", &3), ("y", &2)]);
    }

    #[test]
    fn test_item_selection_lookup() {
        let mut items = ItemSelection::new();
        items.insert("2", [("a.*.b", "x".to_string())].into_iter().collect());
        items.insert("0", [("a.*.b", "y".to_string())].into_iter().collect());
        assert_eq!(items.indices().collect::<Vec<_>>(), vec!["2", "0"]);
        assert_eq!(items.get("0").and_then(|f| f.get("a.*.b")).map(String::as_str), Some("y"));
        assert!(items.get("1").is_none());
    }

    #[test]
    fn test_item_selection_repeated_index_overwrites() {
        let mut items = ItemSelection::new();
        items.insert("0", [("a.*.b", "first".to_string())].into_iter().collect());
        items.insert("1", [("a.*.b", "middle".to_string())].into_iter().collect());
        items.insert("0", [("a.*.b", "last".to_string())].into_iter().collect());
        assert_eq!(items.indices().collect::<Vec<_>>(), vec!["0", "1"]);
        assert_eq!(items.get("0").and_then(|f| f.get("a.*.b")).map(String::as_str), Some("last"));
    }
}
