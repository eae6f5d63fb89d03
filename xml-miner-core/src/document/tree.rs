//! Owned XML tree and borrowed element views
//!
//! `Tree` owns the xot arena for one document. `Entity` is a `Copy` view of
//! a single element inside that arena; all navigation the selectors need is
//! expressed as direct descent on `Entity` rather than path queries.

use std::fmt;

use xot::{Node, Value, Xot};

use super::DocumentError;

/// A parsed document, immutable after construction
pub struct Tree {
    xot: Xot,
    root: Node,
}

impl Tree {
    /// Parse markup into a tree rooted at its document element
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let mut xot = Xot::new();
        let document = xot
            .parse(text)
            .map_err(|e| DocumentError::Parse(e.to_string()))?;

        let root = xot
            .children(document)
            .find(|&child| xot.is_element(child))
            .ok_or_else(|| DocumentError::Parse("document has no root element".to_string()))?;

        Ok(Tree { xot, root })
    }

    /// The document element
    pub fn root(&self) -> Entity<'_> {
        Entity {
            xot: &self.xot,
            node: self.root,
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markup = self.xot.to_string(self.root).map_err(|_| fmt::Error)?;
        f.write_str(markup.trim())
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root().tag())
            .finish()
    }
}

/// Borrowed view of one element in a `Tree`
#[derive(Clone, Copy)]
pub struct Entity<'a> {
    xot: &'a Xot,
    node: Node,
}

impl<'a> Entity<'a> {
    /// Local tag name of the element
    pub fn tag(&self) -> &'a str {
        match self.xot.element(self.node) {
            Some(element) => self.xot.local_name_str(element.name()),
            None => "",
        }
    }

    /// Value of the attribute with the given local name
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        let xot = self.xot;
        let name = xot.name(key)?;
        xot.get_attribute(self.node, name)
    }

    /// Child elements in document order
    pub fn children(&self) -> impl Iterator<Item = Entity<'a>> + 'a {
        let xot = self.xot;
        xot.children(self.node)
            .filter(move |&child| xot.is_element(child))
            .map(move |node| Entity { xot, node })
    }

    /// Child elements with the given tag, in document order
    pub fn children_by_tag(&self, tag: &'a str) -> impl Iterator<Item = Entity<'a>> + 'a {
        self.children().filter(move |child| child.tag() == tag)
    }

    pub fn first_child_by_tag(&self, tag: &str) -> Option<Entity<'a>> {
        self.children().find(|child| child.tag() == tag)
    }

    /// First child with the given tag whose `key` attribute equals `value`
    pub fn find_child_by_attribute(&self, tag: &str, key: &str, value: &str) -> Option<Entity<'a>> {
        self.children()
            .find(|child| child.tag() == tag && child.attribute(key) == Some(value))
    }

    /// This element and every descendant element with the given tag, in
    /// document order
    pub fn descendants_by_tag(&self, tag: &'a str) -> impl Iterator<Item = Entity<'a>> + 'a {
        let xot = self.xot;
        xot.descendants(self.node)
            .filter(move |&node| xot.is_element(node))
            .map(move |node| Entity { xot, node })
            .filter(move |entity| entity.tag() == tag)
    }

    /// Text that precedes the first child element, empty when there is none.
    /// Comments and processing instructions in between are skipped.
    pub fn text(&self) -> String {
        let xot = self.xot;
        let mut text = String::new();
        for child in xot.children(self.node) {
            match xot.value(child) {
                Value::Text(value) => text.push_str(value.get()),
                Value::Element(_) => break,
                _ => {}
            }
        }
        text
    }

    /// All descendant text concatenated in document order
    pub fn string_value(&self) -> String {
        self.xot.string_value(self.node)
    }
}

impl fmt::Debug for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<root filename="a.txt">
  <item index="0"><name>first</name></item>
  <item index="1"><name>second <b>bold</b> tail</name></item>
</root>"#;

    #[test]
    fn test_root_and_attribute() {
        let tree = Tree::parse(SAMPLE).unwrap();
        let root = tree.root();
        assert_eq!(root.tag(), "root");
        assert_eq!(root.attribute("filename"), Some("a.txt"));
        assert_eq!(root.attribute("missing"), None);
    }

    #[test]
    fn test_children_skip_text_nodes() {
        let tree = Tree::parse(SAMPLE).unwrap();
        let tags: Vec<_> = tree.root().children().map(|c| c.tag()).collect();
        assert_eq!(tags, vec!["item", "item"]);
    }

    #[test]
    fn test_find_child_by_attribute() {
        let tree = Tree::parse(SAMPLE).unwrap();
        let item = tree.root().find_child_by_attribute("item", "index", "1").unwrap();
        assert_eq!(item.first_child_by_tag("name").unwrap().text(), "second ");
        assert!(tree.root().find_child_by_attribute("item", "index", "7").is_none());
    }

    #[test]
    fn test_string_value_concatenates_mixed_content() {
        let tree = Tree::parse(SAMPLE).unwrap();
        let values: Vec<_> = tree
            .root()
            .descendants_by_tag("name")
            .map(|n| n.string_value())
            .collect();
        assert_eq!(values, vec!["first", "second bold tail"]);
    }

    #[test]
    fn test_descendants_include_self() {
        let tree = Tree::parse(SAMPLE).unwrap();
        assert_eq!(tree.root().descendants_by_tag("root").count(), 1);
    }

    #[test]
    fn test_text_of_empty_element() {
        let tree = Tree::parse("<a><b/></a>").unwrap();
        assert_eq!(tree.root().first_child_by_tag("b").unwrap().text(), "");
    }

    #[test]
    fn test_parse_error() {
        let err = Tree::parse("<a><b></a>").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn test_text_spans_comments() {
        let tree = Tree::parse("<Value>a &amp; b<!--c--> tail<x/>after</Value>").unwrap();
        assert_eq!(tree.root().text(), "a & b tail");
    }
}
