use std::fmt;
use std::path::Path;

use super::{read_file, Document, DocumentError, Entity, Tree, FILENAME_ATTRIBUTE, UNKNOWN_FILENAME};

/// Flat XML record; the working entity is the root element itself
#[derive(Debug)]
pub struct XmlDocument {
    tree: Tree,
    filename: String,
}

impl XmlDocument {
    pub fn from_string(text: &str) -> Result<Self, DocumentError> {
        let tree = Tree::parse(text)?;
        let filename = tree
            .root()
            .attribute(FILENAME_ATTRIBUTE)
            .unwrap_or(UNKNOWN_FILENAME)
            .to_string();
        Ok(XmlDocument { tree, filename })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        Self::from_string(&read_file(path.as_ref())?)
    }
}

impl Document for XmlDocument {
    fn tree(&self) -> &Tree {
        &self.tree
    }

    fn working_entity(&self) -> Option<Entity<'_>> {
        Some(self.tree.root())
    }

    fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_root_attribute() {
        let doc = XmlDocument::from_string(r#"<begin filename="cv.pdf"><name>x</name></begin>"#).unwrap();
        assert_eq!(doc.filename(), "cv.pdf");
        assert_eq!(doc.working_entity().unwrap().tag(), "begin");
    }

    #[test]
    fn test_filename_defaults_to_sentinel() {
        let doc = XmlDocument::from_string("<begin/>").unwrap();
        assert_eq!(doc.filename(), UNKNOWN_FILENAME);
    }

    #[test]
    fn test_display_round_trips_markup() {
        let doc = XmlDocument::from_string("<begin><name>x</name></begin>").unwrap();
        assert_eq!(doc.to_string(), "<begin><name>x</name></begin>");
    }

    #[test]
    fn test_from_missing_file() {
        let err = XmlDocument::from_file("/nonexistent/doc.xml").unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
