use std::fmt;
use std::path::Path;

use super::{read_file, Document, DocumentError, Entity, Tree, FILENAME_ATTRIBUTE, UNKNOWN_FILENAME};

/// Element holding the item groups
pub const WORKING_ENTITY_TAG: &str = "DocumentStructure";

/// Element holding the raw document and its filename
pub const XML_ENTITY_TAG: &str = "Document";

/// Itemized TRXML record
///
/// ```text
/// <TextractorResult>
///   <Document filename="cv.pdf">...</Document>
///   <DocumentStructure>
///     <ItemGroup key="experienceitem">
///       <Item index="0">
///         <Field key="experience"><Value>Consultant</Value></Field>
///       </Item>
///     </ItemGroup>
///   </DocumentStructure>
/// </TextractorResult>
/// ```
#[derive(Debug)]
pub struct TrxmlDocument {
    tree: Tree,
    filename: String,
}

impl TrxmlDocument {
    pub fn from_string(text: &str) -> Result<Self, DocumentError> {
        let tree = Tree::parse(text)?;
        let filename = tree
            .root()
            .first_child_by_tag(XML_ENTITY_TAG)
            .and_then(|entity| entity.attribute(FILENAME_ATTRIBUTE))
            .unwrap_or(UNKNOWN_FILENAME)
            .to_string();
        Ok(TrxmlDocument { tree, filename })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        Self::from_string(&read_file(path.as_ref())?)
    }

    /// The embedded raw document, only used for the filename
    pub fn xml_entity(&self) -> Option<Entity<'_>> {
        self.tree.root().first_child_by_tag(XML_ENTITY_TAG)
    }
}

impl Document for TrxmlDocument {
    fn tree(&self) -> &Tree {
        &self.tree
    }

    fn working_entity(&self) -> Option<Entity<'_>> {
        self.tree.root().first_child_by_tag(WORKING_ENTITY_TAG)
    }

    fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for TrxmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}
