//! Entity loader for Dataverse `customizations.xml` exports
//!
//! Every `Entity` element of the document becomes one [`EntityModel`]; every
//! `attribute` element below it becomes one [`EntityField`], in document order.
//! Elements are matched by local name, so namespaced exports load the same way.

use crate::model::{EntityField, EntityModel};
use roxmltree::{Document, Node};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while loading entity metadata
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not well-formed XML
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
    /// An element required to build the model is absent
    #[error("Missing <{element}> element in <{parent}> at {position}")]
    MissingElement {
        element: &'static str,
        parent: &'static str,
        position: String,
    },
}

/// Load entity metadata from an XML file
pub fn load_entities(xml_path: &Path) -> Result<Vec<EntityModel>, LoadError> {
    let content = fs::read_to_string(xml_path).map_err(|source| LoadError::Io {
        path: xml_path.to_path_buf(),
        source,
    })?;

    let entities = parse_entities(&content)?;
    log::info!(
        "Loaded {} entities from {}",
        entities.len(),
        xml_path.display()
    );
    Ok(entities)
}

/// Parse entity metadata from an XML string
pub fn parse_entities(xml: &str) -> Result<Vec<EntityModel>, LoadError> {
    let doc = Document::parse(xml)?;

    doc.descendants()
        .filter(|n| n.has_tag_name("Entity"))
        .map(|entity| parse_entity(&doc, entity))
        .collect()
}

fn parse_entity(doc: &Document, entity: Node) -> Result<EntityModel, LoadError> {
    let logical_name = required_child(doc, entity, "Name", "Entity")?;

    let fields = entity
        .descendants()
        .filter(|n| n.has_tag_name("attribute"))
        .map(|attribute| parse_field(doc, attribute))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Entity '{}' has {} attributes", logical_name, fields.len());
    Ok(EntityModel::new(logical_name, fields))
}

fn parse_field(doc: &Document, attribute: Node) -> Result<EntityField, LoadError> {
    let logical_name = required_child(doc, attribute, "LogicalName", "attribute")?;
    let field_type = required_child(doc, attribute, "Type", "attribute")?;

    // Non-numeric lengths fall back to the default length
    let max_length = child_value(attribute, "MaxLength").and_then(|v| v.trim().parse().ok());
    let required_level = child_value(attribute, "RequiredLevel");

    Ok(EntityField {
        logical_name,
        field_type,
        max_length,
        required_level,
    })
}

fn required_child(
    doc: &Document,
    parent: Node,
    element: &'static str,
    parent_name: &'static str,
) -> Result<String, LoadError> {
    child_value(parent, element).ok_or_else(|| LoadError::MissingElement {
        element,
        parent: parent_name,
        position: doc.text_pos_at(parent.range().start).to_string(),
    })
}

/// String value of the first direct child element with the given name:
/// the concatenated text of all its descendants.
fn child_value(parent: Node, name: &str) -> Option<String> {
    parent
        .children()
        .find(|n| n.is_element() && n.has_tag_name(name))
        .map(|element| {
            element
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_value_concatenates_text() {
        let doc = Document::parse("<a><Name>acc<b>ou</b>nt</Name></a>").unwrap();
        let root = doc.root_element();
        assert_eq!(child_value(root, "Name").as_deref(), Some("account"));
        assert_eq!(child_value(root, "Missing"), None);
    }

    #[test]
    fn test_child_value_empty_element() {
        let doc = Document::parse("<a><Name/></a>").unwrap();
        assert_eq!(child_value(doc.root_element(), "Name").as_deref(), Some(""));
    }

    #[test]
    fn test_child_value_ignores_grandchildren() {
        let doc = Document::parse("<a><b><Name>x</Name></b></a>").unwrap();
        assert_eq!(child_value(doc.root_element(), "Name"), None);
    }
}
