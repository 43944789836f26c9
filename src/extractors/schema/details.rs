//! Detail root: members of `details: { ... }`, hover shows the localized caption

use serde::Serialize;

use super::captions::{Caption, CaptionLookup};
use super::located_object;
use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailItem {
    pub name: String,
    pub schema_name: Option<String>,
    /// Resource key from `captionName`
    pub caption_key: Option<String>,
    pub tooltip: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRoot {
    pub items: Vec<DetailItem>,
    pub location: SourceLocation,
}

pub fn extract_details(
    tree: Option<&SyntaxTree>,
    captions: Option<&dyn CaptionLookup>,
) -> Option<DetailRoot> {
    let (tree, property, pairs) = located_object(tree, "details")?;

    let items = pairs
        .iter()
        .filter_map(|pair| {
            let config = tree.unwrap_parens(pair.child_by_field_name("value")?);
            let schema_name = tree.object_string(&config, "schemaName");
            let caption = tree
                .object_property(&config, "captionName")
                .and_then(|value| Caption::from_node(tree, &value, true));

            let tooltip = caption
                .as_ref()
                .and_then(|c| c.tooltip(captions))
                .or_else(|| schema_name.clone());

            Some(DetailItem {
                name: tree.property_name(pair)?,
                caption_key: caption.as_ref().and_then(|c| c.resource_key()).map(str::to_string),
                schema_name,
                tooltip,
                location: tree.location(pair),
            })
        })
        .collect();

    Some(DetailRoot {
        items,
        location: property.location,
    })
}

impl SchemaNode for DetailItem {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn tooltip(&self) -> Option<String> {
        self.tooltip.clone()
    }
}

impl SchemaNode for DetailRoot {
    fn name(&self) -> String {
        "Details".to_string()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn has_children(&self) -> bool {
        !self.items.is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        self.items
            .iter()
            .map(|item| Box::new(item.clone()) as Box<dyn SchemaNode>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::create_parser;

    struct Captions;

    impl CaptionLookup for Captions {
        fn caption(&self, key: &str) -> Option<String> {
            (key == "FilesCaption").then(|| "en-US: Attachments".to_string())
        }
    }

    const SOURCE: &str = r#"define("Page", [], function() {
        return {
            details: /**SCHEMA_DETAILS*/ {
                "Files": {
                    "schemaName": "FileDetailV2",
                    "captionName": "FilesCaption",
                    "entitySchemaName": "SomeFile"
                },
                "Orders": { "schemaName": "OrderDetail" }
            } /**SCHEMA_DETAILS*/
        };
    });"#;

    #[test]
    fn test_details_with_captions() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(&mut parser, SOURCE).unwrap();

        let root = extract_details(Some(&tree), Some(&Captions)).unwrap();
        assert_eq!(root.items.len(), 2);
        assert_eq!(root.items[0].caption_key.as_deref(), Some("FilesCaption"));
        assert_eq!(root.items[0].tooltip.as_deref(), Some("en-US: Attachments"));
        // no caption: falls back to schema name
        assert_eq!(root.items[1].tooltip.as_deref(), Some("OrderDetail"));
    }

    #[test]
    fn test_details_without_resources() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(&mut parser, SOURCE).unwrap();

        let root = extract_details(Some(&tree), None).unwrap();
        assert_eq!(root.items[0].tooltip.as_deref(), Some("FileDetailV2"));
    }
}
