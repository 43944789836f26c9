//! Attribute root: members of `attributes: { ... }`, tooltip shows the data value type

use serde::Serialize;
use tree_sitter::Node;

use super::{located_object, PropertyItem};
use crate::data::terrasoft::DATA_VALUE_TYPE;
use crate::extractors::base::{as_integer, SchemaNode, SourceLocation, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRoot {
    pub items: Vec<PropertyItem>,
    pub location: SourceLocation,
}

pub fn extract_attributes(tree: Option<&SyntaxTree>) -> Option<AttributeRoot> {
    let (tree, property, pairs) = located_object(tree, "attributes")?;

    let items = pairs
        .iter()
        .filter_map(|pair| {
            let value = pair.child_by_field_name("value")?;
            Some(PropertyItem {
                name: tree.property_name(pair)?,
                tooltip: data_value_type(tree, &value),
                location: tree.location(pair),
            })
        })
        .collect();

    Some(AttributeRoot {
        items,
        location: property.location,
    })
}

/// `dataValueType` of an attribute config, as a member name
fn data_value_type(tree: &SyntaxTree, config: &Node) -> Option<String> {
    let value = tree.object_property(config, "dataValueType")?;
    if let Some(number) = tree.number_value(&value) {
        return as_integer(number)
            .and_then(|v| DATA_VALUE_TYPE.name_of(v))
            .map(str::to_string);
    }
    tree.member_path(&value)
        .and_then(|path| path.last().cloned())
}

impl SchemaNode for AttributeRoot {
    fn name(&self) -> String {
        "Attributes".to_string()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn has_children(&self) -> bool {
        !self.items.is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        PropertyItem::boxed(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::create_parser;

    #[test]
    fn test_attribute_types() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(
            &mut parser,
            r#"define("Page", [], function() {
                return {
                    attributes: {
                        "IsVisible": { "dataValueType": 12, "value": false },
                        "Owner": { dataValueType: Terrasoft.DataValueType.LOOKUP },
                        "Plain": {}
                    }
                };
            });"#,
        )
        .unwrap();

        let root = extract_attributes(Some(&tree)).unwrap();
        let tooltips: Vec<Option<&str>> = root.items.iter().map(|i| i.tooltip.as_deref()).collect();
        assert_eq!(tooltips, vec![Some("BOOLEAN"), Some("LOOKUP"), None]);
    }
}
