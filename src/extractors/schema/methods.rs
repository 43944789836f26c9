//! Method root: members of `methods: { ... }`

use serde::Serialize;

use super::{located_object, PropertyItem};
use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodRoot {
    pub items: Vec<PropertyItem>,
    pub location: SourceLocation,
}

pub fn extract_methods(tree: Option<&SyntaxTree>) -> Option<MethodRoot> {
    let (tree, property, pairs) = located_object(tree, "methods")?;

    let items = pairs
        .iter()
        .filter_map(|pair| {
            let value = pair.child_by_field_name("value")?;
            // Show the parameter list of function members
            let tooltip = value
                .child_by_field_name("parameters")
                .filter(|_| tree.is_function_literal(&value))
                .map(|params| tree.get_node_text(&params).to_string());
            Some(PropertyItem {
                name: tree.property_name(pair)?,
                tooltip,
                location: tree.location(pair),
            })
        })
        .collect();

    Some(MethodRoot {
        items,
        location: property.location,
    })
}

impl SchemaNode for MethodRoot {
    fn name(&self) -> String {
        "Methods".to_string()
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
