//! Mixin root: `mixins: { Name: "Terrasoft.SomeMixin" }`

use serde::Serialize;

use super::{located_object, PropertyItem};
use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixinRoot {
    pub items: Vec<PropertyItem>,
    pub location: SourceLocation,
}

pub fn extract_mixins(tree: Option<&SyntaxTree>) -> Option<MixinRoot> {
    let (tree, property, pairs) = located_object(tree, "mixins")?;

    let items = pairs
        .iter()
        .filter_map(|pair| {
            let value = pair.child_by_field_name("value")?;
            Some(PropertyItem {
                name: tree.property_name(pair)?,
                tooltip: tree.string_value(&value),
                location: tree.location(pair),
            })
        })
        .collect();

    Some(MixinRoot {
        items,
        location: property.location,
    })
}

impl SchemaNode for MixinRoot {
    fn name(&self) -> String {
        "Mixins".to_string()
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
    fn test_mixins_with_string_tooltips() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(
            &mut parser,
            r#"define("Page", [], function() {
                return {
                    mixins: {
                        Printable: "Terrasoft.PrintableMixin",
                        ...other,
                        [computed]: "x",
                        "Quoted": SomeReference
                    }
                };
            });"#,
        )
        .unwrap();

        let root = extract_mixins(Some(&tree)).unwrap();
        assert_eq!(root.items.len(), 2);
        assert_eq!(root.items[0].name, "Printable");
        assert_eq!(root.items[0].tooltip.as_deref(), Some("Terrasoft.PrintableMixin"));
        assert_eq!(root.items[1].name, "Quoted");
        assert_eq!(root.items[1].tooltip, None);
    }

    #[test]
    fn test_mixins_not_an_object() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(
            &mut parser,
            r#"define("Page", [], function() { return { mixins: [] }; });"#,
        )
        .unwrap();
        assert!(extract_mixins(Some(&tree)).is_none());
    }
}
