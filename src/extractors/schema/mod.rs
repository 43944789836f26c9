//! Schema root extractors
//!
//! Each category of a schema (dependencies, mixins, messages, attributes,
//! details, methods, business rules, diff) is pulled out of the syntax tree
//! into an owned root that implements `SchemaNode`. A category that is absent
//! or has an unexpected shape yields no root.

pub mod attributes;
pub mod business_rules;
pub mod captions;
pub mod dependencies;
pub mod details;
pub mod diff;
pub mod locator;
pub mod messages;
pub mod methods;
pub mod mixins;

use serde::Serialize;
use tree_sitter::Node;

use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

pub use attributes::{extract_attributes, AttributeRoot};
pub use business_rules::{extract_business_rules, BusinessRuleRoot, BusinessRuleSpec};
pub use captions::{Caption, CaptionLookup};
pub use dependencies::{extract_dependencies, DependencyRoot};
pub use details::{extract_details, DetailRoot};
pub use diff::{extract_diff, DiffOperation, DiffRoot};
pub use locator::{
    locate_factory_call, locate_schema_object, locate_top_level_property, FactoryCallInfo,
    LocatedProperty,
};
pub use messages::{extract_messages, MessageDirection, MessageRoot};
pub use methods::{extract_methods, MethodRoot};
pub use mixins::{extract_mixins, MixinRoot};

/// A named member of a schema object with an optional hover text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyItem {
    pub name: String,
    pub tooltip: Option<String>,
    pub location: SourceLocation,
}

impl PropertyItem {
    pub fn boxed(items: &[PropertyItem]) -> Vec<Box<dyn SchemaNode>> {
        items
            .iter()
            .map(|item| Box::new(item.clone()) as Box<dyn SchemaNode>)
            .collect()
    }
}

impl SchemaNode for PropertyItem {
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

/// Locate a top-level schema member whose value is an object literal,
/// returning its named pairs
pub(crate) fn located_object<'t>(
    tree: Option<&'t SyntaxTree>,
    name: &str,
) -> Option<(&'t SyntaxTree, LocatedProperty<'t>, Vec<Node<'t>>)> {
    let tree = tree?;
    let property = locate_top_level_property(Some(tree), name)?;
    if property.value.kind() != "object" {
        return None;
    }
    let pairs = tree.object_pairs(&property.value);
    Some((tree, property, pairs))
}

/// One extracted category root
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "root", rename_all = "camelCase")]
pub enum SchemaRootItem {
    Dependency(DependencyRoot),
    Mixin(MixinRoot),
    Message(MessageRoot),
    Attribute(AttributeRoot),
    Detail(DetailRoot),
    Method(MethodRoot),
    BusinessRule(BusinessRuleRoot),
    Diff(DiffRoot),
}

impl SchemaRootItem {
    fn node(&self) -> &dyn SchemaNode {
        match self {
            SchemaRootItem::Dependency(root) => root,
            SchemaRootItem::Mixin(root) => root,
            SchemaRootItem::Message(root) => root,
            SchemaRootItem::Attribute(root) => root,
            SchemaRootItem::Detail(root) => root,
            SchemaRootItem::Method(root) => root,
            SchemaRootItem::BusinessRule(root) => root,
            SchemaRootItem::Diff(root) => root,
        }
    }
}

impl SchemaNode for SchemaRootItem {
    fn name(&self) -> String {
        self.node().name()
    }

    fn location(&self) -> Option<SourceLocation> {
        self.node().location()
    }

    fn tooltip(&self) -> Option<String> {
        self.node().tooltip()
    }

    fn has_children(&self) -> bool {
        self.node().has_children()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        self.node().children()
    }
}

/// All category roots present in `tree`, in a fixed order
pub fn extract_schema_roots(
    tree: Option<&SyntaxTree>,
    captions: Option<&dyn CaptionLookup>,
) -> Vec<SchemaRootItem> {
    [
        extract_dependencies(tree).map(SchemaRootItem::Dependency),
        extract_mixins(tree).map(SchemaRootItem::Mixin),
        extract_messages(tree).map(SchemaRootItem::Message),
        extract_attributes(tree).map(SchemaRootItem::Attribute),
        extract_details(tree, captions).map(SchemaRootItem::Detail),
        extract_methods(tree).map(SchemaRootItem::Method),
        extract_business_rules(tree).map(SchemaRootItem::BusinessRule),
        extract_diff(tree, captions).map(SchemaRootItem::Diff),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::create_parser;

    #[test]
    fn test_sample_schema_roots() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(&mut parser, include_str!("../../../test_samples/SomePage1.js"))
            .unwrap();

        let roots = extract_schema_roots(Some(&tree), None);
        let names: Vec<String> = roots.iter().map(|r| r.name()).collect();
        // no mixins in the sample
        assert_eq!(
            names,
            vec!["Dependencies", "Messages", "Attributes", "Details", "Methods", "Business rules", "Diff"]
        );
        assert!(roots.iter().all(|r| r.location().is_some()));
    }

    #[test]
    fn test_no_tree_no_roots() {
        assert!(extract_schema_roots(None, None).is_empty());
    }

    #[test]
    fn test_object_shaped_members_only() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(
            &mut parser,
            r#"define("Page", [], function() {
                return { mixins: [], attributes: { "A": {} } };
            });"#,
        )
        .unwrap();

        assert!(extract_mixins(Some(&tree)).is_none());
        let roots = extract_schema_roots(Some(&tree), None);
        let names: Vec<String> = roots.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Dependencies", "Attributes"]);
    }

    #[test]
    fn test_outside_factory_is_ignored() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(
            &mut parser,
            r#"var config = { attributes: { "A": {} }, diff: [] };"#,
        )
        .unwrap();
        assert!(extract_schema_roots(Some(&tree), None).is_empty());
    }
}
