//! Dependency root: `define` dependency strings paired with callback parameters

use serde::Serialize;

use super::locator::locate_factory_call;
use crate::data::UNKNOWN_PLACEHOLDER;
use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyItem {
    /// Module name from the dependency array
    pub dependency: String,
    /// Local parameter name bound to it
    pub identifier: String,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyRoot {
    pub items: Vec<DependencyItem>,
    pub location: SourceLocation,
}

/// Extract the dependency root; `None` without a factory call
pub fn extract_dependencies(tree: Option<&SyntaxTree>) -> Option<DependencyRoot> {
    let info = locate_factory_call(tree)?;

    let items = info
        .pairs()
        .into_iter()
        .map(|(dependency, identifier)| DependencyItem {
            dependency: dependency
                .map(|d| d.name.clone())
                .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
            identifier: identifier
                .map(|i| i.name.clone())
                .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
            location: dependency.or(identifier).map(|n| n.location),
        })
        .collect();

    Some(DependencyRoot {
        items,
        location: info.location,
    })
}

impl SchemaNode for DependencyItem {
    fn name(&self) -> String {
        self.dependency.clone()
    }

    fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    fn tooltip(&self) -> Option<String> {
        Some(self.identifier.clone())
    }
}

impl SchemaNode for DependencyRoot {
    fn name(&self) -> String {
        "Dependencies".to_string()
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

    fn parse(source: &str) -> SyntaxTree {
        let mut parser = create_parser().unwrap();
        SyntaxTree::parse(&mut parser, source).unwrap()
    }

    #[test]
    fn test_missing_parameter_gets_placeholder() {
        let tree = parse(
            r#"define("Page", ["PageResources", "Constants"], function(resources) { return {}; });"#,
        );
        let root = extract_dependencies(Some(&tree)).unwrap();
        assert_eq!(root.items.len(), 2);
        assert_eq!(root.items[0].dependency, "PageResources");
        assert_eq!(root.items[0].identifier, "resources");
        assert_eq!(root.items[1].identifier, UNKNOWN_PLACEHOLDER);
        assert_eq!(root.children()[1].tooltip().as_deref(), Some(UNKNOWN_PLACEHOLDER));
    }

    #[test]
    fn test_no_factory_no_root() {
        let tree = parse("var a = 1;");
        assert!(extract_dependencies(Some(&tree)).is_none());
        assert!(extract_dependencies(None).is_none());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let tree = parse(r#"define("Page", ["A"], function(a) { return {}; });"#);
        assert_eq!(extract_dependencies(Some(&tree)), extract_dependencies(Some(&tree)));
    }
}
