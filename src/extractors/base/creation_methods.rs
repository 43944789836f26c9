// TreeItem creation methods
//
// Turns any SchemaNode into the flat record a tree widget renders.

use super::types::{SchemaNode, TreeItem};

/// Generate ID for a tree item (MD5 hash of file, name and position)
pub fn generate_id(file_path: &str, name: &str, line: u32, column: u32) -> String {
    let input = format!("{}:{}:{}:{}", file_path, name, line, column);
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)
}

impl TreeItem {
    /// Create a tree item for `node`; `file_path` scopes the generated ID
    pub fn from_node(node: &dyn SchemaNode, file_path: &str) -> Self {
        let name = node.name();
        let location = node.location();
        let (line, column) = location
            .map(|loc| (loc.start.line, loc.start.column))
            .unwrap_or((0, 0));

        TreeItem {
            id: generate_id(file_path, &name, line, column),
            name,
            tooltip: node.tooltip(),
            location,
            collapsible: node.has_children(),
        }
    }

    /// Expand `node` one level into tree items
    pub fn children_of(node: &dyn SchemaNode, file_path: &str) -> Vec<TreeItem> {
        node.children()
            .iter()
            .map(|child| TreeItem::from_node(child.as_ref(), file_path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::types::{Position, SourceLocation};

    #[derive(Debug)]
    struct Leaf(&'static str);

    impl SchemaNode for Leaf {
        fn name(&self) -> String {
            self.0.to_string()
        }

        fn location(&self) -> Option<SourceLocation> {
            let at = Position { line: 3, column: 4 };
            Some(SourceLocation {
                start: at,
                end: at,
                start_byte: 10,
                end_byte: 10,
            })
        }
    }

    #[test]
    fn test_ids_are_stable_and_distinct() {
        let a = TreeItem::from_node(&Leaf("a"), "Page.js");
        let again = TreeItem::from_node(&Leaf("a"), "Page.js");
        let b = TreeItem::from_node(&Leaf("b"), "Page.js");

        assert_eq!(a.id, again.id);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 32);
        assert!(!a.collapsible);
    }
}
