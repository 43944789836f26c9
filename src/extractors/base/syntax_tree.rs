// SyntaxTree - immutable parse snapshot of one schema source
//
// Owns the tree-sitter tree together with the text it was parsed from, so node
// text and locations can be read without threading the source around.

use tracing::debug;
use tree_sitter::{Node, Parser, Point, Tree};

use super::types::{Position, SourceLocation};

#[derive(Clone)]
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.tree.root_node().kind())
            .field("len", &self.source.len())
            .finish()
    }
}

impl SyntaxTree {
    /// Parse `source` from scratch. `None` when the source does not parse cleanly.
    pub fn parse(parser: &mut Parser, source: &str) -> Option<Self> {
        let tree = parser.parse(source, None)?;
        Self::from_tree(tree, source.to_string())
    }

    /// Wrap an already parsed tree; rejects trees containing ERROR or MISSING nodes
    pub fn from_tree(tree: Tree, source: String) -> Option<Self> {
        if tree.root_node().has_error() {
            debug!("Parse produced syntax errors, discarding tree");
            return None;
        }
        Some(Self { tree, source })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> &str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    pub fn location(&self, node: &Node) -> SourceLocation {
        SourceLocation {
            start: to_position(node.start_position()),
            end: to_position(node.end_position()),
            start_byte: node.start_byte() as u32,
            end_byte: node.end_byte() as u32,
        }
    }

    /// Pre-order search; returns the first node accepted by `predicate`
    pub fn find_first<'t, P>(&'t self, mut predicate: P) -> Option<Node<'t>>
    where
        P: FnMut(Node<'t>) -> bool,
    {
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if predicate(node) {
                return Some(node);
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return None;
                }
            }
        }
    }

    /// Visit every node in pre-order (source order)
    pub fn walk_tree<'t, F>(&'t self, mut visitor: F)
    where
        F: FnMut(Node<'t>),
    {
        self.find_first(|node| {
            visitor(node);
            false
        });
    }

    /// Find nodes by type, in source order
    pub fn find_nodes_by_type(&self, node_type: &str) -> Vec<Node<'_>> {
        let mut nodes = Vec::new();
        self.walk_tree(|node| {
            if node.kind() == node_type {
                nodes.push(node);
            }
        });
        nodes
    }

    /// All comments in source order
    pub fn comments(&self) -> Vec<Node<'_>> {
        self.find_nodes_by_type("comment")
    }
}

fn to_position(point: Point) -> Position {
    Position {
        line: point.row as u32 + 1,
        column: point.column as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::create_parser;

    #[test]
    fn test_invalid_source_yields_no_tree() {
        let mut parser = create_parser().unwrap();
        assert!(SyntaxTree::parse(&mut parser, "define('A', [, function( {").is_none());
    }

    #[test]
    fn test_locations_are_one_based_lines() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(&mut parser, "var a = 1;\nvar b = 22;").unwrap();
        let numbers = tree.find_nodes_by_type("number");
        assert_eq!(numbers.len(), 2);

        let loc = tree.location(&numbers[1]);
        assert_eq!(loc.start, Position { line: 2, column: 8 });
        assert_eq!(loc.end, Position { line: 2, column: 10 });
        assert_eq!(tree.get_node_text(&numbers[1]), "22");
    }

    #[test]
    fn test_comments_in_source_order() {
        let mut parser = create_parser().unwrap();
        let tree = SyntaxTree::parse(&mut parser, "// a\nvar x = { /* b */ y: 1 }; // c").unwrap();
        let texts: Vec<&str> = tree
            .comments()
            .iter()
            .map(|c| tree.get_node_text(c))
            .collect();
        assert_eq!(texts, vec!["// a", "/* b */", "// c"]);
    }
}
