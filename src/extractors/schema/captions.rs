//! Caption bindings used for detail and diff tooltips

use tree_sitter::Node;

use crate::extractors::base::SyntaxTree;

/// Resolves a localizable string key to display text
pub trait CaptionLookup {
    /// Tooltip text for `key`, `None` when no resources are available for the file
    fn caption(&self, key: &str) -> Option<String>;
}

/// Where a caption comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caption {
    /// Text written directly in the schema
    Literal(String),
    /// Key into the schema's localizable strings
    Resource(String),
}

impl Caption {
    /// Read a caption from a value node
    ///
    /// Accepts a string literal, a member access such as
    /// `resources.localizableStrings.Key`, or a `{ bindTo: "Resources.Strings.Key" }`
    /// binding. For the last two the final path segment is the key.
    pub fn from_node(tree: &SyntaxTree, node: &Node, string_is_key: bool) -> Option<Caption> {
        match node.kind() {
            "string" => {
                let value = tree.string_value(node)?;
                Some(if string_is_key {
                    Caption::Resource(value)
                } else {
                    Caption::Literal(value)
                })
            }
            "member_expression" => {
                let path = tree.member_path(node)?;
                path.last().cloned().map(Caption::Resource)
            }
            "object" => {
                let binding = tree.object_string(node, "bindTo")?;
                binding
                    .rsplit('.')
                    .next()
                    .filter(|key| !key.is_empty())
                    .map(|key| Caption::Resource(key.to_string()))
            }
            _ => None,
        }
    }

    pub fn resource_key(&self) -> Option<&str> {
        match self {
            Caption::Resource(key) => Some(key),
            Caption::Literal(_) => None,
        }
    }

    pub fn tooltip(&self, lookup: Option<&dyn CaptionLookup>) -> Option<String> {
        match self {
            Caption::Literal(text) => Some(text.clone()),
            Caption::Resource(key) => lookup.and_then(|l| l.caption(key)),
        }
    }
}
