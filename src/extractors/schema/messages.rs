//! Message root: `messages: { Name: { mode, direction } }` grouped by direction

use serde::Serialize;
use tree_sitter::Node;

use super::located_object;
use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageDirection {
    Subscribe,
    Publish,
    Bidirectional,
}

impl MessageDirection {
    /// Group order in the tree
    pub const ALL: [MessageDirection; 3] = [
        MessageDirection::Subscribe,
        MessageDirection::Publish,
        MessageDirection::Bidirectional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageDirection::Subscribe => "SUBSCRIBE",
            MessageDirection::Publish => "PUBLISH",
            MessageDirection::Bidirectional => "BIDIRECTIONAL",
        }
    }

    /// Accepts both the enum member (`SUBSCRIBE`) and its runtime value (`"subscribe"`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUBSCRIBE" => Some(MessageDirection::Subscribe),
            "PUBLISH" => Some(MessageDirection::Publish),
            "BIDIRECTIONAL" => Some(MessageDirection::Bidirectional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageItem {
    pub name: String,
    pub direction: MessageDirection,
    /// `ptp` / `broadcast`, or the member name when written as `Terrasoft.MessageMode.PTP`
    pub mode: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageGroup {
    pub direction: MessageDirection,
    pub items: Vec<MessageItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRoot {
    /// Always three groups: SUBSCRIBE, PUBLISH, BIDIRECTIONAL
    pub groups: Vec<MessageGroup>,
    pub location: SourceLocation,
}

pub fn extract_messages(tree: Option<&SyntaxTree>) -> Option<MessageRoot> {
    let (tree, property, pairs) = located_object(tree, "messages")?;

    let messages: Vec<MessageItem> = pairs
        .iter()
        .filter_map(|pair| {
            let config = tree.unwrap_parens(pair.child_by_field_name("value")?);
            let direction = resolve_symbol(tree, &config, "direction")
                .and_then(|name| MessageDirection::from_name(&name))?;
            Some(MessageItem {
                name: tree.property_name(pair)?,
                direction,
                mode: resolve_symbol(tree, &config, "mode"),
                location: tree.location(pair),
            })
        })
        .collect();

    let groups = MessageDirection::ALL
        .iter()
        .map(|direction| MessageGroup {
            direction: *direction,
            items: messages
                .iter()
                .filter(|m| m.direction == *direction)
                .cloned()
                .collect(),
        })
        .collect();

    Some(MessageRoot {
        groups,
        location: property.location,
    })
}

/// A string literal value, or the last segment of a member access
fn resolve_symbol(tree: &SyntaxTree, config: &Node, name: &str) -> Option<String> {
    let value = tree.object_property(config, name)?;
    tree.string_value(&value).or_else(|| {
        tree.member_path(&value)
            .filter(|path| path.len() > 1)
            .and_then(|path| path.last().cloned())
    })
}

impl SchemaNode for MessageItem {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn tooltip(&self) -> Option<String> {
        self.mode.clone()
    }
}

impl SchemaNode for MessageGroup {
    fn name(&self) -> String {
        self.direction.as_str().to_string()
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

impl SchemaNode for MessageRoot {
    fn name(&self) -> String {
        "Messages".to_string()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn has_children(&self) -> bool {
        true
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        self.groups
            .iter()
            .map(|group| Box::new(group.clone()) as Box<dyn SchemaNode>)
            .collect()
    }
}
