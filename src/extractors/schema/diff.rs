//! Diff root: view layout operations grouped by kind
//!
//! Non-insert operations are listed flat. Insert operations form a forest by
//! `parentName`: an entry is a root when no other insert entry carries that name,
//! and children are found by reverse lookup on expansion. The lookup is O(n²)
//! over the insert entries, fine for the tens to low hundreds a schema holds.
//!
//! Nothing stops `name`/`parentName` from forming a cycle (duplicate names make
//! one reachable), so expansion stops at `MAX_DIFF_DEPTH`.

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use tree_sitter::Node;

use super::captions::{Caption, CaptionLookup};
use super::locator::locate_top_level_property;
use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

/// Deepest insert nesting expanded before a `parentName` cycle is assumed
pub const MAX_DIFF_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOperation {
    Remove,
    Merge,
    Insert,
    Move,
}

impl DiffOperation {
    /// Group order in the tree
    pub const ALL: [DiffOperation; 4] = [
        DiffOperation::Remove,
        DiffOperation::Merge,
        DiffOperation::Insert,
        DiffOperation::Move,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "remove" => Some(DiffOperation::Remove),
            "merge" => Some(DiffOperation::Merge),
            "insert" => Some(DiffOperation::Insert),
            "move" => Some(DiffOperation::Move),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffOperation::Remove => "remove",
            DiffOperation::Merge => "merge",
            DiffOperation::Insert => "insert",
            DiffOperation::Move => "move",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub operation: DiffOperation,
    pub name: String,
    pub parent_name: Option<String>,
    pub property_name: Option<String>,
    pub caption_key: Option<String>,
    pub tooltip: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffGroup {
    pub operation: DiffOperation,
    /// Entries of this operation in source order
    pub entries: Arc<Vec<DiffEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffRoot {
    /// Only operations that occur, in `DiffOperation::ALL` order
    pub groups: Vec<DiffGroup>,
    pub location: SourceLocation,
}

pub fn extract_diff(
    tree: Option<&SyntaxTree>,
    captions: Option<&dyn CaptionLookup>,
) -> Option<DiffRoot> {
    let property = locate_top_level_property(tree, "diff")?;
    let tree = tree?;
    if property.value.kind() != "array" {
        return None;
    }

    let entries: Vec<DiffEntry> = tree
        .named_children_of(&property.value)
        .iter()
        .map(|element| tree.unwrap_parens(*element))
        .filter_map(|element| read_entry(tree, &element, captions))
        .collect();

    let groups = DiffOperation::ALL
        .iter()
        .filter_map(|operation| {
            let matching: Vec<DiffEntry> = entries
                .iter()
                .filter(|e| e.operation == *operation)
                .cloned()
                .collect();
            (!matching.is_empty()).then(|| DiffGroup {
                operation: *operation,
                entries: Arc::new(matching),
            })
        })
        .collect();

    Some(DiffRoot {
        groups,
        location: property.location,
    })
}

fn read_entry(
    tree: &SyntaxTree,
    element: &Node,
    captions: Option<&dyn CaptionLookup>,
) -> Option<DiffEntry> {
    if element.kind() != "object" {
        return None;
    }
    let operation = tree
        .object_string(element, "operation")
        .and_then(|op| DiffOperation::parse(&op))?;
    let name = tree.object_string(element, "name")?;

    let caption = tree
        .object_property(element, "values")
        .and_then(|values| {
            tree.object_property(&values, "caption")
                .or_else(|| tree.object_property(&values, "captionValue"))
        })
        .and_then(|value| Caption::from_node(tree, &value, false));

    Some(DiffEntry {
        operation,
        name,
        parent_name: tree.object_string(element, "parentName"),
        property_name: tree.object_string(element, "propertyName"),
        caption_key: caption.as_ref().and_then(|c| c.resource_key()).map(str::to_string),
        tooltip: caption.as_ref().and_then(|c| c.tooltip(captions)),
        location: tree.location(element),
    })
}

impl DiffGroup {
    /// Indices of insert entries with no other entry named after their `parentName`
    pub fn forest_roots(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(index, entry)| match entry.parent_name.as_deref() {
                None => true,
                Some(parent) => !self
                    .entries
                    .iter()
                    .enumerate()
                    .any(|(other, e)| other != *index && e.name == parent),
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// One insert entry inside the forest; children resolved lazily
#[derive(Debug, Clone)]
pub struct DiffInsertNode {
    entries: Arc<Vec<DiffEntry>>,
    index: usize,
    depth: usize,
}

impl DiffInsertNode {
    pub fn entry(&self) -> &DiffEntry {
        &self.entries[self.index]
    }

    fn child_indices(&self) -> Vec<usize> {
        let name = &self.entry().name;
        self.entries
            .iter()
            .enumerate()
            .filter(|(index, e)| *index != self.index && e.parent_name.as_deref() == Some(name.as_str()))
            .map(|(index, _)| index)
            .collect()
    }
}

impl SchemaNode for DiffInsertNode {
    fn name(&self) -> String {
        self.entry().name.clone()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.entry().location)
    }

    fn tooltip(&self) -> Option<String> {
        self.entry().tooltip.clone()
    }

    fn has_children(&self) -> bool {
        self.depth < MAX_DIFF_DEPTH && !self.child_indices().is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        if self.depth >= MAX_DIFF_DEPTH {
            warn!(
                "Diff insert '{}' nested deeper than {}, parentName cycle assumed",
                self.entry().name,
                MAX_DIFF_DEPTH
            );
            return Vec::new();
        }
        self.child_indices()
            .into_iter()
            .map(|index| {
                Box::new(DiffInsertNode {
                    entries: Arc::clone(&self.entries),
                    index,
                    depth: self.depth + 1,
                }) as Box<dyn SchemaNode>
            })
            .collect()
    }
}

impl SchemaNode for DiffEntry {
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

impl SchemaNode for DiffGroup {
    fn name(&self) -> String {
        self.operation.as_str().to_string()
    }

    fn has_children(&self) -> bool {
        !self.entries.is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        if self.operation != DiffOperation::Insert {
            return self
                .entries
                .iter()
                .map(|entry| Box::new(entry.clone()) as Box<dyn SchemaNode>)
                .collect();
        }
        self.forest_roots()
            .into_iter()
            .map(|index| {
                Box::new(DiffInsertNode {
                    entries: Arc::clone(&self.entries),
                    index,
                    depth: 0,
                }) as Box<dyn SchemaNode>
            })
            .collect()
    }
}

impl SchemaNode for DiffRoot {
    fn name(&self) -> String {
        "Diff".to_string()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn has_children(&self) -> bool {
        !self.groups.is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        self.groups
            .iter()
            .map(|group| Box::new(group.clone()) as Box<dyn SchemaNode>)
            .collect()
    }
}
