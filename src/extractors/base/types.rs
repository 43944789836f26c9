// Base types shared by every extractor
//
// Locations, the uniform node interface consumed by the presentation layer,
// and the flattened tree item the host renders.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A point in the source (1-based line, 0-based column, same as the editor reports)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Source range of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
    /// Start byte offset in file
    pub start_byte: u32,
    /// End byte offset in file
    pub end_byte: u32,
}

impl SourceLocation {
    /// Zero-width location at the end of `self` (inline annotations render there)
    pub fn end_point(&self) -> SourceLocation {
        SourceLocation {
            start: self.end,
            end: self.end,
            start_byte: self.end_byte,
            end_byte: self.end_byte,
        }
    }

    /// Zero-width location at the start of `self`
    pub fn start_point(&self) -> SourceLocation {
        SourceLocation {
            start: self.start,
            end: self.start,
            start_byte: self.start_byte,
            end_byte: self.start_byte,
        }
    }

    /// Range from the start of `self` to the end of `other`
    pub fn span_to(&self, other: &SourceLocation) -> SourceLocation {
        SourceLocation {
            start: self.start,
            end: other.end,
            start_byte: self.start_byte,
            end_byte: other.end_byte,
        }
    }
}

/// Uniform lazily-expandable node consumed by tree views
///
/// Children are produced on demand from owned snapshot data, so a node stays
/// valid after the syntax tree it came from has been replaced.
pub trait SchemaNode: Debug + Send + Sync {
    fn name(&self) -> String;

    fn location(&self) -> Option<SourceLocation> {
        None
    }

    fn tooltip(&self) -> Option<String> {
        None
    }

    fn has_children(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        Vec::new()
    }
}

/// Flattened view of one `SchemaNode`, ready for a tree widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeItem {
    /// Stable identifier (MD5 of file, name and position)
    pub id: String,
    pub name: String,
    pub tooltip: Option<String>,
    pub location: Option<SourceLocation>,
    pub collapsible: bool,
}
