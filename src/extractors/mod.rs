//! Creatio Lens extractors
//!
//! Tree-sitter based analysis of client schema sources. Everything here reads
//! an immutable `SyntaxTree` snapshot and returns owned results.
//!
//! # Architecture
//!
//! - `base` - SyntaxTree, shape helpers, SchemaNode and TreeItem
//! - `schema` - property locator and the per-category root extractors
//! - `highlights` - constant annotator (enum names, business rule descriptions)
//! - `regions` - comment-delimited region scanner
//! - `manager` - LensManager session tying the above to config, resources and events

pub mod base;
pub mod highlights;
pub mod manager;
pub mod regions;
pub mod schema;

// Re-export the public API
pub use base::{SchemaNode, SourceLocation, SyntaxTree, TreeItem};
pub use highlights::{annotate, Highlight, HighlightRule};
pub use manager::{LensManager, TextEdit};
pub use regions::{scan_regions, Region, RegionMatcher};
pub use schema::{extract_schema_roots, SchemaRootItem};
