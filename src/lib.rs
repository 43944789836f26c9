// Creatio Lens Core - static analysis of Creatio client schema sources
//
// Parses `define(...)` schema modules with tree-sitter and derives the schema
// tree, inline constant annotations, comment regions and localized resource
// values an editor integration displays.

pub mod completion;
pub mod config;
pub mod data;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod extractors;
pub mod language;
pub mod resources;
pub mod utils;

pub use config::{Config, RegionRule};
pub use error::{LensError, Result};
pub use events::LensEvent;
pub use extractors::{LensManager, SchemaNode, SchemaRootItem, TextEdit, TreeItem};
pub use resources::{ResourceResolver, ResourceSet, ResourceValue};
