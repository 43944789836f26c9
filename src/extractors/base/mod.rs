// Base types and tree access shared by all extractors
//
// - types.rs: locations, the SchemaNode interface, TreeItem
// - syntax_tree.rs: SyntaxTree snapshot (tree + source)
// - tree_methods.rs: JavaScript shape helpers on SyntaxTree
// - creation_methods.rs: TreeItem construction

pub mod creation_methods;
pub mod syntax_tree;
pub mod tree_methods;
pub mod types;

// Re-export key types for external use
pub use creation_methods::generate_id;
pub use syntax_tree::SyntaxTree;
pub use tree_methods::{as_integer, parse_js_number};
pub use types::{Position, SchemaNode, SourceLocation, TreeItem};
