//! Language Support - Shared tree-sitter language configuration
//!
//! Schema sources are JavaScript; the only other thing that depends on the file
//! type is the suffix of the resource directory that holds its localizable strings.
//! ALL grammar and extension decisions should go here to avoid duplication.

use anyhow::Result;
use std::path::Path;
use tree_sitter::Parser;

/// Get the tree-sitter language used for schema sources
pub fn get_tree_sitter_language() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Create a parser configured for schema sources
pub fn create_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&get_tree_sitter_language())
        .map_err(|e| anyhow::anyhow!("Failed to set parser language for javascript: {}", e))?;
    Ok(parser)
}

/// Kind of platform source file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Client-side schema (`.js`)
    ClientUnit,
    /// Server-side source code (`.cs`)
    SourceCode,
    Unknown,
}

impl SourceKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "js" => SourceKind::ClientUnit,
            "cs" => SourceKind::SourceCode,
            _ => SourceKind::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(SourceKind::Unknown)
    }

    /// Suffix of the `<SchemaName>.<Tag>` resource directory, `None` for unknown files
    pub fn resource_tag(&self) -> Option<&'static str> {
        match self {
            SourceKind::ClientUnit => Some("ClientUnit"),
            SourceKind::SourceCode => Some("SourceCode"),
            SourceKind::Unknown => None,
        }
    }
}

/// Whether a document should be analyzed at all (host passes the path of the active editor)
pub fn is_schema_source(path: &Path) -> bool {
    SourceKind::from_path(path) == SourceKind::ClientUnit
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parser_parses_javascript() {
        let mut parser = create_parser().unwrap();
        let tree = parser.parse("define('A', [], function() {});", None).unwrap();
        assert_eq!(tree.root_node().kind(), "program");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_resource_tags() {
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("/pkg/Schemas/Page/Page.js")).resource_tag(),
            Some("ClientUnit")
        );
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("Helper.cs")).resource_tag(),
            Some("SourceCode")
        );
        assert_eq!(SourceKind::from_path(&PathBuf::from("notes.txt")).resource_tag(), None);
        assert_eq!(SourceKind::from_path(&PathBuf::from("Makefile")).resource_tag(), None);
    }

    #[test]
    fn test_is_schema_source() {
        assert!(is_schema_source(&PathBuf::from("SomePage1.js")));
        assert!(!is_schema_source(&PathBuf::from("SomePage1.cs")));
    }
}
