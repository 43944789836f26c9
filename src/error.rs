// Error types for environment failures
//
// Shape problems in schema source never become errors; they degrade to
// missing roots or empty lists. Only file system and JSON problems end up here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LensError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Descriptor '{0}' has no ModifiedOnUtc timestamp")]
    MissingTimestamp(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to load grammar: {0}")]
    Grammar(String),

    #[error("Edit {start}..{end} does not fit a document of {len} bytes")]
    InvalidEdit { start: usize, end: usize, len: usize },
}

impl LensError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LensError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        LensError::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LensError>;
