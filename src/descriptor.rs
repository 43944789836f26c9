//! Schema descriptor (`descriptor.json`) access
//!
//! The descriptor's `ModifiedOnUtc` timestamp keys the resource cache, and is
//! bumped on save so the platform picks up the edited schema.
//!
//! ```text
//! { "Descriptor": { "UId": "...", "ModifiedOnUtc": "\/Date(1600000000000)\/", ... } }
//! ```

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::error::LensError;

const BOM: char = '\u{feff}';

/// Sections that carry a `ModifiedOnUtc` field, in lookup order
const TIMESTAMP_SECTIONS: [&str; 2] = ["Descriptor", "SqlScript"];
const TIMESTAMP_FIELD: &str = "ModifiedOnUtc";

fn parse(path: &Path, text: &str) -> crate::error::Result<Value> {
    serde_json::from_str(text.trim_start_matches(BOM)).map_err(|e| LensError::json(path, e))
}

fn timestamp_of(descriptor: &Value) -> Option<&Value> {
    TIMESTAMP_SECTIONS
        .iter()
        .find_map(|section| descriptor.get(section)?.get(TIMESTAMP_FIELD))
}

/// `ModifiedOnUtc` of the descriptor at `path`
///
/// `Ok(None)` when the file does not exist.
pub fn read_timestamp(path: &Path) -> crate::error::Result<Option<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LensError::io(path, e)),
    };
    let descriptor = parse(path, &text)?;
    let timestamp = timestamp_of(&descriptor)
        .ok_or_else(|| LensError::MissingTimestamp(path.to_path_buf()))?;
    Ok(Some(match timestamp {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}

/// `\/Date(<millis>)\/`, the textual form the platform stores
pub fn format_timestamp(millis: u128) -> String {
    format!("\\/Date({})\\/", millis)
}

/// Set the descriptor timestamp to `millis` and write the file back
///
/// The output is pretty-printed with escaped backslashes un-doubled, so the
/// timestamp lands in the file as `\/Date(...)\/`. A leading BOM is preserved.
pub fn rewrite_timestamp(path: &Path, millis: u128) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
    let mut descriptor = parse(path, &text)?;

    let section = TIMESTAMP_SECTIONS
        .iter()
        .find(|section| {
            descriptor
                .get(**section)
                .is_some_and(|s| s.get(TIMESTAMP_FIELD).is_some())
        })
        .ok_or_else(|| LensError::MissingTimestamp(path.to_path_buf()))?;

    if let Some(fields) = descriptor.get_mut(*section).and_then(Value::as_object_mut) {
        fields.insert(TIMESTAMP_FIELD.to_string(), Value::String(format_timestamp(millis)));
    }

    let pretty = serde_json::to_string_pretty(&descriptor)
        .with_context(|| format!("Failed to serialize descriptor {}", path.display()))?;
    let mut output = pretty.replace("\\\\", "\\");
    if text.starts_with(BOM) {
        output.insert(0, BOM);
    }

    fs::write(path, output)
        .with_context(|| format!("Failed to write descriptor {}", path.display()))?;
    info!("Updated descriptor timestamp: {}", path.display());
    Ok(())
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Paths whose descriptor is currently being rewritten
#[derive(Debug, Default)]
pub struct InFlight {
    paths: Mutex<HashSet<PathBuf>>,
}

/// Marks a path as in flight until dropped
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    path: PathBuf,
}

impl InFlight {
    /// Claim `path`; `None` if a rewrite for it is already running
    pub fn begin(&self, path: &Path) -> Option<InFlightGuard<'_>> {
        let mut paths = self.paths.lock().unwrap_or_else(|e| e.into_inner());
        if !paths.insert(path.to_path_buf()) {
            debug!("Descriptor rewrite already in flight: {}", path.display());
            return None;
        }
        Some(InFlightGuard {
            owner: self,
            path: path.to_path_buf(),
        })
    }

    pub fn is_in_flight(&self, path: &Path) -> bool {
        self.paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.path);
    }
}
