// Feature configuration
//
// The host sends partial JSON objects; they are deep-merged over the current
// configuration. Arrays in an override replace the base array wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Begin/end marker grammar for regions
///
/// `begin_regex` may define a `name` capture group for the region title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRule {
    pub begin_regex: String,
    pub end_regex: String,
}

impl RegionRule {
    pub fn new(begin_regex: &str, end_regex: &str) -> Self {
        RegionRule {
            begin_regex: begin_regex.to_string(),
            end_regex: end_regex.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegionConfig {
    pub enabled: bool,
    pub rules: Vec<RegionRule>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            enabled: true,
            rules: vec![
                // region Name ... // endregion (also #region)
                RegionRule::new(r"(?i)^//\s*#?region\b\s*(?P<name>.*)$", r"(?i)^//\s*#?endregion\b"),
                // /** @Region Name */ ... /** @EndRegion */
                RegionRule::new(
                    r"(?i)^/\*+\s*@Region\b\s*(?P<name>.*?)\s*\*/$",
                    r"(?i)^/\*+\s*@EndRegion\b",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Rewrite the descriptor timestamp on save
    pub descriptor: bool,
    /// Schema tree extraction
    pub schema: bool,
    /// Inline constant annotations
    pub highlight: bool,
    /// Localizable string lookups (hover, resource list, captions)
    pub resource: bool,
    pub region: RegionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            descriptor: true,
            schema: true,
            highlight: true,
            resource: true,
            region: RegionConfig::default(),
        }
    }
}

impl Config {
    /// Deep-merge `overrides` into this configuration
    ///
    /// Unknown keys are carried through the merge and dropped on deserialization.
    pub fn apply(&self, overrides: &Value) -> Result<Config> {
        let mut merged = serde_json::to_value(self)?;
        merge_values(&mut merged, overrides);
        Ok(serde_json::from_value(merged)?)
    }
}

/// Objects merge key by key, `null` keeps the base, anything else replaces it
pub fn merge_values(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        if !value.is_null() {
                            base_map.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
        }
        (base, value) => *base = value.clone(),
    }
}
