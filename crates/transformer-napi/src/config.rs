//! Config and rule loading bindings for Node.js.

use crate::types::{from_js, to_js};
use napi::bindgen_prelude::*;
use napi_derive::napi;
use std::path::Path;
use transformer_core::config::editor::EditorConfig;
use transformer_core::config::parser;
use transformer_core::types::rule::TransformRule;
use transformer_core::Record;

/// Load editor configuration from a YAML, JSON or JSONC file
#[napi]
pub fn load_editor_config(path: String) -> Result<serde_json::Value> {
    let config = EditorConfig::load(Path::new(&path))
        .map_err(|e| Error::from_reason(format!("Failed to load config: {e}")))?;
    to_js(&config)
}

/// Load rules from a path or glob pattern
#[napi]
pub fn load_rules(pattern: String) -> Result<Vec<serde_json::Value>> {
    let rules = parser::load_rules(&pattern)
        .map_err(|e| Error::from_reason(format!("Failed to load rules: {e}")))?;
    rules.iter().map(to_js).collect()
}

/// Sectioned record for a flat rule
#[napi]
pub fn rule_to_record(rule: serde_json::Value) -> Result<serde_json::Value> {
    let rule: TransformRule = from_js(rule, "rule")?;
    to_js(&rule.to_record())
}

/// Write an editor record back into a flat rule
#[napi]
pub fn apply_record(
    rule: serde_json::Value,
    record: serde_json::Value,
) -> Result<serde_json::Value> {
    let mut rule: TransformRule = from_js(rule, "rule")?;
    let record: Record = from_js(record, "record")?;
    rule.apply_record(&record);
    to_js(&rule)
}
