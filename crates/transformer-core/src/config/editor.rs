//! Editor configuration.

use crate::config::error::ConfigError;
use crate::config::parser;
use crate::diagnostics::DiagnosticMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings resolved once at startup and passed to the editor surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Where script diagnostics are delivered
    pub diagnostic_mode: DiagnosticMode,
    /// JSON file backing UI state such as expanded panels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    /// Path or glob pattern of rule files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<String>,
}

impl EditorConfig {
    /// Load from a YAML, JSON or JSONC file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        parser::load_file(path)
    }
}
