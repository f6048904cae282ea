//! Shape checks for values reported by section viewers.

use crate::types::general::HttpMethod;
use crate::types::section::Section;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Field path, empty for the section root
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validator a section viewer is configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    General,
    Headers,
    Code,
    Any,
}

impl ValidatorKind {
    pub fn for_section(section: Section) -> Self {
        match section {
            Section::General => ValidatorKind::General,
            Section::RequestHeaders | Section::ResponseHeaders => ValidatorKind::Headers,
            Section::Code => ValidatorKind::Code,
            Section::Body | Section::Response => ValidatorKind::Any,
        }
    }

    pub fn validate(self, value: &Value) -> Vec<ValidationIssue> {
        match self {
            ValidatorKind::General => validate_general(value),
            ValidatorKind::Headers => validate_headers(value),
            ValidatorKind::Code => validate_code(value),
            ValidatorKind::Any => Vec::new(),
        }
    }
}

/// Validate the `general` section.
pub fn validate_general(value: &Value) -> Vec<ValidationIssue> {
    let Some(general) = value.as_object() else {
        return vec![ValidationIssue::new("", "general must be an object")];
    };

    let mut issues = Vec::new();

    let url = general.get("url");
    if let Some(url) = url {
        if !url.is_string() {
            issues.push(ValidationIssue::new("url", "url must be a string"));
        }
    }

    if let Some(delay) = general.get("delay") {
        if delay.as_u64().is_none() {
            issues.push(ValidationIssue::new(
                "delay",
                "delay must be a non-negative integer",
            ));
        }
    }

    let regexp = general.get("regexp");
    if let Some(regexp) = regexp {
        if !regexp.is_boolean() {
            issues.push(ValidationIssue::new("regexp", "regexp must be a boolean"));
        }
    }

    if let Some(method) = general.get("method") {
        let known = method
            .as_str()
            .is_some_and(|m| HttpMethod::LITERALS.iter().any(|literal| *literal == m));
        if !known {
            issues.push(ValidationIssue::new(
                "method",
                format!("method must be one of {:?}", HttpMethod::LITERALS),
            ));
        }
    }

    if regexp.and_then(Value::as_bool) == Some(true) {
        if let Some(pattern) = url.and_then(Value::as_str) {
            if let Err(e) = Regex::new(pattern) {
                issues.push(ValidationIssue::new(
                    "url",
                    format!("url is not a valid regular expression: {}", e),
                ));
            }
        }
    }

    issues
}

/// Validate a headers section.
pub fn validate_headers(value: &Value) -> Vec<ValidationIssue> {
    let Some(headers) = value.as_object() else {
        return vec![ValidationIssue::new("", "headers must be an object")];
    };

    let mut issues = Vec::new();
    for (name, header_value) in headers {
        if name.trim().is_empty() {
            issues.push(ValidationIssue::new(name.clone(), "header name is empty"));
        }
        if !header_value.is_string() {
            issues.push(ValidationIssue::new(
                name.clone(),
                "header value must be a string",
            ));
        }
    }
    issues
}

fn validate_code(value: &Value) -> Vec<ValidationIssue> {
    if value.is_string() {
        Vec::new()
    } else {
        vec![ValidationIssue::new("", "code must be a string")]
    }
}
