//! Request-matching configuration shown in the `general` section.

use serde::{Deserialize, Serialize};

/// HTTP method a rule applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
    Put,
    /// Empty string on the wire, matches any method
    #[serde(rename = "")]
    Any,
}

impl HttpMethod {
    /// Wire literals accepted for `method`.
    pub const LITERALS: [&'static str; 5] = ["get", "post", "delete", "put", ""];
}

/// General section of a record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct General {
    /// URL (or regular expression when `regexp` is set) the rule targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Delay in milliseconds before the mocked response is delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Treat `url` as a regular expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regexp: Option<bool>,
    /// HTTP method filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
}
