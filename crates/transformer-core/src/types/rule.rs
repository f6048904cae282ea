//! Flat rule shape owned by the rules list.

use crate::types::general::{General, HttpMethod};
use crate::types::record::{Headers, Record};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A transformer rule as stored in the rules list.
///
/// The editor works on the sectioned [`Record`]; the list keeps the flat
/// form together with bookkeeping fields (`id`, `count`, `enable`) the
/// editor never touches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformRule {
    /// Unique identifier for this rule
    pub id: String,
    /// Number of requests this rule has intercepted
    #[serde(default)]
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regexp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<Headers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Headers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TransformRule {
    /// Sectioned view of this rule for the editor.
    pub fn to_record(&self) -> Record {
        Record {
            general: Some(General {
                url: self.url.clone(),
                delay: self.delay,
                regexp: self.regexp,
                method: self.method,
            }),
            response: self.response.clone(),
            body: self.body.clone(),
            request_headers: self.request_headers.clone(),
            response_headers: self.response_headers.clone(),
            code: self.code.clone(),
        }
    }

    /// Write a record emitted by the editor back into this rule.
    ///
    /// `id`, `count` and `enable` are preserved.
    pub fn apply_record(&mut self, record: &Record) {
        let general = record.general.clone().unwrap_or_default();
        self.url = general.url;
        self.delay = general.delay;
        self.regexp = general.regexp;
        self.method = general.method;
        self.response = record.response.clone();
        self.body = record.body.clone();
        self.request_headers = record.request_headers.clone();
        self.response_headers = record.response_headers.clone();
        self.code = record.code.clone();
    }
}
