//! The record edited by the transformer editor and section-level patches.

use crate::types::general::General;
use crate::types::section::Section;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Header name to header value
pub type Headers = HashMap<String, String>;

/// Transformer record.
///
/// Every field is independently optional on the wire. `response` and `body`
/// distinguish an absent field (`None`) from an explicit `null`
/// (`Some(Value::Null)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Request-matching configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<General>,
    /// Mocked or captured response body
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<Value>,
    /// Request body
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub body: Option<Value>,
    /// Request headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<Headers>,
    /// Response headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Headers>,
    /// Post-processing script
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Keep an explicit `null` as `Some(Value::Null)`; absent fields fall back to `None`
/// through `#[serde(default)]`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// New value for exactly one section of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    General(General),
    RequestHeaders(Headers),
    ResponseHeaders(Headers),
    Body(Value),
    Response(Value),
    Code(String),
}

impl Patch {
    /// Section this patch replaces
    pub fn section(&self) -> Section {
        match self {
            Patch::General(_) => Section::General,
            Patch::RequestHeaders(_) => Section::RequestHeaders,
            Patch::ResponseHeaders(_) => Section::ResponseHeaders,
            Patch::Body(_) => Section::Body,
            Patch::Response(_) => Section::Response,
            Patch::Code(_) => Section::Code,
        }
    }

    /// Build a typed patch from the raw value a section viewer reports.
    pub fn from_value(section: Section, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match section {
            Section::General => Patch::General(serde_json::from_value(value)?),
            Section::RequestHeaders => Patch::RequestHeaders(serde_json::from_value(value)?),
            Section::ResponseHeaders => Patch::ResponseHeaders(serde_json::from_value(value)?),
            Section::Body => Patch::Body(value),
            Section::Response => Patch::Response(value),
            Section::Code => Patch::Code(serde_json::from_value(value)?),
        })
    }
}

impl Record {
    /// The default record: every object-valued section empty, `code` empty.
    pub fn default_shape() -> Self {
        Self {
            general: Some(General::default()),
            response: Some(Value::Object(serde_json::Map::new())),
            body: Some(Value::Object(serde_json::Map::new())),
            request_headers: Some(Headers::new()),
            response_headers: Some(Headers::new()),
            code: Some(String::new()),
        }
    }

    /// Shallow-merge `incoming` over the default record. Fields present in
    /// `incoming` win, absent ones take the default shape.
    pub fn normalized(incoming: &Record) -> Self {
        let defaults = Self::default_shape();
        Self {
            general: incoming.general.clone().or(defaults.general),
            response: incoming.response.clone().or(defaults.response),
            body: incoming.body.clone().or(defaults.body),
            request_headers: incoming.request_headers.clone().or(defaults.request_headers),
            response_headers: incoming
                .response_headers
                .clone()
                .or(defaults.response_headers),
            code: incoming.code.clone().or(defaults.code),
        }
    }

    /// Whether every section holds a value.
    pub fn is_complete(&self) -> bool {
        self.general.is_some()
            && self.response.is_some()
            && self.body.is_some()
            && self.request_headers.is_some()
            && self.response_headers.is_some()
            && self.code.is_some()
    }

    /// Replace one section, leaving every other field untouched.
    pub fn apply_patch(mut self, patch: Patch) -> Self {
        match patch {
            Patch::General(general) => self.general = Some(general),
            Patch::RequestHeaders(headers) => self.request_headers = Some(headers),
            Patch::ResponseHeaders(headers) => self.response_headers = Some(headers),
            Patch::Body(body) => self.body = Some(body),
            Patch::Response(response) => self.response = Some(response),
            Patch::Code(code) => self.code = Some(code),
        }
        self
    }

    /// Current value of a section as JSON (`null` when absent).
    pub fn section_value(&self, section: Section) -> Value {
        let value = match section {
            Section::General => self.general.as_ref().map(serde_json::to_value),
            Section::RequestHeaders => self.request_headers.as_ref().map(serde_json::to_value),
            Section::ResponseHeaders => self.response_headers.as_ref().map(serde_json::to_value),
            Section::Body => return self.body.clone().unwrap_or(Value::Null),
            Section::Response => return self.response.clone().unwrap_or(Value::Null),
            Section::Code => return self.code.clone().map(Value::String).unwrap_or(Value::Null),
        };
        value.and_then(Result::ok).unwrap_or(Value::Null)
    }

    /// Number of entries shown next to a section title.
    ///
    /// A body counts its keys, items or characters. Scalars count as zero.
    pub fn entry_count(&self, section: Section) -> usize {
        match section {
            Section::RequestHeaders => self.request_headers.as_ref().map_or(0, HashMap::len),
            Section::ResponseHeaders => self.response_headers.as_ref().map_or(0, HashMap::len),
            Section::Body => match &self.body {
                Some(Value::Object(map)) => map.len(),
                Some(Value::Array(items)) => items.len(),
                Some(Value::String(text)) => text.chars().count(),
                _ => 0,
            },
            _ => 0,
        }
    }

    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::general::HttpMethod;
    use rstest::rstest;
    use serde_json::json;

    fn h(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| ((*k).into(), (*v).into()))
            .collect()
    }

    fn sample_record() -> Record {
        Record {
            general: Some(General {
                url: Some("/api/users".to_string()),
                delay: Some(100),
                regexp: Some(false),
                method: Some(HttpMethod::Get),
            }),
            response: Some(json!([{"id": 1}, {"id": 2}])),
            body: Some(json!({"page": 1})),
            request_headers: Some(h(&[("Accept", "application/json")])),
            response_headers: Some(h(&[("Content-Type", "application/json")])),
            code: Some("e => e[*].id".to_string()),
        }
    }

    #[rstest]
    fn test_deserialize_camel_case_fields() {
        let record: Record = serde_json::from_value(json!({
            "requestHeaders": {"a": "1"},
            "responseHeaders": {"b": "2"}
        }))
        .expect("Should deserialize");
        assert_eq!(record.request_headers, Some(h(&[("a", "1")])));
        assert_eq!(record.response_headers, Some(h(&[("b", "2")])));
        assert_eq!(record.general, None);
    }

    #[rstest]
    fn test_explicit_null_response_is_kept() {
        let record: Record =
            serde_json::from_value(json!({"response": null})).expect("Should deserialize");
        assert_eq!(record.response, Some(Value::Null));
        assert_eq!(record.body, None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, json!({"response": null}));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"body": {"a": 1}}))]
    #[case(json!({"code": "e => e"}))]
    #[case(json!({"general": {"url": "/x"}, "response": null}))]
    fn test_normalized_is_complete(#[case] input: Value) {
        let incoming: Record = serde_json::from_value(input).expect("Should deserialize");
        let normalized = Record::normalized(&incoming);
        assert!(normalized.is_complete());
    }

    #[rstest]
    fn test_normalized_incoming_wins() {
        let incoming: Record = serde_json::from_value(json!({"body": {"a": 1}})).unwrap();
        let normalized = Record::normalized(&incoming);
        assert_eq!(normalized.body, Some(json!({"a": 1})));
        assert_eq!(normalized.response, Some(json!({})));
        assert_eq!(normalized.general, Some(General::default()));
        assert_eq!(normalized.request_headers, Some(Headers::new()));
        assert_eq!(normalized.code.as_deref(), Some(""));
    }

    #[rstest]
    fn test_normalized_is_idempotent() {
        let incoming: Record = serde_json::from_value(json!({"body": {"a": 1}})).unwrap();
        let once = Record::normalized(&incoming);
        let twice = Record::normalized(&once);
        assert_eq!(once, twice);
    }

    #[rstest]
    fn test_apply_patch_touches_only_one_field() {
        let record = sample_record();
        let patched = record
            .clone()
            .apply_patch(Patch::ResponseHeaders(h(&[("x", "1")])));

        assert_eq!(patched.response_headers, Some(h(&[("x", "1")])));
        assert_eq!(patched.general, record.general);
        assert_eq!(patched.response, record.response);
        assert_eq!(patched.body, record.body);
        assert_eq!(patched.request_headers, record.request_headers);
        assert_eq!(patched.code, record.code);
    }

    #[rstest]
    fn test_apply_patch_request_headers_updates_plural_field() {
        let patched = Record::default_shape().apply_patch(Patch::RequestHeaders(h(&[("a", "1")])));
        assert_eq!(patched.request_headers, Some(h(&[("a", "1")])));
        let json = serde_json::to_value(&patched).unwrap();
        assert_eq!(json["requestHeaders"], json!({"a": "1"}));
        assert!(json.get("requestHeader").is_none());
    }

    #[rstest]
    fn test_apply_patch_order_independent() {
        let a = Patch::Body(json!({"q": 1}));
        let b = Patch::Code("length(@)".to_string());

        let ab = sample_record().apply_patch(a.clone()).apply_patch(b.clone());
        let ba = sample_record().apply_patch(b).apply_patch(a);
        assert_eq!(ab, ba);
    }

    #[rstest]
    #[case(Section::General, json!({"url": "/x", "method": "put"}))]
    #[case(Section::RequestHeaders, json!({"a": "1"}))]
    #[case(Section::ResponseHeaders, json!({}))]
    #[case(Section::Body, json!([1, 2]))]
    #[case(Section::Response, json!(null))]
    #[case(Section::Code, json!("@"))]
    fn test_patch_from_value(#[case] section: Section, #[case] value: Value) {
        let patch = Patch::from_value(section, value.clone()).expect("Should convert");
        assert_eq!(patch.section(), section);
        let record = Record::default_shape().apply_patch(patch);
        assert_eq!(record.section_value(section), value);
    }

    #[rstest]
    #[case(Section::General, json!({"delay": "slow"}))]
    #[case(Section::RequestHeaders, json!({"a": 1}))]
    #[case(Section::Code, json!(42))]
    fn test_patch_from_value_rejects_wrong_shape(#[case] section: Section, #[case] value: Value) {
        assert!(Patch::from_value(section, value).is_err());
    }

    #[rstest]
    #[case(Section::RequestHeaders, 1)]
    #[case(Section::ResponseHeaders, 1)]
    #[case(Section::Body, 1)]
    #[case(Section::General, 0)]
    #[case(Section::Response, 0)]
    fn test_entry_count(#[case] section: Section, #[case] expected: usize) {
        assert_eq!(sample_record().entry_count(section), expected);
    }

    #[rstest]
    #[case(json!({"a": 1, "b": 2}), 2)]
    #[case(json!([1, 2, 3]), 3)]
    #[case(json!("page=1"), 6)]
    #[case(json!(""), 0)]
    #[case(json!(42), 0)]
    #[case(json!(null), 0)]
    fn test_body_entry_count(#[case] body: Value, #[case] expected: usize) {
        let record = Record {
            body: Some(body),
            ..Record::default()
        };
        assert_eq!(record.entry_count(Section::Body), expected);
    }

    #[rstest]
    fn test_section_value_absent_is_null() {
        let record = Record::default();
        for section in Section::ALL {
            assert_eq!(record.section_value(section), Value::Null);
        }
    }
}
