//! Shared binding types and conversions.

use napi::bindgen_prelude::*;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use transformer_core::editor::{ResponseView as CoreResponseView, ViewerProps as CoreViewerProps};
use transformer_core::Section as CoreSection;

/// Editor section
#[napi]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    General,
    RequestHeaders,
    ResponseHeaders,
    Body,
    Response,
    Code,
}

impl From<Section> for CoreSection {
    fn from(s: Section) -> Self {
        match s {
            Section::General => CoreSection::General,
            Section::RequestHeaders => CoreSection::RequestHeaders,
            Section::ResponseHeaders => CoreSection::ResponseHeaders,
            Section::Body => CoreSection::Body,
            Section::Response => CoreSection::Response,
            Section::Code => CoreSection::Code,
        }
    }
}

impl From<CoreSection> for Section {
    fn from(s: CoreSection) -> Self {
        match s {
            CoreSection::General => Section::General,
            CoreSection::RequestHeaders => Section::RequestHeaders,
            CoreSection::ResponseHeaders => Section::ResponseHeaders,
            CoreSection::Body => Section::Body,
            CoreSection::Response => Section::Response,
            CoreSection::Code => Section::Code,
        }
    }
}

/// Response section rendering
#[napi(string_enum)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseView {
    Fields,
    Raw,
}

impl From<CoreResponseView> for ResponseView {
    fn from(v: CoreResponseView) -> Self {
        match v {
            CoreResponseView::Fields => ResponseView::Fields,
            CoreResponseView::Raw => ResponseView::Raw,
        }
    }
}

/// Properties for the widget rendering a section
#[napi(object)]
#[derive(Clone)]
pub struct ViewerProps {
    pub widget: String,
    pub value: serde_json::Value,
    pub readonly: bool,
    pub min_rows: Option<u32>,
    pub max_rows: Option<u32>,
    pub validator: String,
}

impl From<CoreViewerProps> for ViewerProps {
    fn from(p: CoreViewerProps) -> Self {
        Self {
            widget: enum_name(&p.widget),
            value: p.value,
            readonly: p.readonly,
            min_rows: p.min_rows,
            max_rows: p.max_rows,
            validator: enum_name(&p.validator),
        }
    }
}

/// Serialized name of a unit enum variant
fn enum_name<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

/// Deserialize a JS value into a core type
pub(crate) fn from_js<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::from_reason(format!("Invalid {what}: {e}")))
}

/// Serialize a core type for JS
pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| Error::from_reason(e.to_string()))
}
