//! NAPI bindings for the transformer editor.

use crate::types::{from_js, to_js, ResponseView, Section, ViewerProps};
use napi::bindgen_prelude::*;
use napi_derive::napi;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use transformer_core::diagnostics::{
    install_console_logging, sink_for, ChannelMessenger, Diagnostic, DiagnosticMode,
    DiagnosticSink, LogEnvelope,
};
use transformer_core::editor::TransformerEditor as CoreEditor;
use transformer_core::Record;

/// Outcome of a script run
#[napi(object)]
pub struct ScriptOutcome {
    pub ok: bool,
    pub value: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl From<Diagnostic> for ScriptOutcome {
    fn from(d: Diagnostic) -> Self {
        match d {
            Ok(value) => Self {
                ok: true,
                value: Some(value),
                error: None,
            },
            Err(e) => Self {
                ok: false,
                value: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Transformer editor class
#[napi]
pub struct TransformerEditor {
    inner: CoreEditor,
    sink: Box<dyn DiagnosticSink>,
    outbox: UnboundedReceiver<LogEnvelope>,
}

#[napi]
impl TransformerEditor {
    /// Create an editor for a record
    ///
    /// @param value - Record supplied by the owner, possibly partial
    /// @param diagnosticMode - "development" or "production" (default)
    #[napi(constructor)]
    pub fn new(value: serde_json::Value, diagnostic_mode: Option<String>) -> Result<Self> {
        let record: Record = from_js(value, "record")?;
        let mode: DiagnosticMode = match diagnostic_mode {
            Some(mode) => from_js(serde_json::Value::String(mode), "diagnostic mode")?,
            None => DiagnosticMode::default(),
        };
        if mode == DiagnosticMode::Development {
            install_console_logging();
        }
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            inner: CoreEditor::new(&record, None),
            sink: sink_for(mode, ChannelMessenger::new(tx)),
            outbox: rx,
        })
    }

    /// Working copy of the record
    #[napi]
    pub fn data(&self) -> Result<serde_json::Value> {
        to_js(self.inner.data())
    }

    /// Sync with the owner's record. Returns true when local state changed.
    #[napi]
    pub fn reconcile(&mut self, value: serde_json::Value) -> Result<bool> {
        let record: Record = from_js(value, "record")?;
        Ok(self.inner.reconcile(&record))
    }

    /// Apply a section edit, returning the full record for the owner
    #[napi]
    pub fn edit_section(
        &mut self,
        section: Section,
        value: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let record = self
            .inner
            .edit_section_value(section.into(), value)
            .map_err(|e| Error::from_reason(e.to_string()))?;
        to_js(record)
    }

    /// Keystroke in the code editor
    #[napi]
    pub fn stage_code(&mut self, code: String) {
        self.inner.stage_code(code);
    }

    /// Code editor blur, returning the full record for the owner
    #[napi]
    pub fn commit_code(&mut self) -> Result<serde_json::Value> {
        to_js(self.inner.commit_code())
    }

    #[napi]
    pub fn response_view(&self) -> ResponseView {
        self.inner.response_view().into()
    }

    #[napi]
    pub fn toggle_response_view(&mut self) -> ResponseView {
        self.inner.toggle_response_view().into()
    }

    #[napi]
    pub fn section_title(&self, section: Section) -> String {
        self.inner.section_title(section.into())
    }

    #[napi]
    pub fn copy_text(&self, section: Section) -> String {
        self.inner.copy_text(section.into())
    }

    #[napi]
    pub fn viewer_props(&self, section: Section) -> ViewerProps {
        self.inner.viewer_props(section.into()).into()
    }

    #[napi]
    pub fn can_run_script(&self) -> bool {
        self.inner.can_run_script()
    }

    #[napi]
    pub fn trigger_color(&self) -> String {
        self.inner.trigger_color().to_string()
    }

    /// Run the code section. Returns null when the script cannot run.
    #[napi]
    pub fn run_script(&self) -> Option<ScriptOutcome> {
        self.inner
            .run_script(self.sink.as_ref())
            .map(ScriptOutcome::from)
    }

    /// Drain log envelopes queued for the background context
    #[napi]
    pub fn take_messages(&mut self) -> Result<Vec<serde_json::Value>> {
        let mut messages = Vec::new();
        while let Ok(envelope) = self.outbox.try_recv() {
            messages.push(to_js(&envelope)?);
        }
        Ok(messages)
    }
}
