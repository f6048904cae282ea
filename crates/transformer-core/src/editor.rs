//! Transformer editor state.
//!
//! The editor keeps a working copy of the owner's record, merges
//! section-level edits back into the whole and reports every change to the
//! owner as a complete record. It can also run the record's diagnostic
//! script against the current response.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::script::{Script, ScriptError};
use crate::types::record::{Patch, Record};
use crate::types::section::{title_with_count, Section};
use crate::validator::{ValidationIssue, ValidatorKind};
use serde::Serialize;
use serde_json::Value;

/// Owner callback, always receives a complete record.
pub type RecordChange = Box<dyn FnMut(&Record)>;

/// Trigger icon color when the script can run
pub const ENABLED_COLOR: &str = "#1890ff";
/// Trigger icon color otherwise
pub const DISABLED_COLOR: &str = "gray";

const VIEWER_MIN_ROWS: u32 = 6;
const VIEWER_MAX_ROWS: u32 = 15;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("invalid {} value: {issues:?}", .section.title())]
    Invalid {
        section: Section,
        issues: Vec<ValidationIssue>,
    },
    #[error("value does not fit the {} section: {source}", .section.title())]
    Shape {
        section: Section,
        source: serde_json::Error,
    },
}

/// How the response section is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseView {
    /// Structured field viewer with a bounded row count
    #[default]
    Fields,
    /// Raw structured-text editor
    Raw,
}

/// Widget a section body is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    RecordViewer,
    JsonEditor,
    TextArea,
}

/// Properties handed to the widget rendering a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerProps {
    pub widget: Widget,
    pub value: Value,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
    pub validator: ValidatorKind,
}

pub struct TransformerEditor {
    data: Record,
    response_view: ResponseView,
    on_change: Option<RecordChange>,
}

impl TransformerEditor {
    pub fn new(value: &Record, on_change: Option<RecordChange>) -> Self {
        Self {
            data: Record::normalized(value),
            response_view: ResponseView::default(),
            on_change,
        }
    }

    /// Working copy
    pub fn data(&self) -> &Record {
        &self.data
    }

    /// Sync with a record supplied by the owner.
    ///
    /// The working copy is replaced only when the normalized incoming record
    /// differs from it, so re-supplying the same value is a no-op. Returns
    /// whether the working copy changed. Never notifies the owner.
    pub fn reconcile(&mut self, incoming: &Record) -> bool {
        let normalized = Record::normalized(incoming);
        if normalized == self.data {
            return false;
        }
        tracing::debug!("reconciling editor state with owner record");
        self.data = normalized;
        true
    }

    /// Apply a section edit and report the whole record to the owner.
    pub fn edit(&mut self, patch: Patch) -> &Record {
        let section = patch.section();
        let data = std::mem::take(&mut self.data);
        self.data = data.apply_patch(patch);
        tracing::debug!(section = section.title(), "section edited");
        self.notify();
        &self.data
    }

    /// Apply a raw value reported by a section viewer after validating it.
    ///
    /// Invalid values leave the working copy untouched.
    pub fn edit_section_value(
        &mut self,
        section: Section,
        value: Value,
    ) -> Result<&Record, EditorError> {
        let issues = ValidatorKind::for_section(section).validate(&value);
        if !issues.is_empty() {
            return Err(EditorError::Invalid { section, issues });
        }
        let patch = Patch::from_value(section, value)
            .map_err(|source| EditorError::Shape { section, source })?;
        Ok(self.edit(patch))
    }

    /// Keystroke in the code editor. The owner is not notified.
    pub fn stage_code(&mut self, code: impl Into<String>) {
        self.data.code = Some(code.into());
    }

    /// Code editor lost focus: report the record with the staged code.
    pub fn commit_code(&mut self) -> &Record {
        self.notify();
        &self.data
    }

    pub fn response_view(&self) -> ResponseView {
        self.response_view
    }

    /// Switch the response rendering. Presentational only.
    pub fn toggle_response_view(&mut self) -> ResponseView {
        self.response_view = match self.response_view {
            ResponseView::Fields => ResponseView::Raw,
            ResponseView::Raw => ResponseView::Fields,
        };
        self.response_view
    }

    /// Panel header text, with an entry count for headers and body.
    pub fn section_title(&self, section: Section) -> String {
        if section.counts_entries() {
            title_with_count(section.title(), self.data.entry_count(section))
        } else {
            section.title().to_string()
        }
    }

    /// Section value as indented JSON for the clipboard.
    pub fn copy_text(&self, section: Section) -> String {
        serde_json::to_string_pretty(&self.data.section_value(section)).unwrap_or_default()
    }

    pub fn viewer_props(&self, section: Section) -> ViewerProps {
        let value = self.data.section_value(section);
        let validator = ValidatorKind::for_section(section);
        let (widget, readonly, rows) = match section {
            Section::General => (Widget::RecordViewer, false, true),
            Section::RequestHeaders | Section::ResponseHeaders | Section::Body => {
                (Widget::RecordViewer, true, false)
            }
            Section::Response => match self.response_view {
                ResponseView::Fields => (Widget::RecordViewer, false, true),
                ResponseView::Raw => (Widget::JsonEditor, false, false),
            },
            Section::Code => (Widget::TextArea, false, false),
        };
        ViewerProps {
            widget,
            value,
            readonly,
            min_rows: rows.then_some(VIEWER_MIN_ROWS),
            max_rows: rows.then_some(VIEWER_MAX_ROWS),
            validator,
        }
    }

    /// Script can run: non-empty code and a non-null response.
    pub fn can_run_script(&self) -> bool {
        let has_response = !matches!(self.data.response, None | Some(Value::Null));
        !self.data.code().is_empty() && has_response
    }

    pub fn trigger_color(&self) -> &'static str {
        if self.can_run_script() {
            ENABLED_COLOR
        } else {
            DISABLED_COLOR
        }
    }

    /// Run the code section against the response and deliver the outcome
    /// to `sink`. Returns `None` without emitting when the script cannot run.
    pub fn run_script(&self, sink: &dyn DiagnosticSink) -> Option<Diagnostic> {
        if !self.can_run_script() {
            return None;
        }
        let outcome = self.evaluate_script();
        sink.emit(&outcome);
        Some(outcome)
    }

    fn evaluate_script(&self) -> Diagnostic {
        let script = Script::parse(self.data.code())?;
        let response = self.data.response.clone().unwrap_or(Value::Null);
        let record =
            serde_json::to_value(&self.data).map_err(|e| ScriptError::Input(e.to_string()))?;
        script.run(response, record)
    }

    fn notify(&mut self) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::general::{General, HttpMethod};
    use crate::types::record::Headers;
    use rstest::rstest;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Emitted = Rc<RefCell<Vec<Record>>>;

    #[derive(Default)]
    struct RecordingSink {
        received: RefCell<Vec<Diagnostic>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn emit(&self, diagnostic: &Diagnostic) {
            self.received.borrow_mut().push(diagnostic.clone());
        }
    }

    fn h(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| ((*k).into(), (*v).into()))
            .collect()
    }

    fn record(value: Value) -> Record {
        serde_json::from_value(value).expect("Should deserialize")
    }

    fn recording_editor(value: &Record) -> (TransformerEditor, Emitted) {
        let emitted: Emitted = Rc::default();
        let sink = emitted.clone();
        let editor = TransformerEditor::new(
            value,
            Some(Box::new(move |record: &Record| {
                sink.borrow_mut().push(record.clone())
            })),
        );
        (editor, emitted)
    }

    fn editor_with(code: &str, response: Value) -> TransformerEditor {
        TransformerEditor::new(
            &record(json!({"code": code, "response": response})),
            None,
        )
    }

    #[rstest]
    fn test_new_normalizes_sparse_record() {
        let (editor, emitted) = recording_editor(&record(json!({"body": {"a": 1}})));
        assert!(editor.data().is_complete());
        assert_eq!(editor.data().body, Some(json!({"a": 1})));
        assert!(emitted.borrow().is_empty());
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"body": {"a": 1}}))]
    #[case(json!({"general": {"url": "/x"}, "code": "@"}))]
    #[case(json!({"response": null, "requestHeaders": {"a": "1"}}))]
    fn test_reconcile_is_idempotent(#[case] incoming: Value) {
        let (mut editor, emitted) = recording_editor(&Record::default());
        let incoming = record(incoming);

        editor.reconcile(&incoming);
        let after_first = editor.data().clone();
        assert!(!editor.reconcile(&incoming));
        assert_eq!(editor.data(), &after_first);
        assert!(after_first.is_complete());
        assert!(emitted.borrow().is_empty());
    }

    #[rstest]
    fn test_reconcile_replaces_on_change() {
        let (mut editor, _) = recording_editor(&record(json!({"code": "@"})));
        assert!(editor.reconcile(&record(json!({"body": [1]}))));
        assert_eq!(editor.data().body, Some(json!([1])));
        assert_eq!(editor.data().code.as_deref(), Some(""));
    }

    #[rstest]
    fn test_reconcile_with_normalized_copy_is_noop() {
        let (mut editor, _) = recording_editor(&record(json!({"body": {"a": 1}})));
        let same = editor.data().clone();
        assert!(!editor.reconcile(&same));
    }

    #[rstest]
    fn test_edit_emits_full_record() {
        let initial = record(json!({
            "general": {"url": "/api", "method": "get"},
            "response": [1, 2],
            "body": {"q": "x"},
            "requestHeaders": {"Accept": "*/*"},
            "code": "length(@)"
        }));
        let (mut editor, emitted) = recording_editor(&initial);
        let before = editor.data().clone();

        editor.edit(Patch::ResponseHeaders(h(&[("x", "1")])));

        let emitted = emitted.borrow();
        assert_eq!(emitted.len(), 1);
        let sent = &emitted[0];
        assert!(sent.is_complete());
        assert_eq!(sent.response_headers, Some(h(&[("x", "1")])));
        assert_eq!(sent.general, before.general);
        assert_eq!(sent.response, before.response);
        assert_eq!(sent.body, before.body);
        assert_eq!(sent.request_headers, before.request_headers);
        assert_eq!(sent.code, before.code);
        assert_eq!(editor.data(), sent);
    }

    #[rstest]
    fn test_edit_request_headers_updates_request_headers() {
        let (mut editor, emitted) = recording_editor(&Record::default());
        editor.edit(Patch::RequestHeaders(h(&[("a", "1"), ("b", "2")])));
        assert_eq!(
            emitted.borrow()[0].request_headers,
            Some(h(&[("a", "1"), ("b", "2")]))
        );
        assert_eq!(editor.section_title(Section::RequestHeaders), "request header (2)");
    }

    #[rstest]
    fn test_edit_general() {
        let (mut editor, emitted) = recording_editor(&Record::default());
        editor.edit(Patch::General(General {
            url: Some("/users".to_string()),
            method: Some(HttpMethod::Post),
            ..Default::default()
        }));
        let emitted = emitted.borrow();
        let sent = &emitted[0];
        assert_eq!(
            sent.general.as_ref().and_then(|g| g.method),
            Some(HttpMethod::Post)
        );
    }

    #[rstest]
    fn test_edit_section_value_valid() {
        let (mut editor, emitted) = recording_editor(&Record::default());
        editor
            .edit_section_value(Section::ResponseHeaders, json!({"x": "1"}))
            .expect("Should apply");
        assert_eq!(emitted.borrow()[0].response_headers, Some(h(&[("x", "1")])));
    }

    #[rstest]
    #[case(Section::General, json!({"method": "PATCH"}))]
    #[case(Section::RequestHeaders, json!({"x": 1}))]
    #[case(Section::Code, json!(1))]
    fn test_edit_section_value_invalid(#[case] section: Section, #[case] value: Value) {
        let (mut editor, emitted) = recording_editor(&Record::default());
        let before = editor.data().clone();

        let result = editor.edit_section_value(section, value);

        assert!(matches!(result, Err(EditorError::Invalid { .. })));
        assert_eq!(editor.data(), &before);
        assert!(emitted.borrow().is_empty());
    }

    #[rstest]
    fn test_code_commits_on_blur_only() {
        let (mut editor, emitted) = recording_editor(&Record::default());

        editor.stage_code("e");
        editor.stage_code("e =>");
        editor.stage_code("e => length(e)");
        assert!(emitted.borrow().is_empty());

        editor.commit_code();
        let emitted = emitted.borrow();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].code.as_deref(), Some("e => length(e)"));
    }

    #[rstest]
    fn test_toggle_response_view_does_not_emit() {
        let (mut editor, emitted) = recording_editor(&record(json!({"response": {"a": 1}})));
        let before = editor.data().clone();

        assert_eq!(editor.response_view(), ResponseView::Fields);
        assert_eq!(editor.toggle_response_view(), ResponseView::Raw);
        assert_eq!(editor.viewer_props(Section::Response).widget, Widget::JsonEditor);
        assert_eq!(editor.toggle_response_view(), ResponseView::Fields);

        assert_eq!(editor.data(), &before);
        assert!(emitted.borrow().is_empty());
    }

    #[rstest]
    #[case(Section::RequestHeaders, json!({}), "request header")]
    #[case(Section::RequestHeaders, json!({"requestHeaders": {"a": "1", "b": "2"}}), "request header (2)")]
    #[case(Section::ResponseHeaders, json!({"responseHeaders": {"a": "1"}}), "response header (1)")]
    #[case(Section::Body, json!({"body": {"a": 1, "b": 2, "c": 3}}), "body (3)")]
    #[case(Section::Response, json!({"response": {"a": 1}}), "response")]
    #[case(Section::General, json!({}), "general")]
    #[case(Section::Code, json!({"code": "@"}), "code")]
    fn test_section_title(#[case] section: Section, #[case] value: Value, #[case] expected: &str) {
        let editor = TransformerEditor::new(&record(value), None);
        assert_eq!(editor.section_title(section), expected);
    }

    #[rstest]
    fn test_copy_text_is_indented() {
        let editor = TransformerEditor::new(&record(json!({"body": {"a": 1}})), None);
        assert_eq!(editor.copy_text(Section::Body), "{\n  \"a\": 1\n}");
        assert_eq!(editor.copy_text(Section::Code), "\"\"");
    }

    #[rstest]
    fn test_viewer_props() {
        let editor = TransformerEditor::new(&Record::default(), None);

        let general = editor.viewer_props(Section::General);
        assert_eq!(general.widget, Widget::RecordViewer);
        assert!(!general.readonly);
        assert_eq!((general.min_rows, general.max_rows), (Some(6), Some(15)));
        assert_eq!(general.validator, ValidatorKind::General);

        let headers = editor.viewer_props(Section::RequestHeaders);
        assert!(headers.readonly);
        assert_eq!(headers.min_rows, None);
        assert_eq!(headers.validator, ValidatorKind::Headers);

        let body = editor.viewer_props(Section::Body);
        assert!(body.readonly);
        assert_eq!(body.value, json!({}));

        let code = editor.viewer_props(Section::Code);
        assert_eq!(code.widget, Widget::TextArea);
        assert_eq!(code.value, json!(""));
    }

    #[rstest]
    #[case("", json!([1, 2, 3]))]
    #[case("e => length(e)", json!(null))]
    fn test_run_script_guard(#[case] code: &str, #[case] response: Value) {
        let editor = editor_with(code, response);
        let sink = RecordingSink::default();

        assert!(!editor.can_run_script());
        assert_eq!(editor.trigger_color(), DISABLED_COLOR);
        assert!(editor.run_script(&sink).is_none());
        assert!(sink.received.borrow().is_empty());
    }

    #[rstest]
    fn test_run_script_emits_value() {
        let editor = editor_with("e => length(e)", json!([1, 2, 3]));
        let sink = RecordingSink::default();

        assert_eq!(editor.trigger_color(), ENABLED_COLOR);
        let outcome = editor.run_script(&sink);

        assert_eq!(outcome, Some(Ok(json!(3))));
        assert_eq!(*sink.received.borrow(), vec![Ok(json!(3))]);
    }

    #[rstest]
    fn test_run_script_member_length() {
        let editor = editor_with("e => e.length", json!([1, 2, 3]));
        let sink = RecordingSink::default();

        assert_eq!(editor.run_script(&sink), Some(Ok(json!(3))));
        assert_eq!(*sink.received.borrow(), vec![Ok(json!(3))]);
    }

    #[rstest]
    fn test_run_script_undefined_name_is_emitted() {
        let editor = editor_with("e => undefinedVar", json!([1, 2, 3]));
        let sink = RecordingSink::default();

        let expected = Err(ScriptError::UndefinedName("undefinedVar".to_string()));
        assert_eq!(editor.run_script(&sink), Some(expected.clone()));
        assert_eq!(*sink.received.borrow(), vec![expected]);
    }

    #[rstest]
    fn test_run_script_sees_record_copy() {
        let editor = TransformerEditor::new(
            &record(json!({
                "general": {"url": "/api/users"},
                "response": {"users": []},
                "code": "(res, rec) => rec.general.url"
            })),
            None,
        );
        let sink = RecordingSink::default();
        assert_eq!(editor.run_script(&sink), Some(Ok(json!("/api/users"))));
    }

    #[rstest]
    #[case("e => e.map(el => el.id)")]
    #[case("e => abs(e)")]
    #[case("e => undefinedVar")]
    #[case("(a, b, c) => a")]
    fn test_run_script_failure_is_emitted_not_raised(#[case] code: &str) {
        let (mut editor, emitted) = recording_editor(&record(json!({"response": [1, 2, 3]})));
        editor.stage_code(code);
        let sink = RecordingSink::default();

        let outcome = editor.run_script(&sink).expect("Script should run");

        assert!(outcome.is_err());
        assert_eq!(sink.received.borrow().len(), 1);
        assert!(sink.received.borrow()[0].is_err());

        editor.edit(Patch::Body(json!({"still": "editable"})));
        assert_eq!(emitted.borrow().len(), 1);
    }

    #[rstest]
    fn test_run_script_leaves_state_untouched() {
        let editor = editor_with("e => e[*].id", json!([{"id": 1}]));
        let before = editor.data().clone();
        editor.run_script(&RecordingSink::default());
        assert_eq!(editor.data(), &before);
    }
}
