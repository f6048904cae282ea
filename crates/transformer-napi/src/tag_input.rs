//! NAPI bindings for the tag input.

use napi_derive::napi;
use transformer_core::tag_input::TagInput as CoreTagInput;

/// Text input committing on blur or pointer leave
#[napi]
pub struct TagInput {
    inner: CoreTagInput,
}

#[napi]
impl TagInput {
    #[napi(constructor)]
    pub fn new(value: Option<String>) -> Self {
        Self {
            inner: CoreTagInput::new(value, None),
        }
    }

    /// Text shown in the control
    #[napi(getter)]
    pub fn staged(&self) -> Option<String> {
        self.inner.staged().map(str::to_string)
    }

    /// Receive a value from the owner. Returns true when the staged text changed.
    #[napi]
    pub fn set_value(&mut self, value: Option<String>) -> bool {
        self.inner.set_value(value)
    }

    #[napi]
    pub fn input(&mut self, text: String) {
        self.inner.input(text);
    }

    /// Blur, returning the committed text
    #[napi]
    pub fn blur(&mut self) -> Option<String> {
        self.inner.blur();
        self.staged()
    }

    /// Pointer leave, returning the committed text
    #[napi]
    pub fn pointer_leave(&mut self) -> Option<String> {
        self.inner.pointer_leave();
        self.staged()
    }
}
