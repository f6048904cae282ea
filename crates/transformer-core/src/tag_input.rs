//! Single-line text input that commits on blur or pointer leave.

/// Commit callback, receives the staged text.
pub type TagChange = Box<dyn FnMut(Option<&str>)>;

/// Controlled text input.
///
/// Keystrokes only update the staged text; the owner hears about it when
/// focus is lost or the pointer leaves the control. A new external value
/// replaces the staged text only when the two differ.
pub struct TagInput {
    value: Option<String>,
    staged: Option<String>,
    on_change: Option<TagChange>,
}

impl TagInput {
    pub fn new(value: Option<String>, on_change: Option<TagChange>) -> Self {
        Self {
            staged: value.clone(),
            value,
            on_change,
        }
    }

    /// Text currently shown in the control
    pub fn staged(&self) -> Option<&str> {
        self.staged.as_deref()
    }

    /// Last value supplied by the owner
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Receive a value from the owner. Returns true when the staged text
    /// was overwritten.
    pub fn set_value(&mut self, value: Option<String>) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        if self.staged == self.value {
            return false;
        }
        self.staged = self.value.clone();
        true
    }

    /// Keystroke
    pub fn input(&mut self, text: impl Into<String>) {
        self.staged = Some(text.into());
    }

    pub fn blur(&mut self) {
        self.commit();
    }

    pub fn pointer_leave(&mut self) {
        self.commit();
    }

    fn commit(&mut self) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(self.staged.as_deref());
        }
    }
}
