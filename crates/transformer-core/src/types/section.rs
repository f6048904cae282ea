//! Collapsible sections of the transformer editor.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One editable facet of a record.
///
/// Each section is rendered as a collapsible panel identified by a stable
/// string id (`"1"` to `"6"`), which is what the panel memory persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    General,
    RequestHeaders,
    ResponseHeaders,
    Body,
    Response,
    Code,
}

impl Section {
    /// All sections in display order.
    pub const ALL: [Section; 6] = [
        Section::General,
        Section::RequestHeaders,
        Section::ResponseHeaders,
        Section::Body,
        Section::Response,
        Section::Code,
    ];

    /// Panel id
    pub fn id(self) -> &'static str {
        match self {
            Section::General => "1",
            Section::RequestHeaders => "2",
            Section::ResponseHeaders => "3",
            Section::Body => "4",
            Section::Response => "5",
            Section::Code => "6",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.id() == id)
    }

    /// Bare panel title
    pub fn title(self) -> &'static str {
        match self {
            Section::General => "general",
            Section::RequestHeaders => "request header",
            Section::ResponseHeaders => "response header",
            Section::Body => "body",
            Section::Response => "response",
            Section::Code => "code",
        }
    }

    /// Whether the panel header shows an entry count.
    pub fn counts_entries(self) -> bool {
        matches!(
            self,
            Section::RequestHeaders | Section::ResponseHeaders | Section::Body
        )
    }
}

/// Format a panel title with its entry count, `"title (N)"` when N > 0.
pub fn title_with_count(title: &str, count: usize) -> String {
    if count > 0 {
        format!("{} ({})", title, count)
    } else {
        title.to_string()
    }
}

impl Serialize for Section {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.id().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = String::deserialize(deserializer)?;
        Section::from_id(&id)
            .ok_or_else(|| serde::de::Error::custom(format!("Unknown section id: {}", id)))
    }
}
