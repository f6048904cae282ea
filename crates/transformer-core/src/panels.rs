//! Expanded-panel memory.
//!
//! The set of expanded sections survives across editor mounts through a
//! [`Storage`] backend under [`ACTIVE_KEY_STORAGE_KEY`].

use crate::constants::ACTIVE_KEY_STORAGE_KEY;
use crate::storage::{Storage, StorageError};
use crate::types::section::Section;
use serde_json::Value;
use std::sync::Arc;

/// Ordered, duplicate-free set of expanded sections.
pub struct PanelMemory<S: ?Sized> {
    storage: Arc<S>,
    active: Vec<Section>,
    loaded: bool,
}

impl<S: Storage + ?Sized> PanelMemory<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            active: Vec::new(),
            loaded: false,
        }
    }

    /// Expanded sections in the order they were opened.
    pub fn active(&self) -> &[Section] {
        &self.active
    }

    pub fn is_expanded(&self, section: Section) -> bool {
        self.active.contains(&section)
    }

    /// Rehydrate from storage. Only the first call reads; unknown ids are
    /// ignored.
    pub async fn load(&mut self) -> Result<&[Section], StorageError> {
        if self.loaded {
            return Ok(&self.active);
        }
        let mut stored = self.storage.get(&[ACTIVE_KEY_STORAGE_KEY]).await?;
        self.loaded = true;
        if let Some(value) = stored.remove(ACTIVE_KEY_STORAGE_KEY) {
            self.active = parse_ids(&value);
        }
        tracing::debug!(active = ?self.active, "loaded expanded panels");
        Ok(&self.active)
    }

    /// Replace the expanded set. Storage is written only when it changes.
    pub async fn set(&mut self, sections: &[Section]) -> Result<(), StorageError> {
        let mut next: Vec<Section> = Vec::with_capacity(sections.len());
        for section in sections {
            if !next.contains(section) {
                next.push(*section);
            }
        }
        if next == self.active {
            return Ok(());
        }
        self.active = next;
        self.persist().await
    }

    /// Expand a collapsed section or collapse an expanded one.
    pub async fn toggle(&mut self, section: Section) -> Result<(), StorageError> {
        let mut next = self.active.clone();
        match next.iter().position(|s| *s == section) {
            Some(index) => {
                next.remove(index);
            }
            None => next.push(section),
        }
        self.set(&next).await
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let ids = self
            .active
            .iter()
            .map(|section| Value::String(section.id().to_string()))
            .collect();
        self.storage
            .set(ACTIVE_KEY_STORAGE_KEY, Value::Array(ids))
            .await
    }
}

fn parse_ids(value: &Value) -> Vec<Section> {
    let mut sections = Vec::new();
    for id in value.as_array().into_iter().flatten() {
        match id.as_str().and_then(Section::from_id) {
            Some(section) if !sections.contains(&section) => sections.push(section),
            Some(_) => {}
            None => tracing::warn!(id = %id, "ignoring unknown panel id"),
        }
    }
    sections
}
