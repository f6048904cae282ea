//! NAPI bindings for expanded-panel memory.

use crate::types::Section;
use napi::bindgen_prelude::*;
use napi_derive::napi;
use std::sync::Arc;
use tokio::sync::Mutex;
use transformer_core::panels::PanelMemory as CorePanelMemory;
use transformer_core::storage::{FileStorage, StorageError};
use transformer_core::Section as CoreSection;

fn storage_error(e: StorageError) -> Error {
    Error::from_reason(format!("Storage error: {e}"))
}

fn to_sections(sections: &[CoreSection]) -> Vec<Section> {
    sections.iter().copied().map(Section::from).collect()
}

/// Expanded sections persisted to a JSON file
#[napi]
pub struct PanelMemory {
    inner: Arc<Mutex<CorePanelMemory<FileStorage>>>,
}

#[napi]
impl PanelMemory {
    /// @param storagePath - JSON file holding UI state
    #[napi(constructor)]
    pub fn new(storage_path: String) -> Self {
        let storage = Arc::new(FileStorage::new(storage_path));
        Self {
            inner: Arc::new(Mutex::new(CorePanelMemory::new(storage))),
        }
    }

    /// Rehydrate the expanded sections. Only the first call reads storage.
    #[napi]
    pub async fn load(&self) -> Result<Vec<Section>> {
        let mut panels = self.inner.lock().await;
        let active = panels.load().await.map_err(storage_error)?;
        Ok(to_sections(active))
    }

    #[napi]
    pub async fn set(&self, sections: Vec<Section>) -> Result<Vec<Section>> {
        let sections: Vec<CoreSection> = sections.into_iter().map(CoreSection::from).collect();
        let mut panels = self.inner.lock().await;
        panels.set(&sections).await.map_err(storage_error)?;
        Ok(to_sections(panels.active()))
    }

    #[napi]
    pub async fn toggle(&self, section: Section) -> Result<Vec<Section>> {
        let mut panels = self.inner.lock().await;
        panels.toggle(section.into()).await.map_err(storage_error)?;
        Ok(to_sections(panels.active()))
    }
}
