//! NAPI-RS bindings for the transformer rule editor.
//!
//! Exposes the Rust core to the extension UI. Owner callbacks are modelled
//! as return values: mutating methods return the record the owner must
//! receive.

use napi_derive::napi;

mod config;
mod editor;
mod panels;
mod tag_input;
mod types;

pub use config::*;
pub use editor::*;
pub use panels::*;
pub use tag_input::*;
pub use types::*;

/// Library version
#[napi]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
