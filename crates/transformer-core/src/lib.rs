//! Core library for the transformer rule editor.
//!
//! - [`editor::TransformerEditor`]: working copy of a record, section edits and script runs
//! - [`tag_input::TagInput`]: text input committing on blur
//! - [`script::Script`]: restricted diagnostic scripts on top of JMESPath
//! - [`diagnostics`]: console and message sinks for script output
//! - [`panels::PanelMemory`]: persisted set of expanded sections

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod editor;
pub mod expression;
pub mod panels;
pub mod script;
pub mod storage;
pub mod tag_input;
pub mod types;
pub mod validator;

pub use editor::TransformerEditor;
pub use types::record::{Headers, Patch, Record};
pub use types::section::Section;
