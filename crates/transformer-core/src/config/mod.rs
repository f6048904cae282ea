//! Editor configuration and rule file loading.

pub mod editor;
pub mod error;
pub mod parser;
