//! Core domain types for transformer records, sections and rules.

pub mod general;
pub mod record;
pub mod rule;
pub mod section;
