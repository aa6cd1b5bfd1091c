//! Deliberation pipeline types
//!
//! Value objects produced by the three stages, plus the anonymized view
//! construction used by the review stage.

pub mod anonymize;
pub mod value_objects;
