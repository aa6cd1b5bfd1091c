//! Use cases - the deliberation pipeline

pub mod run_council;
pub mod transport;
