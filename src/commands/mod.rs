//! Command implementations

pub mod affected;

pub use affected::{AffectedArgs, run_affected};
