//! Integration test entry point
//!
//! Compiled as a single test binary (see [[test]] in Cargo.toml) so helpers
//! can be shared without per-file duplication.

mod helpers;
mod test_affected;
