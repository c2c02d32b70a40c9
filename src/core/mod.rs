//! Core building blocks shared by all ripple operations
//!
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: version-control abstraction (VcsClient trait + SystemGit)

pub mod error;
pub mod vcs;
