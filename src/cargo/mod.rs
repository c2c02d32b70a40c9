//! Cargo workspace introspection (default module provider)

pub mod metadata;

pub use metadata::WorkspaceMetadata;
