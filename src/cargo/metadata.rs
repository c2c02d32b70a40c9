//! Workspace introspection using cargo_metadata
//!
//! Maps a Cargo workspace onto the generic module model: every workspace
//! member becomes one module, its directory is the manifest's parent
//! relative to the workspace root, and dependency edges are kept only
//! between workspace members (external crates cannot be "changed" by a
//! diff of this repository).

use crate::core::error::{RippleError, RippleResult};
use crate::graph::ModuleDescriptor;
use cargo_metadata::MetadataCommand;
use std::collections::HashSet;
use std::path::Path;

#[derive(Clone)]
pub struct WorkspaceMetadata {
  metadata: cargo_metadata::Metadata,
}

impl WorkspaceMetadata {
  pub fn load(workspace_root: &Path) -> RippleResult<Self> {
    let metadata = MetadataCommand::new()
      .manifest_path(workspace_root.join("Cargo.toml"))
      .exec()?;
    Ok(Self { metadata })
  }

  pub fn workspace_root(&self) -> &Path {
    self.metadata.workspace_root.as_std_path()
  }

  /// Resolve workspace members into module descriptors.
  pub fn module_descriptors(&self) -> RippleResult<Vec<ModuleDescriptor>> {
    let packages = self.metadata.workspace_packages();
    let member_names: HashSet<String> = packages.iter().map(|pkg| pkg.name.as_ref().to_string()).collect();
    let root = self.workspace_root();

    let mut descriptors = Vec::with_capacity(packages.len());
    for pkg in packages {
      let name = pkg.name.as_ref().to_string();

      let manifest_dir = pkg
        .manifest_path
        .parent()
        .ok_or_else(|| RippleError::message(format!("Manifest path has no parent: {}", pkg.manifest_path)))?
        .as_std_path();
      // A root package gets an empty path and never owns changed files;
      // root-level changes stay fail-open
      let path = manifest_dir.strip_prefix(root)?.to_string_lossy().to_string();

      let mut dependencies: Vec<String> = pkg
        .dependencies
        .iter()
        .filter(|dep| dep.name != name && member_names.contains(dep.name.as_str()))
        .map(|dep| dep.name.clone())
        .collect();
      dependencies.sort();
      dependencies.dedup();

      descriptors.push(ModuleDescriptor { name, path, dependencies });
    }

    Ok(descriptors)
  }
}
