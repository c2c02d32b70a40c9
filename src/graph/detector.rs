//! Affected-module detector - the query surface for build orchestration
//!
//! Wires the version-control client, change classifier, and affected-set
//! computation into a single read accessor. The result is computed lazily
//! on first access and cached for the lifetime of the detector; the graph
//! itself is immutable, so a detector can be shared across threads.

use crate::core::error::RippleResult;
use crate::core::vcs::VcsClient;
use crate::graph::affected::{self, AffectedSet, ProjectSubset};
use crate::graph::classifier::{self, ClassifiedChange};
use crate::graph::dependency_graph::DependencyGraph;
use std::collections::BTreeSet;
use std::sync::RwLock;

/// Detector configuration.
#[derive(Debug, Clone)]
pub struct DetectorOptions {
  /// Which slice of the affected set `affected_modules` reports
  pub subset: ProjectSubset,

  /// Drop changed paths that map to no module instead of failing open
  pub ignore_unknown_modules: bool,

  /// Diff against this ref; `None` means the last merge commit
  pub base_ref: Option<String>,

  /// Top of the diff range
  pub head_ref: String,

  /// Include staged/unstaged working-tree changes
  pub include_uncommitted: bool,
}

impl Default for DetectorOptions {
  fn default() -> Self {
    Self {
      subset: ProjectSubset::All,
      ignore_unknown_modules: false,
      base_ref: None,
      head_ref: "HEAD".to_string(),
      include_uncommitted: false,
    }
  }
}

/// Everything one detection run produced, for reporting.
#[derive(Debug, Clone)]
pub struct AffectedReport {
  /// The reference commit the diff ran against, if one was found
  pub base_ref: Option<String>,

  /// Raw changed paths from version control
  pub changed_files: Vec<String>,

  /// Why the run failed open, if it did
  pub fail_open_reason: Option<String>,

  /// The computed sets
  pub set: AffectedSet,
}

/// Affected-module detector.
pub struct AffectedModuleDetector {
  graph: DependencyGraph,
  vcs: Box<dyn VcsClient>,
  options: DetectorOptions,

  /// Lazily computed on first access (thread-safe interior mutability).
  /// Errors are not cached; a failed query can be retried.
  cached: RwLock<Option<AffectedReport>>,
}

impl AffectedModuleDetector {
  pub fn new(graph: DependencyGraph, vcs: Box<dyn VcsClient>, options: DetectorOptions) -> Self {
    Self {
      graph,
      vcs,
      options,
      cached: RwLock::new(None),
    }
  }

  /// The affected modules for the configured subset.
  pub fn affected_modules(&self) -> RippleResult<BTreeSet<String>> {
    Ok(self.report()?.set.for_subset(self.options.subset).clone())
  }

  /// Full detection report (computed once, cached thereafter).
  pub fn report(&self) -> RippleResult<AffectedReport> {
    {
      let cache = self.cached.read().unwrap();
      if let Some(report) = cache.as_ref() {
        return Ok(report.clone());
      }
    }

    let report = self.compute()?;
    let mut cache = self.cached.write().unwrap();
    // A concurrent first access may have won the race; keep its result
    if cache.is_none() {
      *cache = Some(report.clone());
    }
    Ok(report)
  }

  fn compute(&self) -> RippleResult<AffectedReport> {
    let base_ref = match &self.options.base_ref {
      Some(base) => Some(base.clone()),
      None => self.vcs.find_previous_merge_commit()?,
    };

    let changed_files = match &base_ref {
      Some(base) => Some(self.vcs.find_changed_files_since(
        base,
        &self.options.head_ref,
        self.options.include_uncommitted,
      )?),
      None => None,
    };

    let classified = classifier::classify(&self.graph, changed_files.as_deref(), self.options.ignore_unknown_modules);
    let set = affected::compute(&self.graph, &classified)?;

    let fail_open_reason = match classified {
      ClassifiedChange::Everything { reason } => Some(reason),
      ClassifiedChange::Modules(_) => None,
    };

    log::info!(
      "affected: {} of {} modules ({} subset)",
      set.for_subset(self.options.subset).len(),
      self.graph.len(),
      self.options.subset.as_str()
    );

    Ok(AffectedReport {
      base_ref,
      changed_files: changed_files.unwrap_or_default(),
      fail_open_reason,
      set,
    })
  }
}
