//! Affected set computation
//!
//! Given a classified change scope, expand it over the dependency graph:
//! - Which modules directly contain changed files
//! - Which modules transitively depend on the changed modules
//! - The union, i.e. everything a CI pipeline needs to rebuild/retest
//!
//! Fail-open classifications override subset filtering: when the change
//! scope is unknown, all three subsets are the full module set.

use crate::core::error::{RippleError, RippleResult};
use crate::graph::classifier::ClassifiedChange;
use crate::graph::dependency_graph::DependencyGraph;
use std::collections::BTreeSet;

/// Which slice of the affected set a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSubset {
  /// Directly-changed modules only
  Changed,
  /// Transitive dependents of changed modules, excluding the changed set
  Dependent,
  /// Union of changed and dependents
  All,
}

impl ProjectSubset {
  pub fn from_str(s: &str) -> RippleResult<Self> {
    match s.to_lowercase().as_str() {
      "changed" => Ok(Self::Changed),
      "dependent" | "dependents" => Ok(Self::Dependent),
      "all" => Ok(Self::All),
      _ => Err(RippleError::message(format!(
        "Unknown subset '{}'. Valid subsets: changed, dependent, all",
        s
      ))),
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Changed => "changed",
      Self::Dependent => "dependent",
      Self::All => "all",
    }
  }
}

/// Affected modules, split by why they qualify.
///
/// `BTreeSet` keeps iteration deterministic for identical inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedSet {
  /// Modules directly containing changed files
  pub changed: BTreeSet<String>,

  /// Transitive dependents of changed modules (never includes a module that
  /// was itself directly changed)
  pub dependents: BTreeSet<String>,

  /// Union: everything that needs rebuilding
  pub all_affected: BTreeSet<String>,
}

impl AffectedSet {
  /// The set for a given subset mode.
  pub fn for_subset(&self, subset: ProjectSubset) -> &BTreeSet<String> {
    match subset {
      ProjectSubset::Changed => &self.changed,
      ProjectSubset::Dependent => &self.dependents,
      ProjectSubset::All => &self.all_affected,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.all_affected.is_empty()
  }
}

/// Expand a classified change over the graph.
///
/// Fail-open (`Everything`) returns the full module set for all three
/// subsets; otherwise dependents are the union of each changed module's
/// transitive dependents, minus the changed set itself.
pub fn compute(graph: &DependencyGraph, change: &ClassifiedChange) -> RippleResult<AffectedSet> {
  match change {
    ClassifiedChange::Everything { .. } => {
      let everything = graph.module_names();
      Ok(AffectedSet {
        changed: everything.clone(),
        dependents: everything.clone(),
        all_affected: everything,
      })
    }
    ClassifiedChange::Modules(changed) => {
      let mut dependents = BTreeSet::new();
      for module in changed {
        dependents.extend(graph.transitive_dependents(module)?);
      }
      // A directly-changed module counts once, under `all_affected`
      for module in changed {
        dependents.remove(module);
      }

      let mut all_affected = changed.clone();
      all_affected.extend(dependents.iter().cloned());

      Ok(AffectedSet {
        changed: changed.clone(),
        dependents,
        all_affected,
      })
    }
  }
}
