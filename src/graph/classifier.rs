//! Change classification - from raw changed paths to a change scope
//!
//! Decides whether a change set resolves to a concrete set of modules or
//! forces the fail-open "everything is affected" result. Fail-open is the
//! safety valve of the whole tool: an unknown diff state must never
//! silently skip tests.

use crate::graph::dependency_graph::DependencyGraph;
use std::collections::BTreeSet;

/// Classified change scope for one detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedChange {
  /// Change scope is unknown or touches shared infrastructure; every module
  /// must be treated as affected.
  Everything { reason: String },

  /// Changed paths resolved to this set of directly-changed modules.
  Modules(BTreeSet<String>),
}

/// Classify a change set against the dependency graph.
///
/// `changed_files` is `None` when no reference commit was found. Fail-open
/// triggers on:
/// - no reference commit (`None`)
/// - an empty diff ("nothing changed" and "don't know what changed" are
///   deliberately not distinguished)
/// - a path outside every module directory, unless `ignore_unknown` is set,
///   in which case such paths are dropped from the changed set
pub fn classify(graph: &DependencyGraph, changed_files: Option<&[String]>, ignore_unknown: bool) -> ClassifiedChange {
  let Some(changed_files) = changed_files else {
    log::info!("no reference commit found, affecting all {} modules", graph.len());
    return ClassifiedChange::Everything {
      reason: "no reference commit found".to_string(),
    };
  };

  if changed_files.is_empty() {
    log::info!("empty change list, affecting all {} modules", graph.len());
    return ClassifiedChange::Everything {
      reason: "empty change list".to_string(),
    };
  }

  let mut changed_modules = BTreeSet::new();
  for path in changed_files {
    match graph.module_for_path(path) {
      Some(module) => {
        changed_modules.insert(module.to_string());
      }
      None if ignore_unknown => {
        log::debug!("ignoring '{}': not inside any module directory", path);
      }
      None => {
        log::info!("'{}' maps to no module, affecting all {} modules", path, graph.len());
        return ClassifiedChange::Everything {
          reason: format!("'{}' is not inside any module directory", path),
        };
      }
    }
  }

  log::debug!("changed modules: {:?}", changed_modules);
  ClassifiedChange::Modules(changed_modules)
}
