//! Module dependency graph built from resolved descriptors + petgraph
//!
//! The graph is built once per detection run from a flat list of
//! [`ModuleDescriptor`]s and is immutable afterwards. Providers (cargo
//! metadata, descriptor files) normalize their raw dependency declarations
//! into descriptors before this module ever sees them, so construction can
//! reject dangling edges outright.
//!
//! ## Graph Structure
//!
//! - **Directed Graph**: `A → B` means "A depends on B"
//! - **Nodes**: Modules (name + directory relative to the project root)
//! - **Edges**: Resolved dependency relationships
//! - **Queries**: path → owning module, direct deps, transitive dependents

use crate::core::error::{ProjectError, RippleError, RippleResult};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

/// One module as reported by a project metadata provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
  /// Unique module name
  pub name: String,

  /// Directory relative to the project root (either separator accepted)
  pub path: String,

  /// Names of modules this module depends on
  #[serde(default)]
  pub dependencies: Vec<String>,
}

/// A module node in the dependency graph.
#[derive(Debug, Clone)]
struct ModuleNode {
  name: String,

  /// Directory split into normalized components; empty for a root module
  dir: Vec<String>,
}

/// Project dependency graph.
///
/// Read-only after construction; safe to share across threads.
pub struct DependencyGraph {
  /// Nodes: modules, Edges: "depends on"
  graph: DiGraph<ModuleNode, ()>,

  /// Index: module name → node index
  name_to_node: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
  /// Build the graph from resolved descriptors.
  ///
  /// Rejects duplicate module names and dependency edges that name a module
  /// not present in the descriptor set.
  pub fn from_descriptors(descriptors: &[ModuleDescriptor]) -> RippleResult<Self> {
    let mut graph = DiGraph::new();
    let mut name_to_node = HashMap::new();

    for desc in descriptors {
      let node = ModuleNode {
        name: desc.name.clone(),
        dir: path_components(&desc.path),
      };
      let node_idx = graph.add_node(node);
      if name_to_node.insert(desc.name.clone(), node_idx).is_some() {
        return Err(RippleError::Project(ProjectError::DuplicateModule {
          name: desc.name.clone(),
        }));
      }
    }

    for desc in descriptors {
      let from_idx = name_to_node[&desc.name];
      for dep in &desc.dependencies {
        let to_idx = name_to_node
          .get(dep)
          .copied()
          .ok_or_else(|| RippleError::Project(ProjectError::UnknownDependency {
            module: desc.name.clone(),
            dependency: dep.clone(),
          }))?;
        graph.add_edge(from_idx, to_idx, ());
      }
    }

    Ok(Self { graph, name_to_node })
  }

  /// Load descriptors from a JSON file and build the graph.
  pub fn from_descriptor_file(path: &Path) -> RippleResult<Self> {
    let descriptors = load_descriptors(path)?;
    Self::from_descriptors(&descriptors)
  }

  /// Number of modules in the graph.
  pub fn len(&self) -> usize {
    self.name_to_node.len()
  }

  pub fn is_empty(&self) -> bool {
    self.name_to_node.is_empty()
  }

  /// All module names.
  pub fn module_names(&self) -> BTreeSet<String> {
    self.name_to_node.keys().cloned().collect()
  }

  /// Map a changed path to its owning module, if any.
  ///
  /// Longest-prefix match against module directories, so a file in a nested
  /// module resolves to the innermost module. Root modules (empty directory)
  /// never match; a root-level file is deliberately unowned.
  pub fn module_for_path(&self, changed_path: &str) -> Option<&str> {
    let components = path_components(changed_path);

    let mut best: Option<&ModuleNode> = None;
    for idx in self.graph.node_indices() {
      let node = &self.graph[idx];
      if node.dir.is_empty() || node.dir.len() >= components.len() {
        continue;
      }
      if components.starts_with(&node.dir) && best.is_none_or(|b| node.dir.len() > b.dir.len()) {
        best = Some(node);
      }
    }

    best.map(|node| node.name.as_str())
  }

  /// Get direct dependencies of a module (what it uses).
  ///
  /// TODO: surface via a future `--explain <module>` flag showing why a
  /// module was selected
  #[allow(dead_code)]
  pub fn direct_dependencies(&self, module: &str) -> RippleResult<Vec<String>> {
    let node_idx = self.find_node(module)?;

    let mut deps: Vec<String> = self
      .graph
      .neighbors_directed(node_idx, Direction::Outgoing)
      .map(|idx| self.graph[idx].name.clone())
      .collect();

    deps.sort();
    deps.dedup();
    Ok(deps)
  }

  /// Get transitive dependents (all modules that depend on this one).
  ///
  /// DFS over incoming edges with a visited set, so cyclic graphs terminate
  /// and still yield complete results. The start module is not reported as
  /// its own dependent.
  ///
  /// # Performance
  /// O(V + E); bounded by the project size, typically <10ms.
  pub fn transitive_dependents(&self, module: &str) -> RippleResult<BTreeSet<String>> {
    let start_node = self.find_node(module)?;

    let mut visited = HashSet::new();
    let mut stack = vec![start_node];
    let mut dependents = BTreeSet::new();

    while let Some(node_idx) = stack.pop() {
      if !visited.insert(node_idx) {
        continue;
      }

      for neighbor_idx in self.graph.neighbors_directed(node_idx, Direction::Incoming) {
        if neighbor_idx != start_node {
          dependents.insert(self.graph[neighbor_idx].name.clone());
        }
        stack.push(neighbor_idx);
      }
    }

    Ok(dependents)
  }

  /// Find node index by module name.
  fn find_node(&self, module: &str) -> RippleResult<NodeIndex> {
    self
      .name_to_node
      .get(module)
      .copied()
      .ok_or_else(|| RippleError::Project(ProjectError::ModuleNotFound { name: module.to_string() }))
  }
}

/// Load module descriptors from a JSON file.
pub fn load_descriptors(path: &Path) -> RippleResult<Vec<ModuleDescriptor>> {
  if !path.exists() {
    return Err(RippleError::Project(ProjectError::DescriptorsNotFound {
      path: path.to_path_buf(),
    }));
  }
  let data = std::fs::read_to_string(path)?;
  let descriptors: Vec<ModuleDescriptor> = serde_json::from_str(&data)?;
  Ok(descriptors)
}

/// Split a path into normalized components.
///
/// Accepts both `/` and `\` so changed paths from git (always `/`) and
/// descriptor paths written on Windows compare consistently.
fn path_components(path: &str) -> Vec<String> {
  path
    .split(['/', '\\'])
    .filter(|c| !c.is_empty() && *c != ".")
    .map(str::to_string)
    .collect()
}
