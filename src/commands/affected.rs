//! `ripple affected` - the one command: report which modules a change set affects
//!
//! Builds the dependency graph from the configured provider, runs the
//! detector against git, and prints the result in one of three formats.

use crate::cargo::WorkspaceMetadata;
use crate::core::error::{RippleError, RippleResult};
use crate::core::vcs::SystemGit;
use crate::graph::{AffectedModuleDetector, AffectedReport, DependencyGraph, DetectorOptions, ProjectSubset};
use std::path::{Path, PathBuf};

/// Output format for the affected report
#[derive(Debug, Clone, Copy)]
enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl OutputFormat {
  fn from_str(s: &str) -> RippleResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" => Ok(Self::NamesOnly),
      _ => Err(RippleError::message(format!(
        "Unknown format '{}'. Valid formats: text, json, names-only",
        s
      ))),
    }
  }
}

/// Parsed arguments for the affected run
pub struct AffectedArgs {
  pub root: PathBuf,
  pub modules: Option<PathBuf>,
  pub since: Option<String>,
  pub to: String,
  pub uncommitted: bool,
  pub subset: String,
  pub ignore_unknown: bool,
  pub format: String,
}

/// Run the affected command
pub fn run_affected(args: AffectedArgs) -> RippleResult<()> {
  let subset = ProjectSubset::from_str(&args.subset)?;
  let format = OutputFormat::from_str(&args.format)?;

  let git = SystemGit::open(&args.root)?;

  // Changed paths come back relative to the work tree; build the graph
  // against the same root so prefix matching lines up
  let graph = load_graph(git.work_tree(), args.modules.as_deref())?;
  log::debug!("dependency graph: {} modules", graph.len());
  if graph.is_empty() {
    log::warn!("no modules found; every run will fail open");
  }

  let detector = AffectedModuleDetector::new(
    graph,
    Box::new(git),
    DetectorOptions {
      subset,
      ignore_unknown_modules: args.ignore_unknown,
      base_ref: args.since,
      head_ref: args.to,
      include_uncommitted: args.uncommitted,
    },
  );

  let report = detector.report()?;

  match format {
    OutputFormat::Text => display_text(&report, subset),
    OutputFormat::Json => display_json(&report, subset),
    OutputFormat::NamesOnly => display_names_only(&report, subset),
  }

  Ok(())
}

/// Build the graph from a descriptor file, or fall back to cargo metadata
fn load_graph(root: &Path, modules: Option<&Path>) -> RippleResult<DependencyGraph> {
  match modules {
    Some(file) => DependencyGraph::from_descriptor_file(file),
    None => {
      if !root.join("Cargo.toml").exists() {
        return Err(RippleError::with_help(
          format!("No Cargo.toml found at {}", root.display()),
          "Pass --modules <file.json> to describe non-Cargo projects.",
        ));
      }
      let metadata = WorkspaceMetadata::load(root)?;
      DependencyGraph::from_descriptors(&metadata.module_descriptors()?)
    }
  }
}

/// Display the report in human-readable text format
fn display_text(report: &AffectedReport, subset: ProjectSubset) {
  println!("Affected Modules");
  println!("================");
  println!();

  match &report.base_ref {
    Some(base) => println!("Base ref: {}", base),
    None => println!("Base ref: <none>"),
  }

  if let Some(reason) = &report.fail_open_reason {
    println!();
    println!("Change scope unknown ({}); every module is affected.", reason);
  } else {
    println!("Changed files: {}", report.changed_files.len());
    if !report.changed_files.is_empty() && report.changed_files.len() <= 20 {
      for file in &report.changed_files {
        println!("  {}", file);
      }
    }
  }
  println!();

  println!("Directly changed: {} modules", report.set.changed.len());
  for module in &report.set.changed {
    println!("  📦 {}", module);
  }
  println!();

  println!("Transitive dependents: {} modules", report.set.dependents.len());
  for module in &report.set.dependents {
    println!("  ⬆  {}", module);
  }
  println!();

  if report.set.is_empty() {
    println!("Nothing affected.");
    return;
  }

  let selected = report.set.for_subset(subset);
  println!("Selected ({} subset): {} modules", subset.as_str(), selected.len());
  for module in selected {
    println!("  🎯 {}", module);
  }
}

/// Display the report in JSON format
fn display_json(report: &AffectedReport, subset: ProjectSubset) {
  use serde_json::json;

  let changed: Vec<_> = report.set.changed.iter().collect();
  let dependents: Vec<_> = report.set.dependents.iter().collect();
  let all_affected: Vec<_> = report.set.all_affected.iter().collect();
  let selected: Vec<_> = report.set.for_subset(subset).iter().collect();

  let output = json!({
      "base_ref": report.base_ref,
      "changed_files": report.changed_files,
      "fail_open": report.fail_open_reason,
      "subset": subset.as_str(),
      "modules": {
          "changed": changed,
          "dependents": dependents,
          "all_affected": all_affected,
          "selected": selected
      },
      "summary": {
          "changed_files_count": report.changed_files.len(),
          "changed_count": changed.len(),
          "dependents_count": dependents.len(),
          "all_affected_count": all_affected.len()
      }
  });

  println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

/// Display only module names for the selected subset (one per line)
fn display_names_only(report: &AffectedReport, subset: ProjectSubset) {
  for module in report.set.for_subset(subset) {
    println!("{}", module);
  }
}
