//! Integration tests for the ripple CLI against real git repositories

use crate::helpers::{TestWorkspace, run_ripple, stdout_lines};
use anyhow::Result;

/// Three modules: b depends on a, c is independent
fn abc_workspace() -> Result<TestWorkspace> {
  TestWorkspace::with_modules(&[("a", "a", &[]), ("b", "b", &["a"]), ("c", "c", &[])])
}

#[test]
fn test_change_in_one_module() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  ws.write_file("a/src.txt", "changed\n")?;
  ws.commit("Change a")?;

  let output = run_ripple(
    &ws.path,
    &["--modules", "modules.json", "--since", &base, "--format", "names-only"],
  )?;

  assert_eq!(stdout_lines(&output), vec!["a", "b"]);
  Ok(())
}

#[test]
fn test_changed_subset() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  ws.write_file("a/src.txt", "changed\n")?;
  ws.commit("Change a")?;

  let output = run_ripple(
    &ws.path,
    &[
      "--modules",
      "modules.json",
      "--since",
      &base,
      "--subset",
      "changed",
      "--format",
      "names-only",
    ],
  )?;

  assert_eq!(stdout_lines(&output), vec!["a"]);
  Ok(())
}

#[test]
fn test_dependent_subset_excludes_changed() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  ws.write_file("a/src.txt", "changed\n")?;
  ws.commit("Change a")?;

  let output = run_ripple(
    &ws.path,
    &[
      "--modules",
      "modules.json",
      "--since",
      &base,
      "--subset",
      "dependent",
      "--format",
      "names-only",
    ],
  )?;

  assert_eq!(stdout_lines(&output), vec!["b"]);
  Ok(())
}

#[test]
fn test_empty_diff_fails_open() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  // Nothing committed after the baseline
  let output = run_ripple(
    &ws.path,
    &["--modules", "modules.json", "--since", &base, "--format", "names-only"],
  )?;

  assert_eq!(stdout_lines(&output), vec!["a", "b", "c"]);
  Ok(())
}

#[test]
fn test_root_change_fails_open() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  ws.write_file("README.md", "# updated\n")?;
  ws.commit("Update readme")?;

  let output = run_ripple(
    &ws.path,
    &["--modules", "modules.json", "--since", &base, "--format", "names-only"],
  )?;

  assert_eq!(stdout_lines(&output), vec!["a", "b", "c"]);
  Ok(())
}

#[test]
fn test_ignore_unknown_drops_root_change() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  ws.write_file("README.md", "# updated\n")?;
  ws.commit("Update readme")?;

  let output = run_ripple(
    &ws.path,
    &[
      "--modules",
      "modules.json",
      "--since",
      &base,
      "--ignore-unknown",
      "--format",
      "names-only",
    ],
  )?;

  assert!(stdout_lines(&output).is_empty());
  Ok(())
}

#[test]
fn test_no_merge_commit_fails_open() -> Result<()> {
  let ws = abc_workspace()?;
  ws.commit("baseline")?;

  // No --since and no merge commits in history: scope is unknown
  let output = run_ripple(&ws.path, &["--modules", "modules.json", "--format", "names-only"])?;

  assert_eq!(stdout_lines(&output), vec!["a", "b", "c"]);
  Ok(())
}

#[test]
fn test_uncommitted_changes() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  // Working-tree change to a tracked file (untracked files are invisible
  // to `git diff`, so modify the committed placeholder)
  ws.write_file("a/placeholder.txt", "dirty\n")?;

  let output = run_ripple(
    &ws.path,
    &[
      "--modules",
      "modules.json",
      "--since",
      &base,
      "--uncommitted",
      "--subset",
      "changed",
      "--format",
      "names-only",
    ],
  )?;

  assert_eq!(stdout_lines(&output), vec!["a"]);
  Ok(())
}

#[test]
fn test_nested_module_owns_its_files() -> Result<()> {
  let ws = TestWorkspace::with_modules(&[("p1", "p1", &[]), ("p3", "p1/p3", &["p1"])])?;
  let base = ws.commit("baseline")?;

  ws.write_file("p1/p3/src.txt", "changed\n")?;
  ws.commit("Change nested module")?;

  let output = run_ripple(
    &ws.path,
    &[
      "--modules",
      "modules.json",
      "--since",
      &base,
      "--subset",
      "changed",
      "--format",
      "names-only",
    ],
  )?;

  assert_eq!(stdout_lines(&output), vec!["p3"]);
  Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  ws.write_file("a/src.txt", "changed\n")?;
  ws.commit("Change a")?;

  let output = run_ripple(
    &ws.path,
    &["--modules", "modules.json", "--since", &base, "--format", "json"],
  )?;

  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(json["modules"]["changed"], serde_json::json!(["a"]));
  assert_eq!(json["modules"]["dependents"], serde_json::json!(["b"]));
  assert_eq!(json["modules"]["all_affected"], serde_json::json!(["a", "b"]));
  assert!(json["fail_open"].is_null());
  assert_eq!(json["summary"]["changed_files_count"], 1);
  Ok(())
}

#[test]
fn test_json_output_fail_open_reason() -> Result<()> {
  let ws = abc_workspace()?;
  let base = ws.commit("baseline")?;

  ws.write_file("infra/ci.yml", "jobs: []\n")?;
  ws.commit("Touch build infrastructure")?;

  let output = run_ripple(
    &ws.path,
    &["--modules", "modules.json", "--since", &base, "--format", "json"],
  )?;

  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert!(json["fail_open"].is_string());
  assert_eq!(json["modules"]["all_affected"], serde_json::json!(["a", "b", "c"]));
  Ok(())
}

#[test]
fn test_invalid_base_ref_is_a_hard_error() -> Result<()> {
  let ws = abc_workspace()?;
  ws.commit("baseline")?;

  let result = run_ripple(
    &ws.path,
    &["--modules", "modules.json", "--since", "no-such-ref", "--format", "names-only"],
  );

  assert!(result.is_err());
  Ok(())
}

#[test]
fn test_cargo_workspace_provider() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_crate("lib-a", &[])?;
  ws.add_crate("lib-b", &[("lib-a", r#"{ path = "../lib-a" }"#)])?;
  let base = ws.commit("Add lib-a and lib-b")?;

  ws.write_file("crates/lib-a/src/lib.rs", "pub fn hello() {}\n")?;
  ws.commit("Modify lib-a")?;

  let output = run_ripple(&ws.path, &["--since", &base, "--format", "names-only"])?;

  assert_eq!(stdout_lines(&output), vec!["lib-a", "lib-b"]);
  Ok(())
}
