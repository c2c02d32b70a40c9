//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A test project with git history and a module descriptor file
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create an empty git repository
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    Ok(Self { _root: root, path })
  }

  /// Create a repository with a modules.json descriptor file and one
  /// placeholder source file per module, committed as the initial state.
  ///
  /// `modules` entries are (name, path, dependencies).
  pub fn with_modules(modules: &[(&str, &str, &[&str])]) -> Result<Self> {
    let ws = Self::new()?;

    let mut descriptors = Vec::new();
    for (name, path, deps) in modules {
      let dir = ws.path.join(path);
      std::fs::create_dir_all(&dir)?;
      std::fs::write(dir.join("placeholder.txt"), format!("{}\n", name))?;

      let deps_json: Vec<String> = deps.iter().map(|d| format!("\"{}\"", d)).collect();
      descriptors.push(format!(
        r#"  {{ "name": "{}", "path": "{}", "dependencies": [{}] }}"#,
        name,
        path,
        deps_json.join(", ")
      ));
    }

    std::fs::write(ws.path.join("modules.json"), format!("[\n{}\n]\n", descriptors.join(",\n")))?;
    std::fs::write(ws.path.join("README.md"), "# test project\n")?;
    ws.commit("Initial module layout")?;

    Ok(ws)
  }

  /// Add a crate to a Cargo workspace layout (for the cargo_metadata provider)
  pub fn add_crate(&self, name: &str, deps: &[(&str, &str)]) -> Result<PathBuf> {
    let workspace_toml = self.path.join("Cargo.toml");
    if !workspace_toml.exists() {
      std::fs::write(
        &workspace_toml,
        r#"[workspace]
members = ["crates/*"]
resolver = "2"
"#,
      )?;
    }

    let crate_path = self.path.join("crates").join(name);
    std::fs::create_dir_all(crate_path.join("src"))?;

    let mut cargo_toml = format!(
      r#"[package]
name = "{}"
version = "0.1.0"
edition = "2021"

[dependencies]
"#,
      name
    );
    for (dep_name, dep_spec) in deps {
      cargo_toml.push_str(&format!("{} = {}\n", dep_name, dep_spec));
    }
    std::fs::write(crate_path.join("Cargo.toml"), cargo_toml)?;
    std::fs::write(crate_path.join("src/lib.rs"), format!("//! {} crate\n", name))?;

    Ok(crate_path)
  }

  /// Write a file relative to the project root
  pub fn write_file(&self, rel_path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(rel_path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Commit current changes, returning the commit SHA
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "--allow-empty", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the ripple CLI in a directory
pub fn run_ripple(cwd: &Path, args: &[&str]) -> Result<Output> {
  let ripple_bin = env!("CARGO_BIN_EXE_ripple");

  let output = Command::new(ripple_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run ripple")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "ripple command failed: ripple {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Non-empty stdout lines, in output order
pub fn stdout_lines(output: &Output) -> Vec<String> {
  String::from_utf8_lossy(&output.stdout)
    .lines()
    .map(|l| l.trim().to_string())
    .filter(|l| !l.is_empty())
    .collect()
}
