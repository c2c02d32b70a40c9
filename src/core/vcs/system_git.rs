//! System git backend - zero dependencies, maximum performance
//!
//! Uses git plumbing commands for all operations:
//! - Safe subprocess execution (isolated environment)
//! - `diff --name-only` for change sets (paths come back repo-relative,
//!   `/`-separated, unquoted thanks to core.quotePath=false)
//! - `log --merges -1` for the previous merge commit

use crate::core::error::{GitError, ResultExt, RippleError, RippleResult};
use crate::core::vcs::VcsClient;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,

  /// Working tree root
  work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> RippleResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(RippleError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(RippleError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root as reported by git
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }

  /// Run `git diff --name-only` with the given revision args.
  fn diff_name_only(&self, rev_args: &[&str]) -> RippleResult<Vec<String>> {
    let mut cmd = self.git_cmd();
    cmd.args(["diff", "--name-only"]);
    cmd.args(rev_args);

    let output = cmd
      .output()
      .with_context(|| format!("Failed to run git diff {}", rev_args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(RippleError::Git(GitError::CommandFailed {
        command: format!("git diff --name-only {}", rev_args.join(" ")),
        stderr: stderr.to_string(),
      }));
    }

    Ok(parse_name_only(&output.stdout))
  }
}

impl VcsClient for SystemGit {
  fn find_changed_files_since(&self, base: &str, top: &str, include_uncommitted: bool) -> RippleResult<Vec<String>> {
    let range = format!("{}..{}", base, top);
    let mut files = self.diff_name_only(&[&range])?;

    if include_uncommitted {
      // Staged + unstaged changes relative to `top`
      let mut seen: HashSet<String> = files.iter().cloned().collect();
      for file in self.diff_name_only(&[top])? {
        if seen.insert(file.clone()) {
          files.push(file);
        }
      }
    }

    Ok(files)
  }

  fn find_previous_merge_commit(&self) -> RippleResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["log", "--merges", "-1", "--format=%H"])
      .output()
      .context("Failed to run git log")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      // An unborn branch has no log at all; that's "no merge found", not a failure
      if stderr.contains("does not have any commits yet") {
        return Ok(None);
      }
      return Err(RippleError::Git(GitError::CommandFailed {
        command: "git log --merges -1".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() { Ok(None) } else { Ok(Some(sha)) }
  }
}

/// Parse `--name-only` output into one path per line
fn parse_name_only(data: &[u8]) -> Vec<String> {
  String::from_utf8_lossy(data)
    .lines()
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect()
}
