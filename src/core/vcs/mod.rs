pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::RippleResult;

/// Version-control facts needed for one detection run.
///
/// Production uses [`SystemGit`]; tests inject a mock. The detector never
/// invokes version control directly, it only talks to this trait.
pub trait VcsClient {
  /// Changed file paths in `base..top`, relative to the repository root.
  ///
  /// When `include_uncommitted` is set, staged and unstaged working-tree
  /// changes are appended to the list.
  fn find_changed_files_since(&self, base: &str, top: &str, include_uncommitted: bool) -> RippleResult<Vec<String>>;

  /// The most recent merge commit reachable from HEAD, if any.
  ///
  /// `None` means no merge base could be determined; callers must treat the
  /// change scope as unknown.
  fn find_previous_merge_commit(&self) -> RippleResult<Option<String>>;
}
