//! Error types for ripple with contextual messages and exit codes

use std::fmt;
use std::io;
use std::path::PathBuf;

pub type RippleResult<T> = Result<T, RippleError>;

/// Exit codes for ripple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (bad flags, malformed descriptor file)
  User = 1,
  /// System error (git, metadata, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for ripple
#[derive(Debug)]
pub enum RippleError {
  /// Git operation errors
  Git(GitError),

  /// Project model errors (descriptors, graph construction)
  Project(ProjectError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl RippleError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    RippleError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    RippleError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      RippleError::Message { message, context, help } => RippleError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => RippleError::Message {
        message: other.to_string(),
        help: other.help_message(),
        context: Some(ctx_str),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      RippleError::Git(_) => ExitCode::System,
      RippleError::Project(_) => ExitCode::User,
      RippleError::Io(_) => ExitCode::System,
      RippleError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      RippleError::Git(e) => e.help_message(),
      RippleError::Project(e) => e.help_message(),
      RippleError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for RippleError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RippleError::Git(e) => write!(f, "{}", e),
      RippleError::Project(e) => write!(f, "{}", e),
      RippleError::Io(e) => write!(f, "I/O error: {}", e),
      RippleError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for RippleError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      RippleError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for RippleError {
  fn from(err: io::Error) -> Self {
    RippleError::Io(err)
  }
}

impl From<String> for RippleError {
  fn from(msg: String) -> Self {
    RippleError::message(msg)
  }
}

impl From<&str> for RippleError {
  fn from(msg: &str) -> Self {
    RippleError::message(msg)
  }
}

impl From<cargo_metadata::Error> for RippleError {
  fn from(err: cargo_metadata::Error) -> Self {
    RippleError::message(format!("Cargo metadata error: {}", err))
  }
}

impl From<serde_json::Error> for RippleError {
  fn from(err: serde_json::Error) -> Self {
    RippleError::message(format!("JSON error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for RippleError {
  fn from(err: std::path::StripPrefixError) -> Self {
    RippleError::message(format!("Path strip prefix error: {}", err))
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "ripple needs a git repository to diff against. Check the path: {}",
        path.display()
      )),
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("unknown revision") || stderr.contains("bad revision") {
          Some("The base ref does not exist in this repository. Pass a valid ref via --since.".to_string())
        } else {
          None
        }
      }
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Project model errors
#[derive(Debug)]
pub enum ProjectError {
  /// Two descriptors claim the same module name
  DuplicateModule { name: String },

  /// A dependency edge references a module not in the descriptor set
  UnknownDependency { module: String, dependency: String },

  /// A query named a module not in the graph
  ModuleNotFound { name: String },

  /// Descriptor file missing
  DescriptorsNotFound { path: PathBuf },
}

impl ProjectError {
  fn help_message(&self) -> Option<String> {
    match self {
      ProjectError::DescriptorsNotFound { .. } => {
        Some("Pass a module descriptor file via --modules, or run inside a Cargo workspace.".to_string())
      }
      ProjectError::UnknownDependency { .. } => Some(
        "Descriptor dependencies must name other modules in the same file; the provider should filter out external dependencies.".to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for ProjectError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProjectError::DuplicateModule { name } => {
        write!(f, "Duplicate module name in descriptors: '{}'", name)
      }
      ProjectError::UnknownDependency { module, dependency } => {
        write!(f, "Module '{}' depends on unknown module '{}'", module, dependency)
      }
      ProjectError::ModuleNotFound { name } => {
        write!(f, "Module '{}' not found in the dependency graph", name)
      }
      ProjectError::DescriptorsNotFound { path } => {
        write!(f, "Module descriptor file not found: {}", path.display())
      }
    }
  }
}

/// Extension trait for adding context to results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> RippleResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> RippleResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<RippleError>,
{
  fn context(self, ctx: impl Into<String>) -> RippleResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> RippleResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &RippleError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
