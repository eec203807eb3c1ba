//! Error types for depot with contextual messages and exit codes
//!
//! A unified error type that categorizes failures and carries a help
//! suggestion where one exists. Commands map errors to exit codes at the
//! CLI edge via [`ExitCode`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for depot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Validation failure (artifact build or smoke test)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for depot
#[derive(Debug)]
pub enum DepotError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Release store errors
  Store(StoreError),

  /// Upstream release feed errors
  Remote(RemoteError),

  /// Artifact build / smoke test errors
  Artifact(ArtifactError),

  /// I/O errors
  Io(io::Error),

  /// A categorized error annotated with the step that failed
  Step { step: String, source: Box<DepotError> },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl DepotError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    DepotError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    DepotError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// Categorized errors keep their category (and exit code); the context
  /// names the step that failed.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      DepotError::Message { message, context, help } => DepotError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => DepotError::Step {
        step: ctx_str,
        source: Box::new(other),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      DepotError::Config(_) => ExitCode::User,
      DepotError::Git(_) => ExitCode::System,
      DepotError::Store(_) => ExitCode::User,
      DepotError::Remote(_) => ExitCode::System,
      DepotError::Artifact(_) => ExitCode::Validation,
      DepotError::Io(_) => ExitCode::System,
      DepotError::Step { source, .. } => source.exit_code(),
      DepotError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      DepotError::Config(e) => e.help_message(),
      DepotError::Store(e) => e.help_message(),
      DepotError::Git(e) => e.help_message(),
      DepotError::Step { source, .. } => source.help_message(),
      DepotError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for DepotError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DepotError::Config(e) => write!(f, "{}", e),
      DepotError::Git(e) => write!(f, "{}", e),
      DepotError::Store(e) => write!(f, "{}", e),
      DepotError::Remote(e) => write!(f, "{}", e),
      DepotError::Artifact(e) => write!(f, "{}", e),
      DepotError::Io(e) => write!(f, "I/O error: {}", e),
      DepotError::Step { step, source } => write!(f, "{}\n{}", step, source),
      DepotError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for DepotError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      DepotError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for DepotError {
  fn from(err: io::Error) -> Self {
    DepotError::Io(err)
  }
}

impl From<String> for DepotError {
  fn from(msg: String) -> Self {
    DepotError::message(msg)
  }
}

impl From<&str> for DepotError {
  fn from(msg: &str) -> Self {
    DepotError::message(msg)
  }
}

impl From<ConfigError> for DepotError {
  fn from(err: ConfigError) -> Self {
    DepotError::Config(err)
  }
}

impl From<GitError> for DepotError {
  fn from(err: GitError) -> Self {
    DepotError::Git(err)
  }
}

impl From<StoreError> for DepotError {
  fn from(err: StoreError) -> Self {
    DepotError::Store(err)
  }
}

impl From<RemoteError> for DepotError {
  fn from(err: RemoteError) -> Self {
    DepotError::Remote(err)
  }
}

impl From<ArtifactError> for DepotError {
  fn from(err: ArtifactError) -> Self {
    DepotError::Artifact(err)
  }
}

impl From<serde_json::Error> for DepotError {
  fn from(err: serde_json::Error) -> Self {
    DepotError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::TomlError> for DepotError {
  fn from(err: toml_edit::TomlError) -> Self {
    DepotError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for DepotError {
  fn from(err: toml_edit::de::Error) -> Self {
    DepotError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for DepotError {
  fn from(err: toml_edit::ser::Error) -> Self {
    DepotError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<reqwest::Error> for DepotError {
  fn from(err: reqwest::Error) -> Self {
    DepotError::Remote(RemoteError::Request {
      reason: err.to_string(),
    })
  }
}

impl From<chrono::ParseError> for DepotError {
  fn from(err: chrono::ParseError) -> Self {
    DepotError::message(format!("Date parse error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for DepotError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    DepotError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Convert anyhow::Error (used by test helpers) into DepotError
impl From<anyhow::Error> for DepotError {
  fn from(err: anyhow::Error) -> Self {
    DepotError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// depot.toml not found
  NotFound { root: PathBuf },

  /// Missing or empty required field
  MissingField { field: String },

  /// Field present but unusable
  Invalid { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `depot init` to create a configuration file.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(f, "No depot configuration found.\nSearched in: {}", root.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required config field: {}", field)
      }
      ConfigError::Invalid { field, reason } => {
        write!(f, "Invalid config field '{}': {}", field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Week walk exhausted repository history
  NoCommitFound { until: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Clone the build repository first or fix `repository.path`: {}",
        path.display()
      )),
      _ => None,
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
      GitError::NoCommitFound { until } => {
        write!(f, "No commit found in or before week {}", until)
      }
    }
  }
}

/// Release store errors
#[derive(Debug)]
pub enum StoreError {
  /// Store file doesn't exist
  NotFound { path: PathBuf },

  /// Store file exists but isn't the expected structure
  Malformed { path: PathBuf, reason: String },

  /// Release stability doesn't match the partition it targets
  PartitionMismatch { version: String, stability: String },
}

impl StoreError {
  fn help_message(&self) -> Option<String> {
    match self {
      StoreError::NotFound { .. } => Some("Run `depot init` to create an empty release store.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for StoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoreError::NotFound { path } => {
        write!(f, "Release store not found: {}", path.display())
      }
      StoreError::Malformed { path, reason } => {
        write!(f, "Release store {} is malformed: {}", path.display(), reason)
      }
      StoreError::PartitionMismatch { version, stability } => {
        write!(
          f,
          "Version '{}' cannot be stored under the '{}' partition",
          version, stability
        )
      }
    }
  }
}

/// Upstream release feed errors
#[derive(Debug)]
pub enum RemoteError {
  /// Transport-level failure
  Request { reason: String },

  /// Non-success HTTP status
  Status { url: String, status: u16 },

  /// Response decoded but didn't match the expected shape
  BadPayload { reason: String },
}

impl fmt::Display for RemoteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RemoteError::Request { reason } => {
        write!(f, "Release feed request failed: {}", reason)
      }
      RemoteError::Status { url, status } => {
        write!(f, "Release feed returned HTTP {} for {}", status, url)
      }
      RemoteError::BadPayload { reason } => {
        write!(f, "Release feed payload is malformed: {}", reason)
      }
    }
  }
}

/// Artifact build errors
#[derive(Debug)]
pub enum ArtifactError {
  /// Build command failed
  BuildFailed { command: String, stderr: String },

  /// Build succeeded but an expected output file is missing
  MissingOutput { path: PathBuf },

  /// Built artifact failed its self-execution smoke test
  SmokeTestFailed { command: String, stderr: String },
}

impl fmt::Display for ArtifactError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArtifactError::BuildFailed { command, stderr } => {
        write!(f, "Artifact build failed: {}\n{}", command, stderr)
      }
      ArtifactError::MissingOutput { path } => {
        write!(f, "Artifact build produced no file at: {}", path.display())
      }
      ArtifactError::SmokeTestFailed { command, stderr } => {
        write!(f, "Artifact smoke test failed: {}\n{}", command, stderr)
      }
    }
  }
}

/// Result type alias for depot
pub type DepotResult<T> = Result<T, DepotError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> DepotResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> DepotResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<DepotError>,
{
  fn context(self, ctx: impl Into<String>) -> DepotResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> DepotResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &DepotError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
