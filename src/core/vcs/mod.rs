pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::DepotResult;
use chrono::{DateTime, Utc};

/// A commit pinned to its committer timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStamp {
  pub sha: String,
  pub timestamp: i64,
}

/// Repository-log collaborator the release engine reads history through
pub trait RepositoryLog {
  /// The single most recent commit in `[after, before]`, if any
  fn most_recent_commit(&self, after: DateTime<Utc>, before: DateTime<Utc>) -> DepotResult<Option<CommitStamp>>;

  /// Nearest-tag descriptor for a commit (e.g. `v1.2.0-3-gabc1234`)
  fn describe(&self, sha: &str) -> DepotResult<String>;

  /// Check out a revision (commit sha or branch name)
  fn checkout(&self, rev: &str) -> DepotResult<()>;

  /// Bring a branch up to date with its upstream
  fn refresh(&self, branch: &str) -> DepotResult<()>;

  /// Committer timestamp of the repository's first commit; bounds the
  /// backward week walk
  fn first_commit_timestamp(&self) -> DepotResult<i64>;
}
