//! Commit selection for unstable releases
//!
//! Finds the newest commit inside a target week, walking backward through
//! empty weeks (long-idle repositories may not have commits for months).
//! The walk is a loop bounded by the repository's first-commit timestamp
//! rather than open-ended recursion.

use crate::core::error::{DepotResult, GitError};
use crate::core::vcs::{CommitStamp, RepositoryLog};
use crate::core::week::Week;

pub struct CommitSelector<'a> {
  repo: &'a dyn RepositoryLog,
}

impl<'a> CommitSelector<'a> {
  pub fn new(repo: &'a dyn RepositoryLog) -> Self {
    Self { repo }
  }

  /// The most recent commit in `week`, or in the nearest earlier week that
  /// has one
  pub fn select(&self, week: Week) -> DepotResult<CommitStamp> {
    let requested = week;
    let floor = self.repo.first_commit_timestamp()?;

    let mut week = week;
    while week.end().timestamp() >= floor {
      if let Some(stamp) = self.repo.most_recent_commit(week.start(), week.end())? {
        return Ok(stamp);
      }
      week = week.previous();
    }

    Err(
      GitError::NoCommitFound {
        until: requested.to_string(),
      }
      .into(),
    )
  }
}
