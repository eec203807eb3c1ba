//! System git backend - zero crate dependencies
//!
//! Runs git subprocesses with an isolated environment. The release engine
//! only needs a handful of read operations plus checkout/pull, so each one
//! is a single subprocess call.

use super::{CommitStamp, RepositoryLog};
use crate::core::error::{DepotResult, GitError, ResultExt};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// Performs one subprocess call to verify the path is a work tree.
  pub fn open(path: &Path) -> DepotResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      return Err(
        GitError::RepoNotFound {
          path: path.to_path_buf(),
        }
        .into(),
      );
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");

    cmd
  }

  /// Run a git command, capturing stdout or mapping a failure to GitError
  fn run(&self, args: &[&str]) -> DepotResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.first().copied().unwrap_or("")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(
        GitError::CommandFailed {
          command: format!("git {}", args.join(" ")),
          stderr: stderr.trim().to_string(),
        }
        .into(),
      );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}

impl RepositoryLog for SystemGit {
  fn most_recent_commit(&self, after: DateTime<Utc>, before: DateTime<Utc>) -> DepotResult<Option<CommitStamp>> {
    let output = self.run(&[
      "log",
      "--format=%H:%ct",
      "--max-count=1",
      &format!("--after={}", after.format("%Y-%m-%d %H:%M:%S +0000")),
      &format!("--before={}", before.format("%Y-%m-%d %H:%M:%S +0000")),
      "HEAD",
    ])?;

    let line = output.trim();
    if line.is_empty() {
      return Ok(None);
    }

    parse_stamp(line).map(Some)
  }

  fn describe(&self, sha: &str) -> DepotResult<String> {
    let output = self.run(&["describe", "--tags", sha])?;
    Ok(output.trim().to_string())
  }

  fn checkout(&self, rev: &str) -> DepotResult<()> {
    self.run(&["checkout", rev])?;
    Ok(())
  }

  fn refresh(&self, branch: &str) -> DepotResult<()> {
    self.run(&["checkout", branch])?;
    self.run(&["pull"])?;
    Ok(())
  }

  fn first_commit_timestamp(&self) -> DepotResult<i64> {
    // Multiple root commits are possible; the oldest bounds the walk.
    let output = self.run(&["log", "--max-parents=0", "--format=%ct", "HEAD"])?;

    output
      .lines()
      .filter_map(|line| line.trim().parse::<i64>().ok())
      .min()
      .ok_or_else(|| {
        GitError::CommandFailed {
          command: "git log --max-parents=0".to_string(),
          stderr: "no root commit timestamp in output".to_string(),
        }
        .into()
      })
  }
}

/// Parse one `%H:%ct` log line
fn parse_stamp(line: &str) -> DepotResult<CommitStamp> {
  let (sha, timestamp) = line.split_once(':').ok_or_else(|| GitError::CommandFailed {
    command: "git log --format=%H:%ct".to_string(),
    stderr: format!("unparseable line: {}", line),
  })?;

  let timestamp: i64 = timestamp.trim().parse().map_err(|_| GitError::CommandFailed {
    command: "git log --format=%H:%ct".to_string(),
    stderr: format!("unparseable timestamp: {}", line),
  })?;

  Ok(CommitStamp {
    sha: sha.to_string(),
    timestamp,
  })
}
