//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A configured depot working directory
pub struct TestDepot {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestDepot {
  /// Create a directory with a depot.toml pointing all paths inside it
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("depot.toml"),
      r#"[upstream]
owner = "example"
repo = "tool"

[repository]
path = "repo"

[build]
command = ["true"]
output_dir = "out"

[artifact]
file = "tool.phar"
signature = "tool.phar.sig"
min_platform = 50300

[storage]
root = "files"
base_url = "https://files.test"

[retention]
snapshot = "8w"
"#,
    )?;

    std::fs::create_dir_all(path.join("files"))?;
    std::fs::write(path.join("releases.json"), r#"{"stable": {}, "preview": {}, "snapshot": {}}"#)?;

    // Engine-backed commands open the build repository at construction;
    // an empty repo is enough for everything that doesn't build.
    let repo = path.join("repo");
    std::fs::create_dir_all(&repo)?;
    git(&repo, &["init", "--initial-branch=main"])?;
    git(&repo, &["config", "user.name", "Test User"])?;
    git(&repo, &["config", "user.email", "test@example.com"])?;

    Ok(Self { _root: root, path })
  }

  /// Overwrite the release store with a JSON document
  pub fn write_store(&self, document: &serde_json::Value) -> Result<()> {
    std::fs::write(self.path.join("releases.json"), serde_json::to_string_pretty(document)?)?;
    Ok(())
  }

  /// Parse the release store back
  pub fn read_store(&self) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(self.path.join("releases.json"))?;
    Ok(serde_json::from_str(&content)?)
  }

  /// Seed an object under the storage root
  pub fn add_object(&self, key: &str) -> Result<PathBuf> {
    let target = self.path.join("files").join(key);
    if let Some(parent) = target.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, b"bytes")?;
    Ok(target)
  }

  /// Path of an object under the storage root
  pub fn object_path(&self, key: &str) -> PathBuf {
    self.path.join("files").join(key)
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

/// Run the depot binary, requiring success
pub fn run_depot(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_depot_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "depot command failed: depot {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the depot binary without asserting on the exit status
pub fn run_depot_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let depot_bin = env!("CARGO_BIN_EXE_depot");

  Command::new(depot_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run depot")
}

/// Stdout of a successful run as a string
pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}
