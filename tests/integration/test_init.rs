//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_init_creates_config_and_store() -> Result<()> {
  let dir = TempDir::new()?;

  run_depot(dir.path(), &["init"])?;

  assert!(dir.path().join("depot.toml").exists());
  assert!(dir.path().join("releases.json").exists());
  assert!(dir.path().join("public/files").is_dir());

  let config = std::fs::read_to_string(dir.path().join("depot.toml"))?;
  assert!(config.contains("[upstream]"));
  assert!(config.contains("[storage]"));
  assert!(config.contains("[retention]"));

  // The fresh store answers read-only commands.
  let output = run_depot(dir.path(), &["versions", "--json"])?;
  let versions: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(versions, serde_json::json!({}));

  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let dir = TempDir::new()?;

  run_depot(dir.path(), &["init"])?;

  let output = run_depot_raw(dir.path(), &["init"])?;
  assert!(!output.status.success());

  // --force starts over.
  run_depot(dir.path(), &["init", "--force"])?;

  Ok(())
}

#[test]
fn test_commands_fail_without_config() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_depot_raw(dir.path(), &["versions"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1), "config errors are user errors");

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("depot init"), "error suggests init");

  Ok(())
}
