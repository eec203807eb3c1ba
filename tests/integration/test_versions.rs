//! Tests for the `versions` and `resolve` commands

use crate::helpers::*;
use anyhow::Result;
use serde_json::json;

fn seed(depot: &TestDepot) -> Result<()> {
  depot.write_store(&json!({
    "stable": {
      "v2.1": {
        "release_date": 2000,
        "phar_download_url": "https://gh.test/v2.1/tool.phar",
        "signature_download_url": "https://gh.test/v2.1/tool.phar.sig",
      },
      "v2.0": {
        "release_date": 1000,
        "phar_download_url": "",
        "signature_download_url": "",
      },
    },
    "preview": {
      "preview:v2.1-3-gabc1234": {
        "release_date": 3000,
        "phar_download_url": "https://files.test/previews/abc1234/tool.phar",
        "signature_download_url": "https://files.test/previews/abc1234/tool.phar.sig",
      },
    },
    "snapshot": {},
  }))
}

#[test]
fn test_versions_json() -> Result<()> {
  let depot = TestDepot::new()?;
  seed(&depot)?;

  let output = run_depot(&depot.path, &["versions", "--json"])?;
  let versions: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(versions["stable"]["version"], "v2.1");
  assert_eq!(versions["stable"]["path"], "/download/v2.1/tool.phar");
  assert_eq!(versions["stable"]["min_platform"], 50300);
  assert_eq!(versions["preview"]["version"], "preview:v2.1-3-gabc1234");
  assert!(versions.get("snapshot").is_none(), "empty tiers are omitted");

  Ok(())
}

#[test]
fn test_versions_empty_store() -> Result<()> {
  let depot = TestDepot::new()?;

  let output = run_depot(&depot.path, &["versions", "--json"])?;
  let versions: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(versions, json!({}));

  Ok(())
}

#[test]
fn test_resolve_stability_name() -> Result<()> {
  let depot = TestDepot::new()?;
  seed(&depot)?;

  let output = run_depot(&depot.path, &["resolve", "preview", "tool.phar"])?;
  assert_eq!(stdout(&output).trim(), "https://files.test/previews/abc1234/tool.phar");

  let output = run_depot(&depot.path, &["resolve", "stable", "tool.phar.sig"])?;
  assert_eq!(stdout(&output).trim(), "https://gh.test/v2.1/tool.phar.sig");

  Ok(())
}

#[test]
fn test_resolve_literal_version() -> Result<()> {
  let depot = TestDepot::new()?;
  seed(&depot)?;

  let output = run_depot(&depot.path, &["resolve", "v2.1", "tool.phar"])?;
  assert_eq!(stdout(&output).trim(), "https://gh.test/v2.1/tool.phar");

  Ok(())
}

#[test]
fn test_resolve_misses_are_failures() -> Result<()> {
  let depot = TestDepot::new()?;
  seed(&depot)?;

  // Unknown version.
  let output = run_depot_raw(&depot.path, &["resolve", "v9.9", "tool.phar"])?;
  assert!(!output.status.success());

  // Known version, URL never set.
  let output = run_depot_raw(&depot.path, &["resolve", "v2.0", "tool.phar"])?;
  assert!(!output.status.success());

  // Tier with no releases resolves to nothing.
  let output = run_depot_raw(&depot.path, &["resolve", "snapshot", "tool.phar"])?;
  assert!(!output.status.success());

  // Untracked file name.
  let output = run_depot_raw(&depot.path, &["resolve", "v2.1", "tool.zip"])?;
  assert!(!output.status.success());

  Ok(())
}

#[test]
fn test_malformed_store_is_fatal() -> Result<()> {
  let depot = TestDepot::new()?;
  std::fs::write(depot.path.join("releases.json"), "not json")?;

  let output = run_depot_raw(&depot.path, &["versions"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
