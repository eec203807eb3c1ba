//! Tests for the `release sweep` command

use crate::helpers::*;
use anyhow::Result;
use serde_json::json;

fn days_ago(days: i64) -> i64 {
  chrono::Utc::now().timestamp() - days * 86_400
}

fn snapshot_record(version: &str, date: i64) -> serde_json::Value {
  json!({
    "release_date": date,
    "phar_download_url": format!("https://files.test/snapshots/{}/tool.phar", version),
    "signature_download_url": format!("https://files.test/snapshots/{}/tool.phar.sig", version),
  })
}

fn seed_snapshots(depot: &TestDepot, entries: &[(&str, i64)]) -> Result<()> {
  let mut snapshot = serde_json::Map::new();
  for (version, date) in entries {
    snapshot.insert(version.to_string(), snapshot_record(version, *date));

    depot.add_object(&format!("snapshots/{}/tool.phar", version))?;
    depot.add_object(&format!("snapshots/{}/tool.phar.sig", version))?;
  }

  depot.write_store(&json!({
    "stable": {},
    "preview": {},
    "snapshot": snapshot,
  }))
}

#[test]
fn test_sweep_deletes_expired_releases_and_objects() -> Result<()> {
  let depot = TestDepot::new()?;

  // Store order is newest-first; the seeded map preserves that order.
  seed_snapshots(
    &depot,
    &[
      ("snapshot:new", days_ago(1)),
      ("snapshot:old-a", days_ago(100)),
      ("snapshot:old-b", days_ago(200)),
    ],
  )?;

  run_depot(&depot.path, &["release", "sweep", "snapshot", "--older-than", "4w"])?;

  let store = depot.read_store()?;
  let snapshot = store["snapshot"].as_object().unwrap();
  assert!(snapshot.contains_key("snapshot:new"));
  assert!(!snapshot.contains_key("snapshot:old-a"));
  assert!(!snapshot.contains_key("snapshot:old-b"));

  // Objects and their parent paths are gone; the survivor's remain.
  assert!(!depot.object_path("snapshots/snapshot:old-a").exists());
  assert!(!depot.object_path("snapshots/snapshot:old-b").exists());
  assert!(depot.object_path("snapshots/snapshot:new/tool.phar").exists());

  Ok(())
}

#[test]
fn test_sweep_spares_latest_even_when_expired() -> Result<()> {
  let depot = TestDepot::new()?;

  seed_snapshots(
    &depot,
    &[("snapshot:old-latest", days_ago(300)), ("snapshot:older", days_ago(400))],
  )?;

  run_depot(&depot.path, &["release", "sweep", "snapshot", "--older-than", "4w"])?;

  let store = depot.read_store()?;
  let snapshot = store["snapshot"].as_object().unwrap();
  assert!(
    snapshot.contains_key("snapshot:old-latest"),
    "latest survives any threshold"
  );
  assert!(!snapshot.contains_key("snapshot:older"));
  assert!(depot.object_path("snapshots/snapshot:old-latest/tool.phar").exists());

  Ok(())
}

#[test]
fn test_sweep_uses_configured_retention() -> Result<()> {
  let depot = TestDepot::new()?;

  // depot.toml sets snapshot retention to 8w.
  seed_snapshots(
    &depot,
    &[("snapshot:new", days_ago(1)), ("snapshot:old", days_ago(100))],
  )?;

  run_depot(&depot.path, &["release", "sweep", "snapshot"])?;

  let store = depot.read_store()?;
  assert!(!store["snapshot"].as_object().unwrap().contains_key("snapshot:old"));

  Ok(())
}

#[test]
fn test_sweep_without_threshold_fails_for_unconfigured_tier() -> Result<()> {
  let depot = TestDepot::new()?;

  let output = run_depot_raw(&depot.path, &["release", "sweep", "preview"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1), "user error exit code");

  Ok(())
}

#[test]
fn test_sweep_empty_tier_is_a_noop() -> Result<()> {
  let depot = TestDepot::new()?;

  let output = run_depot(&depot.path, &["release", "sweep", "snapshot", "--older-than", "1d"])?;
  assert!(stdout(&output).contains("Nothing to delete"));

  Ok(())
}
