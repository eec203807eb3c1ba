//! Versions command implementation
//!
//! Read-only: opens the release store directly, never the build
//! repository, so it works on hosts that only serve downloads.

use crate::commands::load_config;
use crate::core::error::DepotResult;
use crate::release::ReleaseStore;
use crate::release::engine::latest_versions;

/// Run the versions command
pub fn run_versions(json: bool) -> DepotResult<()> {
  let config = load_config()?;
  let store = ReleaseStore::load(&config.store_path())?;

  let versions = latest_versions(&store, &config.artifact.file, config.artifact.min_platform);

  if json {
    println!("{}", serde_json::to_string_pretty(&versions)?);
    return Ok(());
  }

  if versions.is_empty() {
    println!("⚠️  No releases tracked yet");
    println!();
    println!("Populate the store:");
    println!("  depot sync");
    println!("  depot release create preview");
    return Ok(());
  }

  println!("📋 Latest versions");
  println!();
  for (stability, info) in &versions {
    println!("  {:<9} {}", stability, info.version);
    println!("            {}", info.path);
  }

  Ok(())
}
