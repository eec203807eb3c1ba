//! Sync command implementation
//!
//! Pulls the upstream release list and replaces the stable partition with
//! it. A full replace, so upstream renames or reordering never leave
//! orphaned local rows.

use crate::commands::{load_config, open_engine};
use crate::core::error::DepotResult;

/// Run the sync command
pub fn run_sync() -> DepotResult<()> {
  let config = load_config()?;
  let mut engine = open_engine(&config)?;

  println!(
    "🔄 Syncing stable releases from {}/{}",
    config.upstream.owner, config.upstream.repo
  );

  let summary = engine.sync_stable()?;

  println!(
    "✅ Replaced {} stable release(s) with {} from upstream",
    summary.removed, summary.added
  );

  Ok(())
}
