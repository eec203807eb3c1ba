//! Release sweep command implementation
//!
//! Deletes releases older than the threshold from both object storage and
//! the store. The tier's current latest always survives, so an active
//! tier never loses its only release.

use crate::commands::{load_config, open_engine};
use crate::core::config::parse_age;
use crate::core::error::{DepotError, DepotResult};
use crate::release::Stability;

/// Run the release sweep command
pub fn run_sweep(stability: Stability, older_than: Option<String>) -> DepotResult<()> {
  let config = load_config()?;

  let configured = match stability {
    Stability::Preview => config.retention.preview.clone(),
    Stability::Snapshot => config.retention.snapshot.clone(),
    Stability::Stable => None,
  };
  let age_spec = older_than.or(configured).ok_or_else(|| {
    DepotError::with_help(
      format!("No retention threshold for {} releases", stability),
      "Pass --older-than (e.g. --older-than 4w) or set one under [retention] in depot.toml.",
    )
  })?;
  let max_age = parse_age(&age_spec)?;

  let mut engine = open_engine(&config)?;

  println!("🧹 Sweeping {} releases older than {}", stability, age_spec);

  let outcome = engine.sweep(stability, max_age)?;

  if outcome.deleted.is_empty() {
    println!("✅ Nothing to delete");
    return Ok(());
  }

  for version in &outcome.deleted {
    println!("   Deleted {}", version);
  }
  println!();
  println!("✅ Swept {} release(s)", outcome.deleted.len());

  Ok(())
}
