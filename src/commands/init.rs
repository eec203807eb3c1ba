//! Init command implementation

use crate::commands::load_config;
use crate::core::config::DepotConfig;
use crate::core::error::{DepotError, DepotResult, ResultExt};
use crate::release::ReleaseStore;
use std::env;
use std::fs;

/// Run the init command
pub fn run_init(force: bool) -> DepotResult<()> {
  let root = env::current_dir()?;

  if DepotConfig::find_config_path(&root).is_some() && !force {
    return Err(DepotError::with_help(
      "depot is already configured here",
      "Use --force to overwrite depot.toml with the starter config.",
    ));
  }

  let config = DepotConfig::starter(root.clone());
  config.save(&root)?;
  println!("   Created depot.toml");

  let store_path = config.store_path();
  if store_path.is_file() && !force {
    println!("   Keeping existing {}", config.store.path.display());
  } else {
    ReleaseStore::create(&store_path)?;
    println!("   Created {}", config.store.path.display());
  }

  for dir in [config.storage_root(), config.build_output_dir()] {
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
  }

  // Reload to prove the starter passes its own validation.
  load_config()?;

  println!();
  println!("✅ depot initialized");
  println!();
  println!("Next steps:");
  println!("  1. Edit depot.toml ([upstream], [repository], [storage])");
  println!("  2. Clone the build repository to workspace/repository");
  println!("  3. depot sync");

  Ok(())
}
