//! Release create command implementation

use crate::commands::{load_config, open_engine};
use crate::core::error::DepotResult;
use crate::release::Stability;
use crate::release::engine::CreateOutcome;

/// Run the release create command
pub fn run_create(stability: Stability) -> DepotResult<()> {
  let config = load_config()?;
  let mut engine = open_engine(&config)?;

  println!("📦 Creating {} release", stability);

  match engine.create(stability)? {
    CreateOutcome::Created { version, sha, phar_url } => {
      println!("   Commit:  {}", &sha[..sha.len().min(12)]);
      println!("   Version: {}", version);
      println!();
      println!("✅ Release {} created", version);
      println!("   {}", phar_url);
    }
    CreateOutcome::AlreadyReleased { version, sha } => {
      println!("   Commit:  {}", &sha[..sha.len().min(12)]);
      println!();
      println!("✅ Release {} already exists, nothing to build", version);
    }
  }

  Ok(())
}
