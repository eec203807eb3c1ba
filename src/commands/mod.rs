//! CLI commands for depot
//!
//! All user-facing command implementations:
//!
//! - **init**: Create a starter depot.toml and an empty release store
//! - **sync**: Replace the stable partition with the upstream release list
//! - **create**: Build and record a preview or snapshot release
//! - **sweep**: Delete releases past the retention threshold
//! - **versions**: Show the latest version per stability tier
//! - **resolve**: Resolve a version or tier name to a download URL
//!
//! Mutating commands assemble a [`ReleaseEngine`] from config; read-only
//! commands open the release store directly and never touch the build
//! repository.

pub mod create;
pub mod init;
pub mod resolve;
pub mod sweep;
pub mod sync;
pub mod versions;

pub use create::run_create;
pub use init::run_init;
pub use resolve::run_resolve;
pub use sweep::run_sweep;
pub use sync::run_sync;
pub use versions::run_versions;

use crate::artifact::ShellProducer;
use crate::core::config::DepotConfig;
use crate::core::error::DepotResult;
use crate::core::vcs::SystemGit;
use crate::release::engine::EngineSettings;
use crate::release::{ReleaseEngine, ReleaseStore};
use crate::remote::GithubFeed;
use crate::storage::FsObjectStore;
use std::env;

/// Load config from the current directory
fn load_config() -> DepotResult<DepotConfig> {
  let cwd = env::current_dir()?;
  DepotConfig::load(&cwd)
}

/// Wire the engine with its real collaborators
///
/// Opening the build repository is the only fallible part; missing
/// credentials or paths fail here, before any operation starts.
fn open_engine(config: &DepotConfig) -> DepotResult<ReleaseEngine> {
  let store = ReleaseStore::load(&config.store_path())?;

  let repo = SystemGit::open(&config.repository_path())?;
  let producer = ShellProducer::new(
    config.repository_path(),
    config.build.command.clone(),
    &config.artifact.file,
    &config.artifact.signature,
    config.build.smoke_args.clone(),
  );
  let objects = FsObjectStore::new(config.storage_root(), &config.storage.base_url);
  let feed = GithubFeed::new(&config.upstream.owner, &config.upstream.repo)?;

  Ok(ReleaseEngine::new(
    store,
    Box::new(repo),
    Box::new(producer),
    Box::new(objects),
    Box::new(feed),
    EngineSettings {
      branch: config.repository.branch.clone(),
      artifact_file: config.artifact.file.clone(),
      signature_file: config.artifact.signature.clone(),
      output_dir: config.build_output_dir(),
    },
  ))
}
