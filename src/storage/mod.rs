pub mod fs;

pub use fs::FsObjectStore;

use crate::core::error::DepotResult;
use std::path::Path;

/// Object-store collaborator artifacts are published through
///
/// Keys are slash-separated paths (`snapshots/<sha>/tool.phar`); upload
/// mints the public URL a key is reachable under, and `key_for` is its
/// inverse, returning None for URLs this store did not mint.
pub trait ObjectStore {
  /// Store a local file under `key`; returns the public URL
  fn upload(&self, key: &str, file: &Path) -> DepotResult<String>;

  /// Remove objects by key; unknown keys are not an error
  fn delete_objects(&self, keys: &[String]) -> DepotResult<()>;

  /// The key behind a URL minted by this store
  fn key_for(&self, url: &str) -> Option<String>;
}
