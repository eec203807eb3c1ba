//! Directory-backed object store
//!
//! Objects live under a local root that the download host serves at
//! `base_url`. Keys map 1:1 onto paths below the root, so `key_for` is a
//! plain prefix strip on the URL.

use super::ObjectStore;
use crate::core::error::{DepotError, DepotResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FsObjectStore {
  root: PathBuf,
  base_url: String,
}

impl FsObjectStore {
  pub fn new(root: PathBuf, base_url: &str) -> Self {
    Self {
      root,
      base_url: base_url.trim_end_matches('/').to_string(),
    }
  }

  fn object_path(&self, key: &str) -> DepotResult<PathBuf> {
    // Keys are engine-built, never user input, but a traversal segment
    // would silently escape the root.
    if key.split('/').any(|segment| segment.is_empty() || segment == "..") {
      return Err(DepotError::message(format!("Invalid object key: {}", key)));
    }
    Ok(self.root.join(key))
  }
}

impl ObjectStore for FsObjectStore {
  fn upload(&self, key: &str, file: &Path) -> DepotResult<String> {
    let target = self.object_path(key)?;

    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(file, &target)
      .with_context(|| format!("Failed to store {} as {}", file.display(), target.display()))?;

    Ok(format!("{}/{}", self.base_url, key))
  }

  fn delete_objects(&self, keys: &[String]) -> DepotResult<()> {
    for key in keys {
      let target = self.object_path(key)?;

      if target.is_dir() {
        // Parent-path keys: only remove once the objects inside are gone.
        if fs::read_dir(&target)?.next().is_none() {
          fs::remove_dir(&target).with_context(|| format!("Failed to delete {}", target.display()))?;
        }
      } else if target.is_file() {
        fs::remove_file(&target).with_context(|| format!("Failed to delete {}", target.display()))?;
      }
    }

    Ok(())
  }

  fn key_for(&self, url: &str) -> Option<String> {
    let key = url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
    if key.is_empty() { None } else { Some(key.to_string()) }
  }
}
