//! Persistent release store
//!
//! One JSON document partitioned by stability tier, each partition an
//! ordered mapping from version to release record. Partition order is the
//! sort invariant: newest release first, re-established after every
//! insert. Every mutation rewrites the whole document through a temp file
//! so readers never observe a partial write.

use super::{FileKind, Stability};
use crate::core::error::{DepotResult, ResultExt, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One tracked release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
  pub version: String,
  pub release_date: i64,
  pub phar_download_url: String,
  pub signature_download_url: String,
  pub stability: Stability,
}

impl Release {
  pub fn url(&self, kind: FileKind) -> &str {
    match kind {
      FileKind::Artifact => &self.phar_download_url,
      FileKind::Signature => &self.signature_download_url,
    }
  }
}

/// Persisted shape of one release record
#[derive(Debug, Serialize, Deserialize)]
struct StoredRelease {
  release_date: i64,
  phar_download_url: String,
  signature_download_url: String,
}

/// Partitioned collection of releases, durably backed by a JSON file
pub struct ReleaseStore {
  path: PathBuf,
  partitions: BTreeMap<Stability, Vec<Release>>,
}

impl ReleaseStore {
  /// Load the store; a missing or malformed file is fatal
  pub fn load(path: &Path) -> DepotResult<Self> {
    if !path.is_file() {
      return Err(
        StoreError::NotFound {
          path: path.to_path_buf(),
        }
        .into(),
      );
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;

    let mut partitions: BTreeMap<Stability, Vec<Release>> = empty_partitions();

    let top = document.as_object().ok_or_else(|| StoreError::Malformed {
      path: path.to_path_buf(),
      reason: "top level is not an object".to_string(),
    })?;

    for (name, entries) in top {
      let stability = Stability::from_str(name).map_err(|_| StoreError::Malformed {
        path: path.to_path_buf(),
        reason: format!("unknown partition '{}'", name),
      })?;

      let entries = entries.as_object().ok_or_else(|| StoreError::Malformed {
        path: path.to_path_buf(),
        reason: format!("partition '{}' is not an object", name),
      })?;

      let partition = partitions.get_mut(&stability).expect("all partitions pre-filled");
      for (version, record) in entries {
        let record: StoredRelease =
          serde_json::from_value(record.clone()).map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            reason: format!("release '{}': {}", version, e),
          })?;

        partition.push(Release {
          version: version.clone(),
          release_date: record.release_date,
          phar_download_url: record.phar_download_url,
          signature_download_url: record.signature_download_url,
          stability,
        });
      }
    }

    Ok(Self {
      path: path.to_path_buf(),
      partitions,
    })
  }

  /// Create an empty store file and return the store
  pub fn create(path: &Path) -> DepotResult<Self> {
    let store = Self {
      path: path.to_path_buf(),
      partitions: empty_partitions(),
    };
    store.save()?;
    Ok(store)
  }

  /// Upsert a release, re-sort its partition newest-first, persist
  pub fn add(&mut self, release: Release) -> DepotResult<()> {
    if Stability::of_version(&release.version) != release.stability {
      return Err(
        StoreError::PartitionMismatch {
          version: release.version,
          stability: release.stability.to_string(),
        }
        .into(),
      );
    }

    let partition = self.partition_mut(release.stability);
    partition.retain(|r| r.version != release.version);
    partition.push(release);
    partition.sort_by_key(|r| std::cmp::Reverse(r.release_date));

    self.save()
  }

  /// Look up a release; the owning partition comes from the version's
  /// stability prefix
  pub fn get(&self, version: &str) -> Option<&Release> {
    self
      .partition(Stability::of_version(version))
      .iter()
      .find(|r| r.version == version)
  }

  /// Releases in a partition strictly older than `cutoff`, excluding one
  /// version (the tier's current latest, during sweeps)
  pub fn find_older_than(&self, stability: Stability, cutoff: i64, except_version: &str) -> Vec<Release> {
    self
      .partition(stability)
      .iter()
      .filter(|r| r.version != except_version && r.release_date < cutoff)
      .cloned()
      .collect()
  }

  /// Empty one partition; returns the number of releases removed
  pub fn delete_by_stability(&mut self, stability: Stability) -> DepotResult<usize> {
    let partition = self.partition_mut(stability);
    let removed = partition.len();
    partition.clear();
    self.save()?;
    Ok(removed)
  }

  /// Remove the named versions from whichever partitions they belong to;
  /// one save for the whole batch
  pub fn delete_by_versions(&mut self, versions: &[String]) -> DepotResult<usize> {
    let mut removed = 0;

    for version in versions {
      let partition = self.partition_mut(Stability::of_version(version));
      let before = partition.len();
      partition.retain(|r| &r.version != version);
      removed += before - partition.len();
    }

    if removed > 0 {
      self.save()?;
    }

    Ok(removed)
  }

  /// Newest release per non-empty partition
  pub fn latest_per_stability(&self) -> BTreeMap<Stability, &Release> {
    self
      .partitions
      .iter()
      .filter_map(|(stability, releases)| releases.first().map(|r| (*stability, r)))
      .collect()
  }

  /// Substitute a stability tier name with that tier's current latest
  /// version; anything else (including a tier name with no releases yet)
  /// passes through unchanged
  pub fn resolve_version(&self, name: &str) -> String {
    if let Ok(stability) = Stability::from_str(name)
      && let Some(release) = self.partition(stability).first()
    {
      return release.version.clone();
    }

    name.to_string()
  }

  /// Download URL for a version; None when the version is unknown or the
  /// file hasn't been uploaded
  pub fn download_url(&self, version: &str, kind: FileKind) -> Option<String> {
    let url = self.get(version)?.url(kind);
    if url.is_empty() { None } else { Some(url.to_string()) }
  }

  fn partition(&self, stability: Stability) -> &Vec<Release> {
    self.partitions.get(&stability).expect("all partitions pre-filled")
  }

  fn partition_mut(&mut self, stability: Stability) -> &mut Vec<Release> {
    self.partitions.get_mut(&stability).expect("all partitions pre-filled")
  }

  /// Atomically rewrite the backing file
  fn save(&self) -> DepotResult<()> {
    let mut top = serde_json::Map::new();

    for stability in Stability::ALL {
      let mut entries = serde_json::Map::new();
      for release in self.partition(stability) {
        let record = StoredRelease {
          release_date: release.release_date,
          phar_download_url: release.phar_download_url.clone(),
          signature_download_url: release.signature_download_url.clone(),
        };
        entries.insert(release.version.clone(), serde_json::to_value(record)?);
      }
      top.insert(stability.as_str().to_string(), Value::Object(entries));
    }

    let content = serde_json::to_string_pretty(&Value::Object(top))?;

    let tmp = self.path.with_extension("json.tmp");
    fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &self.path).with_context(|| format!("Failed to replace {}", self.path.display()))?;

    Ok(())
  }
}

fn empty_partitions() -> BTreeMap<Stability, Vec<Release>> {
  Stability::ALL.into_iter().map(|s| (s, Vec::new())).collect()
}
