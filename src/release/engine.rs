//! Release lifecycle orchestration
//!
//! Three operations, each driven by an external trigger and run to
//! completion: stable sync (full replace from the upstream release list),
//! unstable release creation (anchor week, commit selection, build,
//! upload, record), and retention sweeps (delete expired releases
//! everywhere, object storage first). Collaborators are injected; any
//! collaborator failure aborts the operation with the failing step named.

use super::selector::CommitSelector;
use super::store::{Release, ReleaseStore};
use super::{FileKind, Stability};
use crate::artifact::ArtifactProducer;
use crate::core::error::{DepotError, DepotResult, ResultExt};
use crate::core::vcs::RepositoryLog;
use crate::core::week::Week;
use crate::remote::ReleaseFeed;
use crate::storage::ObjectStore;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Engine knobs that come straight from config
pub struct EngineSettings {
  /// Branch the build repository is refreshed from
  pub branch: String,
  /// File names a build produces; also the asset names recognized in the
  /// upstream release list
  pub artifact_file: String,
  pub signature_file: String,
  /// Where builds land before upload
  pub output_dir: PathBuf,
}

/// Result of a stable sync
#[derive(Debug, PartialEq, Eq)]
pub struct SyncSummary {
  pub removed: usize,
  pub added: usize,
}

/// Result of an unstable release creation
#[derive(Debug, PartialEq, Eq)]
pub enum CreateOutcome {
  Created { version: String, sha: String, phar_url: String },
  /// A release with this exact version already exists; nothing was built
  AlreadyReleased { version: String, sha: String },
}

/// Result of a retention sweep; empty means there was nothing to do
#[derive(Debug, PartialEq, Eq)]
pub struct SweepOutcome {
  pub deleted: Vec<String>,
}

pub struct ReleaseEngine {
  store: ReleaseStore,
  repo: Box<dyn RepositoryLog>,
  producer: Box<dyn ArtifactProducer>,
  objects: Box<dyn ObjectStore>,
  feed: Box<dyn ReleaseFeed>,
  settings: EngineSettings,
}

impl ReleaseEngine {
  pub fn new(
    store: ReleaseStore,
    repo: Box<dyn RepositoryLog>,
    producer: Box<dyn ArtifactProducer>,
    objects: Box<dyn ObjectStore>,
    feed: Box<dyn ReleaseFeed>,
    settings: EngineSettings,
  ) -> Self {
    Self {
      store,
      repo,
      producer,
      objects,
      feed,
      settings,
    }
  }

  /// Replace the stable partition with the upstream release list
  ///
  /// The list is fetched before the partition is cleared, so a feed
  /// failure leaves the store as it was; readers can still observe the
  /// rebuild window between the clear and the last insert.
  pub fn sync_stable(&mut self) -> DepotResult<SyncSummary> {
    let releases = self.feed.list_releases().context("fetching the upstream release list")?;

    let removed = self
      .store
      .delete_by_stability(Stability::Stable)
      .context("clearing the stable partition")?;

    let added = releases.len();
    for remote in releases {
      let mut phar_download_url = String::new();
      let mut signature_download_url = String::new();

      for asset in remote.assets {
        if asset.name == self.settings.artifact_file {
          phar_download_url = asset.download_url;
        } else if asset.name == self.settings.signature_file {
          signature_download_url = asset.download_url;
        }
        // Unrecognized asset names (checksums, source archives) are not
        // tracked.
      }

      self
        .store
        .add(Release {
          version: remote.name,
          release_date: remote.published_at,
          phar_download_url,
          signature_download_url,
          stability: Stability::Stable,
        })
        .context("recording a stable release")?;
    }

    Ok(SyncSummary { removed, added })
  }

  /// Build and record a preview or snapshot release
  pub fn create(&mut self, stability: Stability) -> DepotResult<CreateOutcome> {
    let anchor = match stability {
      // Preview releases build from the last commit of this week.
      Stability::Preview => Week::current(),
      // Snapshot releases build from the last commit of the previous week.
      Stability::Snapshot => Week::current().previous(),
      Stability::Stable => {
        return Err(DepotError::with_help(
          "Stable releases are synced from upstream, not built",
          "Use `depot sync` to update stable releases.",
        ));
      }
    };

    self
      .repo
      .refresh(&self.settings.branch)
      .context("refreshing the build repository")?;

    let commit = CommitSelector::new(self.repo.as_ref())
      .select(anchor)
      .context("selecting the release commit")?;

    let descriptor = self
      .repo
      .describe(&commit.sha)
      .context("describing the release commit")?;
    let version = format!("{}:{}", stability, descriptor);

    // The version embeds the nearest-tag descriptor, so an existing entry
    // means this exact commit was already released for this tier.
    if self.store.get(&version).is_some() {
      return Ok(CreateOutcome::AlreadyReleased {
        version,
        sha: commit.sha,
      });
    }

    self.repo.checkout(&commit.sha).context("checking out the release commit")?;

    let built = self
      .producer
      .build(&commit.sha, stability, &self.settings.output_dir)
      .context("building the artifact")?;

    let prefix = format!("{}s/{}", stability, commit.sha);
    let phar_url = self
      .objects
      .upload(&format!("{}/{}", prefix, self.settings.artifact_file), &built.artifact)
      .context("uploading the artifact")?;
    let signature_url = self
      .objects
      .upload(&format!("{}/{}", prefix, self.settings.signature_file), &built.signature)
      .context("uploading the signature")?;

    self
      .store
      .add(Release {
        version: version.clone(),
        release_date: commit.timestamp,
        phar_download_url: phar_url.clone(),
        signature_download_url: signature_url,
        stability,
      })
      .context("recording the release")?;

    Ok(CreateOutcome::Created {
      version,
      sha: commit.sha,
      phar_url,
    })
  }

  /// Delete releases older than `max_age`, keeping the tier's current
  /// latest regardless of its age
  ///
  /// Object storage is cleaned before the store: if deletion fails there,
  /// the store still references the objects and the sweep can be retried.
  pub fn sweep(&mut self, stability: Stability, max_age: Duration) -> DepotResult<SweepOutcome> {
    let latest = match self.store.latest_per_stability().get(&stability) {
      Some(release) => release.version.clone(),
      None => return Ok(SweepOutcome { deleted: Vec::new() }),
    };

    let cutoff = (Utc::now() - max_age).timestamp();
    let expired = self.store.find_older_than(stability, cutoff, &latest);
    if expired.is_empty() {
      return Ok(SweepOutcome { deleted: Vec::new() });
    }

    // Keys come from the stored URLs (the record of what was actually
    // uploaded); URLs this object store didn't mint yield no key and are
    // left alone. Parent paths go last so they're empty when removed.
    let mut keys = Vec::new();
    let mut parents = Vec::new();
    for release in &expired {
      for url in [&release.phar_download_url, &release.signature_download_url] {
        if let Some(key) = self.objects.key_for(url) {
          if let Some((parent, _)) = key.rsplit_once('/')
            && !parents.contains(&parent.to_string())
          {
            parents.push(parent.to_string());
          }
          if !keys.contains(&key) {
            keys.push(key);
          }
        }
      }
    }
    keys.extend(parents);

    self.objects.delete_objects(&keys).context("deleting stored objects")?;

    let versions: Vec<String> = expired.iter().map(|r| r.version.clone()).collect();
    self
      .store
      .delete_by_versions(&versions)
      .context("deleting swept releases")?;

    Ok(SweepOutcome { deleted: versions })
  }
}

/// Latest-version entry served to download clients
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionInfo {
  pub version: String,
  pub path: String,
  pub min_platform: u32,
}

/// Latest version per non-empty tier, with its download path
pub fn latest_versions(store: &ReleaseStore, artifact_file: &str, min_platform: u32) -> BTreeMap<String, VersionInfo> {
  store
    .latest_per_stability()
    .into_iter()
    .map(|(stability, release)| {
      (
        stability.to_string(),
        VersionInfo {
          version: release.version.clone(),
          path: format!("/download/{}/{}", release.version, artifact_file),
          min_platform,
        },
      )
    })
    .collect()
}

/// Download URL for a version or a literal stability tier name
pub fn resolve_download_url(store: &ReleaseStore, version_or_stability: &str, kind: FileKind) -> Option<String> {
  let version = store.resolve_version(version_or_stability);
  store.download_url(&version, kind)
}
