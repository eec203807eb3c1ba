//! Release tracking and publishing orchestration
//!
//! # Core Invariants
//!
//! 1. **Releases are partitioned by stability tier**
//!    - stable: synced verbatim from the upstream release list
//!    - preview: built from the last commit of the current week
//!    - snapshot: built from the last commit of the previous week
//!
//! 2. **Every partition stays sorted newest-first**
//!    - "latest" for a tier is always the first entry
//!    - re-established after every insert
//!
//! 3. **Unstable versions carry their tier as a prefix**
//!    - `preview:v1.2.0-3-gabc1234`, `snapshot:v1.1.0-17-gdeadbee`
//!    - the prefix always matches the partition the release lives in
//!
//! # Architecture
//!
//! - **store**: persistent partitioned release collection (releases.json)
//! - **selector**: backward week walk for the commit to build
//! - **engine**: sync / create / sweep orchestration over injected
//!   collaborators

pub mod engine;
pub mod selector;
pub mod store;

pub use engine::ReleaseEngine;
pub use selector::CommitSelector;
pub use store::{Release, ReleaseStore};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stability tier of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
  Stable,
  Preview,
  Snapshot,
}

impl Stability {
  pub const ALL: [Stability; 3] = [Stability::Stable, Stability::Preview, Stability::Snapshot];

  pub fn as_str(&self) -> &'static str {
    match self {
      Stability::Stable => "stable",
      Stability::Preview => "preview",
      Stability::Snapshot => "snapshot",
    }
  }

  /// The tier a version string belongs to
  ///
  /// Unstable versions embed their tier as a `<tier>:` prefix; anything
  /// else is an upstream tag name and lives in the stable partition.
  pub fn of_version(version: &str) -> Stability {
    match version.split_once(':') {
      Some((prefix, _)) => Stability::from_str(prefix).unwrap_or(Stability::Stable),
      None => Stability::Stable,
    }
  }
}

impl FromStr for Stability {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "stable" => Ok(Stability::Stable),
      "preview" => Ok(Stability::Preview),
      "snapshot" => Ok(Stability::Snapshot),
      _ => Err(()),
    }
  }
}

impl fmt::Display for Stability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Which of the two tracked download files is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
  Artifact,
  Signature,
}
