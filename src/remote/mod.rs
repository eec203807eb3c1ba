pub mod github;

pub use github::GithubFeed;

use crate::core::error::DepotResult;

/// One release as reported by the upstream release list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRelease {
  /// Tag name, stored verbatim as the stable version
  pub name: String,
  /// Publish time as a Unix timestamp
  pub published_at: i64,
  pub assets: Vec<RemoteAsset>,
}

/// One downloadable file attached to a remote release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
  pub name: String,
  pub download_url: String,
}

/// Upstream release list collaborator
pub trait ReleaseFeed {
  /// All releases, newest first as the upstream reports them
  fn list_releases(&self) -> DepotResult<Vec<RemoteRelease>>;
}
