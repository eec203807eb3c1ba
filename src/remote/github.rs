//! GitHub release list client
//!
//! Blocking client over the public releases API. Follows pagination until
//! a short page; release drafts carry no publish time and are skipped.

use super::{ReleaseFeed, RemoteAsset, RemoteRelease};
use crate::core::error::{DepotResult, RemoteError};
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;

const PER_PAGE: usize = 100;

pub struct GithubFeed {
  owner: String,
  repo: String,
  api_root: String,
  client: reqwest::blocking::Client,
}

/// Wire shape of one release
#[derive(Debug, Deserialize)]
struct WireRelease {
  name: Option<String>,
  tag_name: String,
  published_at: Option<String>,
  #[serde(default)]
  assets: Vec<WireAsset>,
}

/// Wire shape of one release asset
#[derive(Debug, Deserialize)]
struct WireAsset {
  name: String,
  browser_download_url: String,
}

impl GithubFeed {
  pub fn new(owner: &str, repo: &str) -> DepotResult<Self> {
    Self::with_api_root(owner, repo, "https://api.github.com")
  }

  /// Point the feed at a different API root (tests, GitHub Enterprise)
  pub fn with_api_root(owner: &str, repo: &str, api_root: &str) -> DepotResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .user_agent(concat!("depot/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(30))
      .build()?;

    Ok(Self {
      owner: owner.to_string(),
      repo: repo.to_string(),
      api_root: api_root.trim_end_matches('/').to_string(),
      client,
    })
  }

  fn fetch_page(&self, page: usize) -> DepotResult<Vec<WireRelease>> {
    let url = format!(
      "{}/repos/{}/{}/releases?per_page={}&page={}",
      self.api_root, self.owner, self.repo, PER_PAGE, page
    );

    let response = self.client.get(&url).send()?;
    let status = response.status();
    if !status.is_success() {
      return Err(
        RemoteError::Status {
          url,
          status: status.as_u16(),
        }
        .into(),
      );
    }

    Ok(response.json()?)
  }
}

impl ReleaseFeed for GithubFeed {
  fn list_releases(&self) -> DepotResult<Vec<RemoteRelease>> {
    let mut releases = Vec::new();

    let mut page = 1;
    loop {
      let wire = self.fetch_page(page)?;
      let short_page = wire.len() < PER_PAGE;

      for release in wire {
        if let Some(release) = decode_release(release)? {
          releases.push(release);
        }
      }

      if short_page {
        break;
      }
      page += 1;
    }

    Ok(releases)
  }
}

/// Decode one wire release; drafts (no publish time) decode to None
fn decode_release(wire: WireRelease) -> DepotResult<Option<RemoteRelease>> {
  let Some(published_at) = wire.published_at else {
    return Ok(None);
  };

  let published_at = DateTime::parse_from_rfc3339(&published_at)
    .map_err(|e| RemoteError::BadPayload {
      reason: format!("published_at '{}': {}", published_at, e),
    })?
    .timestamp();

  // Releases are frequently published with an empty display name; the tag
  // is the identity either way.
  let name = match wire.name {
    Some(name) if !name.is_empty() => name,
    _ => wire.tag_name,
  };

  Ok(Some(RemoteRelease {
    name,
    published_at,
    assets: wire
      .assets
      .into_iter()
      .map(|a| RemoteAsset {
        name: a.name,
        download_url: a.browser_download_url,
      })
      .collect(),
  }))
}
