//! Depot configuration
//!
//! All credentials and paths the engine needs arrive through an explicit
//! config struct loaded from `depot.toml`; nothing is read from the
//! ambient environment. Searched in order: depot.toml, .depot.toml.

use crate::core::error::{ConfigError, DepotError, DepotResult, ResultExt};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotConfig {
  pub upstream: UpstreamConfig,
  pub repository: RepositoryConfig,
  pub build: BuildConfig,
  pub artifact: ArtifactConfig,
  pub storage: StorageConfig,
  #[serde(default)]
  pub store: StoreConfig,
  #[serde(default)]
  pub retention: RetentionConfig,

  /// Directory the config was loaded from; relative paths resolve here
  #[serde(skip)]
  pub root: PathBuf,
}

/// Where stable releases are synced from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
  pub owner: String,
  pub repo: String,
}

/// The cloned repository unstable releases are built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
  pub path: PathBuf,
  #[serde(default = "default_branch")]
  pub branch: String,
}

fn default_branch() -> String {
  "master".to_string()
}

/// How a distributable is produced from a checked-out commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Program and leading arguments, executed inside the repository.
  /// `--build-dir=<output_dir>` and `--stability=<tier>` are appended.
  pub command: Vec<String>,

  /// Where built files land
  pub output_dir: PathBuf,

  /// Arguments for self-executing the built artifact; omit to skip the
  /// smoke test
  #[serde(default)]
  pub smoke_args: Option<Vec<String>>,
}

/// Names of the files a build produces and the downloads map to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
  pub file: String,
  pub signature: String,
  #[serde(default)]
  pub min_platform: u32,
}

/// Where uploaded artifacts live and how their public URLs are minted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
  pub root: PathBuf,
  pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
  #[serde(default = "default_store_path")]
  pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("releases.json")
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      path: default_store_path(),
    }
  }
}

/// Default sweep thresholds per tier, as age strings like "4w" or "30d"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetentionConfig {
  #[serde(default)]
  pub preview: Option<String>,
  #[serde(default)]
  pub snapshot: Option<String>,
}

impl DepotConfig {
  /// Find config file in search order: depot.toml, .depot.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = [root.join("depot.toml"), root.join(".depot.toml")];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load and validate config
  pub fn load(root: &Path) -> DepotResult<Self> {
    let config_path = Self::find_config_path(root).ok_or(DepotError::Config(ConfigError::NotFound {
      root: root.to_path_buf(),
    }))?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let mut config: DepotConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.root = root.to_path_buf();
    config.validate()?;

    Ok(config)
  }

  /// Save config (used by `depot init` for the starter file)
  pub fn save(&self, root: &Path) -> DepotResult<()> {
    let config_path = root.join("depot.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(())
  }

  /// Check required fields beyond what deserialization enforces
  pub fn validate(&self) -> DepotResult<()> {
    fn required(field: &str, value: &str) -> DepotResult<()> {
      if value.trim().is_empty() {
        return Err(DepotError::Config(ConfigError::MissingField { field: field.into() }));
      }
      Ok(())
    }

    required("upstream.owner", &self.upstream.owner)?;
    required("upstream.repo", &self.upstream.repo)?;
    required("artifact.file", &self.artifact.file)?;
    required("artifact.signature", &self.artifact.signature)?;
    required("storage.base_url", &self.storage.base_url)?;

    if self.build.command.is_empty() {
      return Err(DepotError::Config(ConfigError::MissingField {
        field: "build.command".into(),
      }));
    }

    if self.storage.base_url.ends_with('/') {
      return Err(DepotError::Config(ConfigError::Invalid {
        field: "storage.base_url".into(),
        reason: "must not end with '/'".into(),
      }));
    }

    let retention_fields = [
      ("retention.preview", &self.retention.preview),
      ("retention.snapshot", &self.retention.snapshot),
    ];
    for (field, value) in retention_fields {
      if let Some(age) = value {
        parse_age(age).map_err(|e| {
          DepotError::Config(ConfigError::Invalid {
            field: field.into(),
            reason: e.to_string(),
          })
        })?;
      }
    }

    Ok(())
  }

  /// Resolve a configured path against the config directory
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  pub fn store_path(&self) -> PathBuf {
    self.resolve(&self.store.path)
  }

  pub fn repository_path(&self) -> PathBuf {
    self.resolve(&self.repository.path)
  }

  pub fn storage_root(&self) -> PathBuf {
    self.resolve(&self.storage.root)
  }

  pub fn build_output_dir(&self) -> PathBuf {
    self.resolve(&self.build.output_dir)
  }

  /// A starter config for `depot init`
  pub fn starter(root: PathBuf) -> Self {
    Self {
      upstream: UpstreamConfig {
        owner: "example".to_string(),
        repo: "tool".to_string(),
      },
      repository: RepositoryConfig {
        path: PathBuf::from("workspace/repository"),
        branch: default_branch(),
      },
      build: BuildConfig {
        command: vec!["bin/tool".to_string(), "dist:package".to_string()],
        output_dir: PathBuf::from("workspace/snapshots"),
        smoke_args: Some(vec!["--version".to_string()]),
      },
      artifact: ArtifactConfig {
        file: "tool.phar".to_string(),
        signature: "tool.phar.sig".to_string(),
        min_platform: 0,
      },
      storage: StorageConfig {
        root: PathBuf::from("public/files"),
        base_url: "https://download.example.com".to_string(),
      },
      store: StoreConfig::default(),
      retention: RetentionConfig {
        preview: Some("4w".to_string()),
        snapshot: Some("8w".to_string()),
      },
      root,
    }
  }
}

/// Parse an age string like "12h", "30d" or "4w" into a duration
pub fn parse_age(spec: &str) -> DepotResult<Duration> {
  let spec = spec.trim();
  if spec.len() < 2 {
    return Err(DepotError::message(format!(
      "Invalid age '{}': expected <number><h|d|w>",
      spec
    )));
  }
  let (digits, unit) = spec.split_at(spec.len() - 1);

  let count: i64 = digits
    .parse()
    .map_err(|_| DepotError::message(format!("Invalid age '{}': expected <number><h|d|w>", spec)))?;
  if count <= 0 {
    return Err(DepotError::message(format!("Invalid age '{}': must be positive", spec)));
  }

  match unit {
    "h" => Ok(Duration::hours(count)),
    "d" => Ok(Duration::days(count)),
    "w" => Ok(Duration::weeks(count)),
    _ => Err(DepotError::message(format!(
      "Invalid age '{}': unit must be h, d or w",
      spec
    ))),
  }
}
