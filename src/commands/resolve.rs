//! Resolve command implementation

use crate::commands::load_config;
use crate::core::error::{DepotError, DepotResult};
use crate::release::engine::resolve_download_url;
use crate::release::{FileKind, ReleaseStore};

/// Run the resolve command
pub fn run_resolve(version: String, file: String) -> DepotResult<()> {
  let config = load_config()?;
  let store = ReleaseStore::load(&config.store_path())?;

  let kind = if file == config.artifact.file {
    FileKind::Artifact
  } else if file == config.artifact.signature {
    FileKind::Signature
  } else {
    return Err(DepotError::with_help(
      format!("Unknown download file '{}'", file),
      format!(
        "Tracked files are '{}' and '{}'.",
        config.artifact.file, config.artifact.signature
      ),
    ));
  };

  match resolve_download_url(&store, &version, kind) {
    Some(url) => {
      println!("{}", url);
      Ok(())
    }
    None => Err(DepotError::message(format!(
      "No {} download for version '{}'",
      file, version
    ))),
  }
}
