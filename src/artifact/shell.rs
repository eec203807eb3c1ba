//! Shell-command artifact producer
//!
//! Runs the configured build command inside the repository, appending
//! `--build-dir` and `--stability`, then verifies the expected output
//! files exist. When smoke arguments are configured the freshly built
//! artifact is executed with them; a non-zero exit fails the build.

use super::{ArtifactProducer, BuiltArtifact};
use crate::core::error::{ArtifactError, DepotResult, ResultExt};
use crate::release::Stability;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct ShellProducer {
  repo_path: PathBuf,
  command: Vec<String>,
  artifact_file: String,
  signature_file: String,
  smoke_args: Option<Vec<String>>,
}

impl ShellProducer {
  pub fn new(
    repo_path: PathBuf,
    command: Vec<String>,
    artifact_file: &str,
    signature_file: &str,
    smoke_args: Option<Vec<String>>,
  ) -> Self {
    Self {
      repo_path,
      command,
      artifact_file: artifact_file.to_string(),
      signature_file: signature_file.to_string(),
      smoke_args,
    }
  }

  fn run_build(&self, stability: Stability, output_dir: &Path) -> DepotResult<()> {
    let (program, leading_args) = self.command.split_first().expect("validated non-empty");

    // Relative programs (bin/tool) resolve against the repository.
    let program: PathBuf = if Path::new(program).is_relative() && program.contains('/') {
      self.repo_path.join(program)
    } else {
      PathBuf::from(program)
    };

    let output = Command::new(&program)
      .args(leading_args)
      .arg(format!("--build-dir={}", output_dir.display()))
      .arg(format!("--stability={}", stability))
      .current_dir(&self.repo_path)
      .output()
      .with_context(|| format!("Failed to execute build command {}", program.display()))?;

    if !output.status.success() {
      return Err(
        ArtifactError::BuildFailed {
          command: format!("{} {}", program.display(), leading_args.join(" ")),
          stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into(),
      );
    }

    Ok(())
  }

  fn smoke_test(&self, artifact: &Path) -> DepotResult<()> {
    let Some(args) = &self.smoke_args else {
      return Ok(());
    };

    let output = Command::new(artifact)
      .args(args)
      .current_dir(&self.repo_path)
      .output()
      .with_context(|| format!("Failed to execute built artifact {}", artifact.display()))?;

    if !output.status.success() {
      return Err(
        ArtifactError::SmokeTestFailed {
          command: format!("{} {}", artifact.display(), args.join(" ")),
          stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into(),
      );
    }

    Ok(())
  }
}

impl ArtifactProducer for ShellProducer {
  fn build(&self, _commit_sha: &str, stability: Stability, output_dir: &Path) -> DepotResult<BuiltArtifact> {
    std::fs::create_dir_all(output_dir)
      .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    self.run_build(stability, output_dir)?;

    let artifact = output_dir.join(&self.artifact_file);
    let signature = output_dir.join(&self.signature_file);

    for path in [&artifact, &signature] {
      if !path.is_file() {
        return Err(ArtifactError::MissingOutput { path: path.clone() }.into());
      }
    }

    self.smoke_test(&artifact)?;

    Ok(BuiltArtifact { artifact, signature })
  }
}
