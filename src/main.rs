mod artifact;
mod commands;
mod core;
mod release;
mod remote;
mod storage;

use crate::core::error::{DepotError, print_error};
use crate::release::Stability;
use clap::{Parser, Subcommand};

/// Track and publish releases across stable, preview and snapshot channels
#[derive(Parser)]
#[command(name = "depot")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct DepotCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Initialize depot configuration and an empty release store
  Init {
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },

  /// Sync stable releases from the upstream release list
  Sync,

  /// Create and clean up preview/snapshot releases
  #[command(subcommand)]
  Release(ReleaseCommands),

  /// Show the latest version per stability tier
  Versions {
    /// Output versions in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Resolve a version or stability tier to a download URL
  #[command(disable_version_flag = true)]
  Resolve {
    /// Version string, or one of: stable, preview, snapshot
    version: String,
    /// Which tracked file to resolve (artifact or signature name)
    file: String,
  },
}

#[derive(Subcommand)]
enum ReleaseCommands {
  /// Build and record a release from the anchor week's last commit
  Create {
    /// Tier to build: preview (this week) or snapshot (previous week)
    #[arg(value_enum)]
    stability: Stability,
  },

  /// Delete releases older than the retention threshold
  Sweep {
    /// Tier to sweep
    #[arg(value_enum)]
    stability: Stability,
    /// Age threshold like 12h, 30d or 4w (default: [retention] in depot.toml)
    #[arg(long)]
    older_than: Option<String>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = DepotCli::parse();

  let result = match cli.command {
    Commands::Init { force } => commands::run_init(force),
    Commands::Sync => commands::run_sync(),
    Commands::Release(release_cmd) => match release_cmd {
      ReleaseCommands::Create { stability } => commands::run_create(stability),
      ReleaseCommands::Sweep { stability, older_than } => commands::run_sweep(stability, older_than),
    },
    Commands::Versions { json } => commands::run_versions(json),
    Commands::Resolve { version, file } => commands::run_resolve(version, file),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: DepotError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
