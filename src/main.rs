//! asset-fingerprint CLI
//!
//! Rewrites asset references in HTML and CSS files with content fingerprints.
//! Prints a summary line (or JSON) and exits non-zero when any file failed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use asset_fingerprint::discovery::collect_sources;
use asset_fingerprint::policy::parse_static_servers;
use asset_fingerprint::{Fingerprinter, FingerprintConfig, RunSummary, SourceFile, UrlLayout};

#[derive(Parser)]
#[command(name = "asset-fingerprint")]
#[command(about = "Embed content fingerprints into static asset URLs")]
struct Cli {
  /// Directory containing the files to rewrite
  base_dir: PathBuf,

  /// Files to rewrite, relative to the base directory (default: walk the base directory)
  files: Vec<PathBuf>,

  /// Configuration file (default: <BASE_DIR>/fingerprint.config.json)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Root that asset references resolve against
  #[arg(long)]
  build_path: Option<PathBuf>,

  /// Write rewritten files here instead of in place
  #[arg(short, long)]
  output_dir: Option<PathBuf>,

  /// Leave <script src> references alone
  #[arg(long)]
  no_script: bool,

  /// Leave <img src> references alone
  #[arg(long)]
  no_image: bool,

  /// Leave <link href> references alone
  #[arg(long)]
  no_stylesheet: bool,

  /// Leave CSS background-image references alone
  #[arg(long)]
  no_css_images: bool,

  /// Use /a/<checksum>/path URLs instead of path?<checksum>
  #[arg(long)]
  path_prefix: bool,

  /// Comma separated static hosts to shard asset URLs across
  #[arg(long)]
  static_servers: Option<String>,

  /// Print the summary as JSON
  #[arg(long)]
  json: bool,

  /// Also log debug detail such as where each file was written
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_max_level(log_level(cli.verbose))
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  match run(cli) {
    Ok(summary) if summary.statistics.has_failures() => ExitCode::FAILURE,
    Ok(_) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn log_level(verbose: bool) -> Level {
  if verbose { Level::DEBUG } else { Level::INFO }
}

fn run(cli: Cli) -> Result<RunSummary> {
  let config = match &cli.config {
    Some(path) => FingerprintConfig::load_from_path(path)?,
    None => FingerprintConfig::discover(&cli.base_dir)?,
  };

  let mut policy = config.to_policy();
  policy.process_script &= !cli.no_script;
  policy.process_image &= !cli.no_image;
  policy.process_stylesheet &= !cli.no_stylesheet;
  policy.process_css_background_image &= !cli.no_css_images;
  if cli.path_prefix {
    policy.layout = UrlLayout::PathPrefix;
  }
  if let Some(servers) = &cli.static_servers {
    policy.static_servers = parse_static_servers(servers);
  }

  let build_root = match &cli.build_path {
    Some(path) => path.clone(),
    None => config.build_root(&cli.base_dir),
  };
  let output_root = match &cli.output_dir {
    Some(path) => Some(path.clone()),
    None => config.output_root(&cli.base_dir),
  };

  let selection = config.to_selection();
  let sources = if cli.files.is_empty() {
    collect_sources(&cli.base_dir, &config.extensions, &selection)
      .with_context(|| format!("failed to list files in {}", cli.base_dir.display()))?
  } else {
    cli
      .files
      .iter()
      .filter(|file| selection.is_included(&file.to_string_lossy()))
      .map(|file| SourceFile::new(&cli.base_dir, file))
      .collect()
  };

  let mut fingerprinter = Fingerprinter::new(policy, build_root);
  if let Some(output_root) = output_root {
    fingerprinter = fingerprinter.with_output_root(output_root);
  }

  let summary = fingerprinter.run(sources);

  if cli.json {
    let rendered =
      serde_json::to_string_pretty(&summary).context("failed to serialise run summary")?;
    println!("{rendered}");
  } else {
    for failure in &summary.failures {
      eprintln!("failed: {}", failure.message);
    }
    println!("{}", summary.statistics);
  }

  Ok(summary)
}
