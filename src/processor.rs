//! Fingerprinting orchestrator that rewrites whole files and aggregates statistics.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::FingerprintError;
use crate::models::{FileFailure, FileReport, ReferenceEvent, RunStatistics, RunSummary, SourceFile};
use crate::policy::RewritePolicy;
use crate::scanner::{AssetSource, FsAssetSource, LineScanner};

/// Line terminator written after every line of rewritten output.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Line terminator written after every line of rewritten output.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// High-level helper that fingerprints asset references across a set of files.
pub struct Fingerprinter<S = FsAssetSource> {
  policy: RewritePolicy,
  build_root: PathBuf,
  output_root: Option<PathBuf>,
  assets: S,
}

impl Fingerprinter<FsAssetSource> {
  /// Create a fingerprinter resolving references below `build_root` on the filesystem.
  pub fn new(policy: RewritePolicy, build_root: impl Into<PathBuf>) -> Self {
    Self::with_assets(policy, build_root, FsAssetSource)
  }
}

impl<S: AssetSource> Fingerprinter<S> {
  /// Create a fingerprinter that looks assets up through `assets`.
  pub fn with_assets(policy: RewritePolicy, build_root: impl Into<PathBuf>, assets: S) -> Self {
    Self {
      policy,
      build_root: build_root.into(),
      output_root: None,
      assets,
    }
  }

  /// Write rewritten files below `output_root` instead of replacing them in place.
  pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
    self.output_root = Some(output_root.into());
    self
  }

  /// Fingerprint every file in order, downgrading per-file failures to statistics.
  pub fn run<I>(&self, sources: I) -> RunSummary
  where
    I: IntoIterator<Item = SourceFile>,
  {
    let mut summary = RunSummary::default();

    for source in sources {
      match self.process_file(&source) {
        Ok(report) => {
          summary.statistics += report.statistics;
          summary.reports.push(report);
        }
        Err(err) => {
          warn!(file = %source.display_path(), error = %err, "failed to fingerprint file");
          summary.statistics += RunStatistics {
            files_scanned: 1,
            files_failed: 1,
            ..RunStatistics::default()
          };
          summary.failures.push(FileFailure {
            source,
            message: err.to_string(),
          });
        }
      }
    }

    info!(
      fingerprinted = summary.statistics.fingerprinted,
      external = summary.statistics.external_skipped,
      not_found = summary.statistics.not_found,
      files = summary.statistics.files_scanned,
      failed = summary.statistics.files_failed,
      "FINISHED: {}",
      summary.statistics
    );

    summary
  }

  /// Rewrite a single file and report what happened to each reference in it.
  pub fn process_file(&self, source: &SourceFile) -> Result<FileReport, FingerprintError> {
    let source_path = source.path();
    info!(file = %source.display_path(), "scanning");

    let content = fs::read(&source_path).map_err(|source| FingerprintError::Read {
      path: source_path.clone(),
      source,
    })?;
    let lines = split_lines(&content);
    let scanner = LineScanner::new(&self.policy, &self.build_root, &self.assets);

    let mut rewritten = Vec::with_capacity(lines.len());
    let mut events = Vec::new();
    let mut lines_rewritten = 0;

    for line in lines {
      let scan = scanner.scan(line);
      for event in &scan.events {
        log_event(event);
      }
      if scan.line != line {
        lines_rewritten += 1;
      }
      events.extend(scan.events);
      rewritten.push(scan.line);
    }

    let destination = source.destination(self.output_root.as_deref());
    write_lines_atomically(&source_path, &destination, &rewritten)?;
    debug!(
      file = %source.display_path(),
      destination = %destination.display(),
      lines_rewritten,
      "wrote"
    );

    let mut statistics = RunStatistics::from_events(&events);
    statistics.files_scanned = 1;

    Ok(FileReport {
      source: source.clone(),
      destination,
      events,
      lines_rewritten,
      statistics,
    })
  }
}

fn log_event(event: &ReferenceEvent) {
  match event {
    ReferenceEvent::Fingerprinted {
      kind, rewritten, ..
    } => info!(%kind, "  added fingerprint {rewritten}"),
    ReferenceEvent::External { kind, reference } => {
      info!(%kind, "  reference is a url {reference}")
    }
    ReferenceEvent::NotFound { kind, path, .. } => {
      warn!(%kind, "  referenced file not found {}", path.display())
    }
  }
}

/// Split file content into lines without decoding it.
///
/// Lines end at `\n` with an optional `\r` before it. A final terminator does not start
/// an extra empty line.
fn split_lines(content: &[u8]) -> Vec<&[u8]> {
  let mut lines: Vec<&[u8]> = content.split(|byte| *byte == b'\n').collect();
  if content.is_empty() || content.ends_with(b"\n") {
    lines.pop();
  }

  lines
    .into_iter()
    .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
    .collect()
}

/// Write `lines` to a temporary file beside `destination`, then rename it into place.
///
/// A failure part-way leaves the previous destination content intact. Permissions of the
/// source file are carried over so served files keep their mode.
fn write_lines_atomically(
  source_path: &Path,
  destination: &Path,
  lines: &[Vec<u8>],
) -> Result<(), FingerprintError> {
  let write_error = |source: io::Error| FingerprintError::Write {
    path: destination.to_path_buf(),
    source,
  };

  let parent = match destination.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent).map_err(write_error)?;

  let mut temp = NamedTempFile::new_in(parent).map_err(write_error)?;
  {
    let mut writer = BufWriter::new(temp.as_file_mut());
    for line in lines {
      writer.write_all(line).map_err(write_error)?;
      writer
        .write_all(LINE_ENDING.as_bytes())
        .map_err(write_error)?;
    }
    writer.flush().map_err(write_error)?;
  }

  if let Ok(metadata) = fs::metadata(source_path) {
    fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_error)?;
  }

  temp
    .persist(destination)
    .map_err(|err| write_error(err.error))?;
  Ok(())
}
