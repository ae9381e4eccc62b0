//! Data structures produced while fingerprinting a fileset.

use std::fmt;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::ReferenceKind;

/// Outcome of handling a single matched reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ReferenceEvent {
  /// The reference was rewritten with a fingerprint.
  Fingerprinted {
    /// Kind of reference that matched.
    kind: ReferenceKind,
    /// Reference as it appeared before rewriting.
    reference: String,
    /// Replacement written into the line.
    rewritten: String,
  },
  /// The reference is an absolute URL and was left untouched.
  External {
    /// Kind of reference that matched.
    kind: ReferenceKind,
    /// The external URL.
    reference: String,
  },
  /// The referenced file is missing or unreadable; the line was left untouched.
  NotFound {
    /// Kind of reference that matched.
    kind: ReferenceKind,
    /// Reference as it appeared in the line.
    reference: String,
    /// Path the reference resolved to.
    path: PathBuf,
  },
}

impl ReferenceEvent {
  /// Kind of reference the event concerns.
  pub fn kind(&self) -> ReferenceKind {
    match self {
      Self::Fingerprinted { kind, .. } | Self::External { kind, .. } | Self::NotFound { kind, .. } => {
        *kind
      }
    }
  }
}

/// Counters describing a fingerprinting run, or one file's contribution to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
  /// References rewritten with a fingerprint.
  pub fingerprinted: usize,
  /// References skipped because they are absolute URLs.
  pub external_skipped: usize,
  /// References whose target file was missing or unreadable.
  pub not_found: usize,
  /// Source files processed, including ones that failed.
  pub files_scanned: usize,
  /// Source files that could not be read or written.
  pub files_failed: usize,
}

impl RunStatistics {
  /// Count a single reference event.
  pub fn record(&mut self, event: &ReferenceEvent) {
    match event {
      ReferenceEvent::Fingerprinted { .. } => self.fingerprinted += 1,
      ReferenceEvent::External { .. } => self.external_skipped += 1,
      ReferenceEvent::NotFound { .. } => self.not_found += 1,
    }
  }

  /// Tally a sequence of events.
  pub fn from_events<'a>(events: impl IntoIterator<Item = &'a ReferenceEvent>) -> Self {
    let mut stats = Self::default();
    for event in events {
      stats.record(event);
    }
    stats
  }

  /// Whether any file failed during the run.
  pub fn has_failures(&self) -> bool {
    self.files_failed > 0
  }
}

impl AddAssign for RunStatistics {
  fn add_assign(&mut self, other: Self) {
    self.fingerprinted += other.fingerprinted;
    self.external_skipped += other.external_skipped;
    self.not_found += other.not_found;
    self.files_scanned += other.files_scanned;
    self.files_failed += other.files_failed;
  }
}

impl fmt::Display for RunStatistics {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Fingerprint: {}, External URLs: {}, Not found: {}, Files scanned: {}, Failed: {}",
      self.fingerprinted, self.external_skipped, self.not_found, self.files_scanned, self.files_failed
    )
  }
}

/// A file to process, as a base directory plus a path relative to it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SourceFile {
  /// Directory the relative path is anchored at.
  pub base_dir: PathBuf,
  /// Path of the file below `base_dir`.
  pub relative_path: PathBuf,
}

impl SourceFile {
  /// Describe `relative_path` below `base_dir`.
  pub fn new(base_dir: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
      relative_path: relative_path.into(),
    }
  }

  /// Full path of the file on disk.
  pub fn path(&self) -> PathBuf {
    self.base_dir.join(&self.relative_path)
  }

  /// Relative path rendered with forward slashes for logs and filters.
  pub fn display_path(&self) -> String {
    self.relative_path.to_string_lossy().replace('\\', "/")
  }

  /// Destination when rewritten output is mirrored under `output_root`.
  pub fn destination(&self, output_root: Option<&Path>) -> PathBuf {
    match output_root {
      Some(root) => root.join(&self.relative_path),
      None => self.path(),
    }
  }
}

/// Everything learned while processing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
  /// File that was processed.
  pub source: SourceFile,
  /// Path the rewritten content was written to.
  pub destination: PathBuf,
  /// Per-reference events in line order.
  pub events: Vec<ReferenceEvent>,
  /// Number of lines whose content changed.
  pub lines_rewritten: usize,
  /// This file's contribution to the run statistics.
  pub statistics: RunStatistics,
}

/// A file that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
  /// File that failed.
  pub source: SourceFile,
  /// Rendered error message.
  pub message: String,
}

/// Result of processing a whole fileset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
  /// Aggregated counters.
  pub statistics: RunStatistics,
  /// Reports for files that were rewritten successfully.
  pub reports: Vec<FileReport>,
  /// Files that failed, in processing order.
  pub failures: Vec<FileFailure>,
}
