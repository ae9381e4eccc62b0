//! Error types surfaced by the fingerprinting pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a single file (or the configuration) from being processed.
///
/// Missing or external asset references are not errors; they are reported as
/// [`crate::models::ReferenceEvent`]s instead.
#[derive(Debug, Error)]
pub enum FingerprintError {
  /// The source file could not be opened or decoded line by line.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
  /// The rewritten content could not be written to its destination.
  #[error("failed to write {}: {source}", .path.display())]
  Write {
    /// Destination path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
  /// The configuration file exists but could not be read or parsed.
  #[error("failed to load configuration {}: {source}", .path.display())]
  Config {
    /// Path of the configuration file.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Walking the base directory for source files failed.
  #[error("failed to scan {}: {source}", .path.display())]
  Discovery {
    /// Directory that could not be listed.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
}

impl FingerprintError {
  /// Path the failure relates to.
  pub fn path(&self) -> &PathBuf {
    match self {
      Self::Read { path, .. }
      | Self::Write { path, .. }
      | Self::Config { path, .. }
      | Self::Discovery { path, .. } => path,
    }
  }
}
