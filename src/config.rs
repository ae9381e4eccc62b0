//! Project configuration loader describing which files to fingerprint and how.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::discovery::default_extensions;
use crate::error::FingerprintError;
use crate::policy::{RewritePolicy, UrlLayout, parse_static_servers};
use crate::selection::SourceSelection;

/// File name looked up in the base directory when no explicit configuration is given.
pub const DEFAULT_CONFIG_FILE: &str = "fingerprint.config.json";

/// Discoverable configuration for a fingerprinting run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FingerprintConfig {
  /// Root that asset references resolve against; defaults to the base directory.
  pub build_path: Option<String>,
  /// Directory receiving rewritten files instead of rewriting them in place.
  pub output_dir: Option<String>,
  /// Rewrite `<script src>` references.
  pub process_script: bool,
  /// Rewrite `<img src>` references.
  pub process_image: bool,
  /// Rewrite `<link href>` references.
  pub process_stylesheet: bool,
  /// Rewrite CSS `background-image: url(...)` references.
  pub process_css_images: bool,
  /// Place the fingerprint as a `/a/<checksum>` path prefix instead of a query string.
  pub path_prefix: bool,
  /// Comma separated list of static hosts used for sharding.
  pub static_servers: String,
  /// Path scopes (relative to the base directory) to process; empty means all.
  pub include: Vec<String>,
  /// Path scopes to skip.
  pub exclude: Vec<String>,
  /// File extensions scanned when walking the base directory.
  pub extensions: Vec<String>,
}

impl Default for FingerprintConfig {
  fn default() -> Self {
    Self {
      build_path: None,
      output_dir: None,
      process_script: true,
      process_image: true,
      process_stylesheet: true,
      process_css_images: true,
      path_prefix: false,
      static_servers: String::new(),
      include: Vec::new(),
      exclude: Vec::new(),
      extensions: default_extensions(),
    }
  }
}

impl FingerprintConfig {
  /// Load `fingerprint.config.json` from `base_dir`, falling back to defaults when absent.
  pub fn discover(base_dir: &Path) -> Result<Self, FingerprintError> {
    Self::load_from_path(base_dir.join(DEFAULT_CONFIG_FILE))
  }

  /// Read configuration from a specific JSON file.
  ///
  /// A missing file yields the defaults; an unreadable or malformed one is an error.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, FingerprintError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
      Err(err) => {
        return Err(FingerprintError::Read {
          path: path.to_path_buf(),
          source: err,
        });
      }
    };

    serde_json::from_str(&contents).map_err(|err| FingerprintError::Config {
      path: path.to_path_buf(),
      source: err,
    })
  }

  /// Rewrite policy described by this configuration.
  pub fn to_policy(&self) -> RewritePolicy {
    RewritePolicy {
      process_script: self.process_script,
      process_image: self.process_image,
      process_stylesheet: self.process_stylesheet,
      process_css_background_image: self.process_css_images,
      layout: if self.path_prefix {
        UrlLayout::PathPrefix
      } else {
        UrlLayout::Query
      },
      static_servers: parse_static_servers(&self.static_servers),
    }
  }

  /// Include/exclude rules for discovered source files.
  pub fn to_selection(&self) -> SourceSelection {
    SourceSelection::new(self.include.clone(), self.exclude.clone())
  }

  /// Root that references resolve against, relative paths anchored at `base_dir`.
  pub fn build_root(&self, base_dir: &Path) -> PathBuf {
    match &self.build_path {
      Some(path) => base_dir.join(path),
      None => base_dir.to_path_buf(),
    }
  }

  /// Output root for rewritten files, if rewriting is not in place.
  pub fn output_root(&self, base_dir: &Path) -> Option<PathBuf> {
    self.output_dir.as_ref().map(|path| base_dir.join(path))
  }
}
