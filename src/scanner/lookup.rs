//! Access to referenced asset files.

use std::io;

use crate::asset_paths::ResolvedAsset;
use crate::checksum::{Checksum, checksum_file};

/// What the scanner learned about a resolved asset path.
#[derive(Debug)]
pub enum AssetLookup {
  /// The file exists and its content hashed to this checksum.
  Found(Checksum),
  /// Nothing exists at the path.
  Missing,
  /// Something exists at the path but could not be read.
  Unreadable(io::Error),
}

/// Source of checksums for resolved asset paths.
pub trait AssetSource {
  /// Check `asset` for existence and checksum its content.
  fn lookup(&self, asset: &ResolvedAsset<'_>) -> AssetLookup;
}

/// Reads assets straight from the filesystem, hashing each one afresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetSource;

impl AssetSource for FsAssetSource {
  fn lookup(&self, asset: &ResolvedAsset<'_>) -> AssetLookup {
    if !asset.exists() {
      return AssetLookup::Missing;
    }

    match checksum_file(&asset.path) {
      Ok(checksum) => AssetLookup::Found(checksum),
      Err(err) => AssetLookup::Unreadable(err),
    }
  }
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
  fn lookup(&self, asset: &ResolvedAsset<'_>) -> AssetLookup {
    (**self).lookup(asset)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asset_paths::resolve_reference;
  use crate::policy::UrlLayout;
  use std::fs;
  use std::path::Path;
  use tempfile::tempdir;

  fn lookup(root: &Path, reference: &str) -> AssetLookup {
    FsAssetSource.lookup(&resolve_reference(root, reference, UrlLayout::Query))
  }

  #[test]
  fn filesystem_source_hashes_existing_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.js"), "123456789").unwrap();

    match lookup(dir.path(), "/a.js") {
      AssetLookup::Found(checksum) => assert_eq!(checksum.value(), 0xCBF4_3926),
      other => panic!("unexpected lookup result: {other:?}"),
    }
  }

  #[test]
  fn filesystem_source_reports_missing_files() {
    let dir = tempdir().unwrap();
    assert!(matches!(
      lookup(dir.path(), "missing.css"),
      AssetLookup::Missing
    ));
  }

  #[cfg(unix)]
  #[test]
  fn directories_exist_but_cannot_be_hashed() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("img")).unwrap();
    assert!(matches!(lookup(dir.path(), "/img"), AssetLookup::Unreadable(_)));
  }
}
