//! Directory walking used to enumerate the files to fingerprint.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FingerprintError;
use crate::models::SourceFile;
use crate::selection::SourceInclusion;

/// Extensions processed when the configuration does not name any.
pub const DEFAULT_EXTENSIONS: &[&str] = &["html", "htm", "css"];

/// Walk `base_dir` collecting files with one of `extensions` that `selection` accepts.
///
/// Hidden entries are skipped. The result is sorted by relative path so runs process
/// files in a stable order.
pub fn collect_sources<S: SourceInclusion>(
  base_dir: &Path,
  extensions: &[String],
  selection: &S,
) -> Result<Vec<SourceFile>, FingerprintError> {
  let mut sources = Vec::new();
  collect_sources_recursively(
    base_dir,
    base_dir,
    Path::new(""),
    extensions,
    selection,
    &mut sources,
  )?;
  sources.sort();
  Ok(sources)
}

fn collect_sources_recursively<S: SourceInclusion>(
  base_dir: &Path,
  dir: &Path,
  relative_root: &Path,
  extensions: &[String],
  selection: &S,
  sources: &mut Vec<SourceFile>,
) -> Result<(), FingerprintError> {
  let discovery_error = |source: std::io::Error| FingerprintError::Discovery {
    path: dir.to_path_buf(),
    source,
  };

  for entry in fs::read_dir(dir).map_err(discovery_error)? {
    let entry = entry.map_err(discovery_error)?;
    let file_name = entry.file_name();
    let name_str = file_name.to_string_lossy();
    if name_str.starts_with('.') {
      continue;
    }

    let next_relative = if relative_root.as_os_str().is_empty() {
      PathBuf::from(&file_name)
    } else {
      relative_root.join(&file_name)
    };

    let file_type = entry.file_type().map_err(discovery_error)?;
    if file_type.is_dir() {
      collect_sources_recursively(
        base_dir,
        &entry.path(),
        &next_relative,
        extensions,
        selection,
        sources,
      )?;
    } else if file_type.is_file() && has_extension(&next_relative, extensions) {
      let rel_path_str = next_relative.to_string_lossy().replace('\\', "/");
      if selection.is_included(&rel_path_str) {
        sources.push(SourceFile::new(base_dir, next_relative));
      }
    }
  }

  Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
  let Some(extension) = path.extension().and_then(|value| value.to_str()) else {
    return false;
  };

  extensions
    .iter()
    .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(extension))
}

/// Default extension list as owned strings.
pub fn default_extensions() -> Vec<String> {
  DEFAULT_EXTENSIONS.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::selection::{IncludeAll, SourceSelection};
  use tempfile::tempdir;

  fn relative_paths(sources: &[SourceFile]) -> Vec<String> {
    sources.iter().map(SourceFile::display_path).collect()
  }

  #[test]
  fn collects_matching_files_recursively_in_sorted_order() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pages/nested")).unwrap();
    fs::create_dir_all(root.join("css")).unwrap();
    fs::write(root.join("index.HTML"), "").unwrap();
    fs::write(root.join("pages/nested/about.htm"), "").unwrap();
    fs::write(root.join("css/site.css"), "").unwrap();
    fs::write(root.join("css/logo.png"), "").unwrap();

    let sources = collect_sources(root, &default_extensions(), &IncludeAll).unwrap();

    assert_eq!(relative_paths(&sources), vec![
      "css/site.css".to_string(),
      "index.HTML".to_string(),
      "pages/nested/about.htm".to_string(),
    ]);
    assert!(sources.iter().all(|source| source.base_dir == root));
  }

  #[test]
  fn skips_hidden_entries() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::write(root.join(".cache/page.html"), "").unwrap();
    fs::write(root.join(".draft.html"), "").unwrap();
    fs::write(root.join("index.html"), "").unwrap();

    let sources = collect_sources(root, &default_extensions(), &IncludeAll).unwrap();
    assert_eq!(relative_paths(&sources), vec!["index.html".to_string()]);
  }

  #[test]
  fn applies_selection_rules() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("vendor")).unwrap();
    fs::write(root.join("vendor/lib.html"), "").unwrap();
    fs::write(root.join("index.html"), "").unwrap();

    let selection = SourceSelection::new(Vec::<String>::new(), vec!["vendor".to_string()]);
    let sources = collect_sources(root, &default_extensions(), &selection).unwrap();
    assert_eq!(relative_paths(&sources), vec!["index.html".to_string()]);
  }

  #[test]
  fn accepts_extensions_with_leading_dots() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("page.jsp"), "").unwrap();

    let sources = collect_sources(dir.path(), &[".jsp".to_string()], &IncludeAll).unwrap();
    assert_eq!(sources.len(), 1);
  }

  #[test]
  fn missing_base_directory_is_a_discovery_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let err = collect_sources(&missing, &default_extensions(), &IncludeAll).unwrap_err();
    assert!(matches!(err, FingerprintError::Discovery { .. }));
  }
}
