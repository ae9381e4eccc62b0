use std::path::{Path, PathBuf};

use super::fingerprint::PATH_PREFIX_SEGMENT;
use crate::policy::UrlLayout;

/// A local reference paired with the file it names below the build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset<'a> {
    /// Reference exactly as captured from the line.
    pub reference: &'a str,
    /// Absolute (or root-relative) path of the referenced file.
    pub path: PathBuf,
}

impl ResolvedAsset<'_> {
    /// Whether the referenced file is present on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Resolve a local reference against the build root.
///
/// References are always rooted at `build_root`, not at the file containing them. A
/// trailing `?query` or `#fragment` is not part of the file name and is ignored, and
/// backslashes are normalised so Windows-authored paths resolve the same way. Under the
/// path-prefix layout, leading `/a/<checksum>` segments are dropped the way the serving
/// layer drops them, so output from an earlier run still resolves.
pub fn resolve_reference<'a>(
    build_root: &Path,
    reference: &'a str,
    layout: UrlLayout,
) -> ResolvedAsset<'a> {
    let path_part = reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference)
        .replace('\\', "/");

    let path_part = match layout {
        UrlLayout::PathPrefix => strip_path_prefixes(&path_part),
        UrlLayout::Query => path_part.as_str(),
    };

    let mut path = build_root.to_path_buf();
    for segment in path_part.split('/').filter(|segment| !segment.is_empty()) {
        path.push(segment);
    }

    ResolvedAsset { reference, path }
}

fn strip_path_prefixes(mut path: &str) -> &str {
    while let Some(rest) = path.strip_prefix(PATH_PREFIX_SEGMENT) {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !rest[digits..].starts_with('/') {
            break;
        }
        path = &rest[digits..];
    }
    path
}
