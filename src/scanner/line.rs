//! Rewrites the asset references found on a single line of text.

use std::path::Path;

use crate::asset_paths::{ReferenceClass, classify_reference, fingerprint_reference, resolve_reference};
use crate::models::ReferenceEvent;
use crate::policy::RewritePolicy;
use crate::scanner::lookup::{AssetLookup, AssetSource};
use crate::scanner::patterns::ReferenceKind;

/// A line after scanning, with one event per matched reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScan {
  /// Line bytes after rewriting; identical to the input when nothing changed.
  pub line: Vec<u8>,
  /// Events in the order the kinds were applied.
  pub events: Vec<ReferenceEvent>,
}

impl LineScan {
  /// Whether any reference on the line was rewritten.
  pub fn is_rewritten(&self) -> bool {
    self
      .events
      .iter()
      .any(|event| matches!(event, ReferenceEvent::Fingerprinted { .. }))
  }
}

/// Applies the reference patterns to lines, one kind after another.
///
/// Kinds run in the fixed order of [`ReferenceKind::ALL`], each against the line as left
/// by the previous kind. Each kind rewrites at most one reference per line, and an
/// already fingerprinted reference still matches, so scanning the output again appends a
/// second fingerprint.
///
/// Lines are raw bytes in whatever ASCII-compatible encoding the file uses. Only the
/// matched reference is rewritten; every other byte passes through untouched.
#[derive(Debug, Clone)]
pub struct LineScanner<'a, S> {
  policy: &'a RewritePolicy,
  build_root: &'a Path,
  assets: S,
}

impl<'a, S: AssetSource> LineScanner<'a, S> {
  /// Create a scanner resolving references below `build_root`.
  pub fn new(policy: &'a RewritePolicy, build_root: &'a Path, assets: S) -> Self {
    Self {
      policy,
      build_root,
      assets,
    }
  }

  /// Scan one line, returning the rewritten bytes and the events it produced.
  pub fn scan(&self, line: &[u8]) -> LineScan {
    let mut current = line.to_vec();
    let mut events = Vec::new();

    for kind in ReferenceKind::ALL {
      if !self.policy.is_enabled(kind) {
        continue;
      }

      if let Some((rewritten, event)) = self.apply(kind, &current) {
        if let Some(rewritten) = rewritten {
          current = rewritten;
        }
        events.push(event);
      }
    }

    LineScan {
      line: current,
      events,
    }
  }

  fn apply(&self, kind: ReferenceKind, line: &[u8]) -> Option<(Option<Vec<u8>>, ReferenceEvent)> {
    let raw = kind.capture(line)?;
    if raw.trim_ascii().is_empty() {
      return None;
    }

    // A reference in a legacy encoding cannot name a file we can address reliably.
    let Ok(reference) = std::str::from_utf8(raw) else {
      let reference = String::from_utf8_lossy(raw).into_owned();
      let path = resolve_reference(self.build_root, &reference, self.policy.layout).path;
      return Some((None, ReferenceEvent::NotFound {
        kind,
        reference,
        path,
      }));
    };

    if classify_reference(reference) == ReferenceClass::External {
      return Some((None, ReferenceEvent::External {
        kind,
        reference: reference.to_string(),
      }));
    }

    let resolved = resolve_reference(self.build_root, reference, self.policy.layout);
    let checksum = match self.assets.lookup(&resolved) {
      AssetLookup::Found(checksum) => checksum,
      AssetLookup::Missing | AssetLookup::Unreadable(_) => {
        return Some((None, ReferenceEvent::NotFound {
          kind,
          reference: reference.to_string(),
          path: resolved.path,
        }));
      }
    };

    let fingerprinted = fingerprint_reference(reference, checksum, self.policy);
    let rewritten = replace_first(line, raw, fingerprinted.as_bytes());
    Some((Some(rewritten), ReferenceEvent::Fingerprinted {
      kind,
      reference: reference.to_string(),
      rewritten: fingerprinted,
    }))
  }
}

/// Replace the first literal occurrence of a non-empty `needle` in `haystack`.
fn replace_first(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
  let Some(start) = haystack
    .windows(needle.len())
    .position(|window| window == needle)
  else {
    return haystack.to_vec();
  };

  let mut rewritten = Vec::with_capacity(haystack.len() + replacement.len());
  rewritten.extend_from_slice(&haystack[..start]);
  rewritten.extend_from_slice(replacement);
  rewritten.extend_from_slice(&haystack[start + needle.len()..]);
  rewritten
}
