//! Helpers used to filter which source files are fingerprinted.

use std::collections::BTreeSet;

/// Trait describing selection filters for source files.
pub trait SourceInclusion {
  /// Returns `true` when the file at `relative_path` (forward slashes) should be processed.
  fn is_included(&self, relative_path: &str) -> bool;
}

/// Include/exclude rules over paths relative to the base directory.
///
/// A rule matches a path equal to it or any path below it, so `vendor` excludes
/// `vendor/lib/index.html`. Exclusions win over inclusions, and an empty include list
/// includes everything.
#[derive(Debug, Clone, Default)]
pub struct SourceSelection {
  include: Option<BTreeSet<String>>,
  exclude: BTreeSet<String>,
}

impl SourceSelection {
  /// Build a selection from raw include and exclude rules.
  pub fn new(
    include: impl IntoIterator<Item = String>,
    exclude: impl IntoIterator<Item = String>,
  ) -> Self {
    let include = normalise_list(include);
    let exclude = normalise_list(exclude);

    Self {
      include: (!include.is_empty()).then_some(include),
      exclude,
    }
  }

  /// Determine whether a file should be processed.
  pub fn is_included(&self, relative_path: &str) -> bool {
    let candidate = relative_path.replace('\\', "/");
    let candidate = candidate.trim_start_matches("./").trim_matches('/');

    if self
      .exclude
      .iter()
      .any(|value| scope_matches(value, candidate))
    {
      return false;
    }

    match &self.include {
      Some(include) => include.iter().any(|value| scope_matches(value, candidate)),
      None => true,
    }
  }
}

impl SourceInclusion for SourceSelection {
  fn is_included(&self, relative_path: &str) -> bool {
    SourceSelection::is_included(self, relative_path)
  }
}

/// Accepts every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeAll;

impl SourceInclusion for IncludeAll {
  fn is_included(&self, _relative_path: &str) -> bool {
    true
  }
}

/// Convert a list of raw rules into a sorted, de-duplicated set.
///
/// Values are trimmed and empty entries are discarded to simplify downstream filtering logic.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| {
      value
        .trim()
        .replace('\\', "/")
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string()
    })
    .filter(|value| !value.is_empty())
    .collect()
}

fn scope_matches(rule: &str, candidate: &str) -> bool {
  if candidate == rule {
    return true;
  }

  candidate
    .strip_prefix(rule)
    .is_some_and(|suffix| suffix.starts_with('/'))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rules(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
  }

  #[test]
  fn defaults_to_including_all_files() {
    let selection = SourceSelection::default();
    assert!(selection.is_included("index.html"));
    assert!(IncludeAll.is_included("anything"));
  }

  #[test]
  fn excludes_directories_and_their_children() {
    let selection = SourceSelection::new(Vec::<String>::new(), rules(&["vendor", "", " drafts/ "]));

    assert!(!selection.is_included("vendor"));
    assert!(!selection.is_included("vendor/lib/index.html"));
    assert!(!selection.is_included("drafts/post.html"));
    assert!(selection.is_included("vendors.html"));
    assert!(selection.is_included("index.html"));
  }

  #[test]
  fn include_rules_restrict_to_their_scope() {
    let selection = SourceSelection::new(rules(&["pages"]), Vec::<String>::new());

    assert!(selection.is_included("pages/about.html"));
    assert!(!selection.is_included("index.html"));
  }

  #[test]
  fn exclusions_override_inclusions() {
    let selection = SourceSelection::new(rules(&["pages"]), rules(&["pages/legacy"]));

    assert!(selection.is_included("pages/about.html"));
    assert!(!selection.is_included("pages/legacy/old.html"));
  }

  #[test]
  fn normalises_separators_and_leading_dots() {
    let selection = SourceSelection::new(rules(&[".\\pages\\"]), Vec::<String>::new());
    assert!(selection.is_included("./pages/about.html"));
    assert!(selection.is_included("pages\\about.html"));
  }

  #[test]
  fn normalises_whitespace_and_duplicates() {
    let normalised: Vec<String> = normalise_list(rules(&["  A  ", "b", "A", "", "B"]))
      .into_iter()
      .collect();

    assert_eq!(normalised, vec![
      String::from("A"),
      String::from("B"),
      String::from("b")
    ]);
  }
}
