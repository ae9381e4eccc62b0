//! URL rewriting policy shared by the scanner and the fingerprint builder.

use crate::scanner::ReferenceKind;

/// Where the fingerprint is placed inside the rewritten URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlLayout {
  /// `/images/logo.png?123`.
  #[default]
  Query,
  /// `/a/123/images/logo.png`; needs a server rewrite rule stripping `/a/<checksum>`.
  PathPrefix,
}

/// Immutable per-run settings describing which references to rewrite and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePolicy {
  /// Rewrite `<script src="...">` references.
  pub process_script: bool,
  /// Rewrite `<img src="...">` references.
  pub process_image: bool,
  /// Rewrite `<link href="...">` references.
  pub process_stylesheet: bool,
  /// Rewrite CSS `background(-image): url(...)` references.
  pub process_css_background_image: bool,
  /// Placement of the fingerprint within the URL.
  pub layout: UrlLayout,
  /// Hosts used to shard asset URLs. Empty disables host prefixing.
  pub static_servers: Vec<String>,
}

impl Default for RewritePolicy {
  fn default() -> Self {
    Self {
      process_script: true,
      process_image: true,
      process_stylesheet: true,
      process_css_background_image: true,
      layout: UrlLayout::Query,
      static_servers: Vec::new(),
    }
  }
}

impl RewritePolicy {
  /// Whether references of `kind` should be rewritten.
  pub fn is_enabled(&self, kind: ReferenceKind) -> bool {
    match kind {
      ReferenceKind::Script => self.process_script,
      ReferenceKind::Image => self.process_image,
      ReferenceKind::Stylesheet => self.process_stylesheet,
      ReferenceKind::CssBackgroundImage => self.process_css_background_image,
    }
  }

  /// Replace the static server list from a comma separated string.
  pub fn with_static_servers(mut self, servers: &str) -> Self {
    self.static_servers = parse_static_servers(servers);
    self
  }
}

/// Split a comma separated host list, dropping whitespace, `http://` prefixes and empty entries.
pub fn parse_static_servers(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(|entry| {
      entry
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace("http://", "")
    })
    .filter(|entry| !entry.is_empty())
    .collect()
}
