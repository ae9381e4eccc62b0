//! Line patterns recognising each kind of asset reference.

use std::fmt;
use std::sync::OnceLock;

use regex::bytes::Regex;
use serde::Serialize;

/// The four asset-linking syntaxes recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
  /// `<script ... src="...">`
  Script,
  /// `<img ... src="...">`
  Image,
  /// `<link ... href="...">`
  Stylesheet,
  /// `background(-image): url(...)`
  CssBackgroundImage,
}

impl ReferenceKind {
  /// Every kind, in the order the scanner applies them to a line.
  pub const ALL: [ReferenceKind; 4] = [
    ReferenceKind::Script,
    ReferenceKind::Image,
    ReferenceKind::Stylesheet,
    ReferenceKind::CssBackgroundImage,
  ];

  /// Short name used in log output.
  pub fn label(self) -> &'static str {
    match self {
      Self::Script => "script",
      Self::Image => "image",
      Self::Stylesheet => "stylesheet",
      Self::CssBackgroundImage => "css-background-image",
    }
  }

  /// Whole-line pattern for this kind. Capture group 1 is the raw reference.
  ///
  /// Tag and attribute names match case-insensitively; the captured value keeps its case.
  /// Because the leading `.*` is greedy, the last matching attribute on a line wins.
  /// Patterns run over raw bytes with Unicode mode off, so text in any ASCII-compatible
  /// encoding matches.
  pub fn pattern(self) -> &'static Regex {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static IMAGE: OnceLock<Regex> = OnceLock::new();
    static STYLESHEET: OnceLock<Regex> = OnceLock::new();
    static CSS_BACKGROUND: OnceLock<Regex> = OnceLock::new();

    match self {
      Self::Script => SCRIPT.get_or_init(|| {
        Regex::new(r#"(?-u)^\s*<(?i:script)\s+.*(?i:src)\s*=\s*"([^"]*)".*$"#)
          .expect("invalid script regex")
      }),
      Self::Image => IMAGE.get_or_init(|| {
        Regex::new(r#"(?-u)^\s*<(?i:img)\s+.*(?i:src)\s*=\s*"([^"]*)".*$"#)
          .expect("invalid img regex")
      }),
      Self::Stylesheet => STYLESHEET.get_or_init(|| {
        Regex::new(r#"(?-u)^\s*<(?i:link)\s+.*(?i:href)\s*=\s*"([^"]*)".*$"#)
          .expect("invalid link regex")
      }),
      Self::CssBackgroundImage => CSS_BACKGROUND.get_or_init(|| {
        Regex::new(r#"(?-u)^.*background(?:-image)?[ ]*:.*url\(['"]?([^'")]*)['"]?\);?.*$"#)
          .expect("invalid background-image regex")
      }),
    }
  }

  /// Extract the raw reference from `line`, if the line matches this kind.
  pub fn capture(self, line: &[u8]) -> Option<&[u8]> {
    self
      .pattern()
      .captures(line)
      .and_then(|caps| caps.get(1))
      .map(|value| value.as_bytes())
  }
}

impl fmt::Display for ReferenceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[cfg(test)]
mod tests {
  use super::ReferenceKind;

  fn capture(kind: ReferenceKind, line: &str) -> Option<&str> {
    kind
      .capture(line.as_bytes())
      .map(|value| std::str::from_utf8(value).unwrap())
  }

  #[test]
  fn captures_script_sources_after_other_attributes() {
    let line = r#"  <script type="text/javascript" src= "/scripts/script.js"></script>"#;
    assert_eq!(capture(ReferenceKind::Script, line), Some("/scripts/script.js"));
  }

  #[test]
  fn tag_and_attribute_names_are_case_insensitive() {
    let line = r#"<SCRIPT SRC="/JS/App.js"></SCRIPT>"#;
    assert_eq!(capture(ReferenceKind::Script, line), Some("/JS/App.js"));

    let line = r#"<Img Alt="x" sRc="/images/Logo.GIF">"#;
    assert_eq!(capture(ReferenceKind::Image, line), Some("/images/Logo.GIF"));
  }

  #[test]
  fn captures_image_and_link_references() {
    let line = r#"<img alt="whatever" src="/images/img.gif"></img>"#;
    assert_eq!(capture(ReferenceKind::Image, line), Some("/images/img.gif"));

    let line = r#"<link rel="stylesheet" href="style.css" media="all"/>"#;
    assert_eq!(capture(ReferenceKind::Stylesheet, line), Some("style.css"));
  }

  #[test]
  fn captures_css_background_urls() {
    assert_eq!(
      capture(ReferenceKind::CssBackgroundImage, "background-image:url(/images/test.jpg);"),
      Some("/images/test.jpg")
    );
    assert_eq!(
      capture(
        ReferenceKind::CssBackgroundImage,
        r#"  .hero { background: #fff url("/img/hero.png") no-repeat; }"#
      ),
      Some("/img/hero.png")
    );
    assert_eq!(
      capture(ReferenceKind::CssBackgroundImage, "background-image : url('/a.png'); color: red;"),
      Some("/a.png")
    );
  }

  #[test]
  fn tags_must_open_the_line() {
    let line = r#"<p>text</p><img src="/a.png">"#;
    assert_eq!(capture(ReferenceKind::Image, line), None);
  }

  #[test]
  fn kinds_do_not_cross_match() {
    let line = r#"<img src="/a.png">"#;
    assert_eq!(capture(ReferenceKind::Script, line), None);
    assert_eq!(capture(ReferenceKind::Stylesheet, line), None);
    assert_eq!(capture(ReferenceKind::CssBackgroundImage, line), None);
  }

  #[test]
  fn matches_lines_that_are_not_utf8() {
    let line = b"<img alt=\"caf\xe9\" src=\"/img/cafe.png\">";
    assert_eq!(ReferenceKind::Image.capture(line), Some(&b"/img/cafe.png"[..]));

    let line = b"\xe9t\xe9 { background: url(/img/summer.png) }";
    assert_eq!(
      ReferenceKind::CssBackgroundImage.capture(line),
      Some(&b"/img/summer.png"[..])
    );
  }

  #[test]
  fn greedy_prefix_picks_last_attribute() {
    let line = r#"<script src="/a.js"></script><script src="/b.js"></script>"#;
    assert_eq!(capture(ReferenceKind::Script, line), Some("/b.js"));
  }
}
