use regex::Regex;

/// Result of classifying a captured reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceClass {
    /// Absolute URL served from elsewhere; never resolved or fingerprinted.
    External,
    /// Path that should exist below the build root.
    Local,
}

fn external_reference_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            // Both the case-insensitive scheme and the protocol-relative form count as
            // external; neither can name a file below the build root.
            vec![
                Regex::new(r"(?i)https?://[-\w.]+(:\d+)?(/([\w/.]*(\?\S+)?)?)?")
                    .expect("invalid absolute URL regex"),
                Regex::new(r"^//[-\w.]+").expect("invalid protocol-relative regex"),
            ]
        })
        .as_slice()
}

/// Decide whether a captured reference points at an external URL or a local file.
///
/// An absolute `http(s)://` URL anywhere in the value makes it external, as does a
/// protocol-relative `//host/...` prefix. Everything else is treated as local and is
/// resolved against the build root by the caller. No filesystem access happens here.
pub fn classify_reference(value: &str) -> ReferenceClass {
    if external_reference_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value))
    {
        ReferenceClass::External
    } else {
        ReferenceClass::Local
    }
}

#[cfg(test)]
mod tests {
    use super::{ReferenceClass, classify_reference};

    #[test]
    fn absolute_urls_are_external() {
        assert_eq!(
            classify_reference("https://cdn.example.com/a.png"),
            ReferenceClass::External
        );
        assert_eq!(
            classify_reference("http://localhost:8080/js/app.js?x=1"),
            ReferenceClass::External
        );
        assert_eq!(
            classify_reference("HTTP://EXAMPLE.COM"),
            ReferenceClass::External
        );
    }

    #[test]
    fn protocol_relative_urls_are_external() {
        assert_eq!(
            classify_reference("//cdn.example.com/lib.js"),
            ReferenceClass::External
        );
    }

    #[test]
    fn embedded_urls_mark_the_reference_external() {
        assert_eq!(
            classify_reference("/proxy?target=http://example.com/x.js"),
            ReferenceClass::External
        );
    }

    #[test]
    fn site_paths_are_local() {
        assert_eq!(classify_reference("/images/test.jpg"), ReferenceClass::Local);
        assert_eq!(classify_reference("css/site.css"), ReferenceClass::Local);
        assert_eq!(classify_reference("../img/http.png"), ReferenceClass::Local);
    }
}
