use std::borrow::Cow;

use crate::checksum::Checksum;
use crate::policy::{RewritePolicy, UrlLayout};

/// Segment that marks a path-prefix fingerprint; the serving layer strips `/a/<checksum>`.
pub const PATH_PREFIX_SEGMENT: &str = "/a/";

/// Build the fingerprinted form of a local reference.
///
/// The layout (query string or path prefix) is applied first, then the optional
/// static-server host. The host is a pure function of the checksum so a given file is
/// always served from the same shard.
pub fn fingerprint_reference(reference: &str, checksum: Checksum, policy: &RewritePolicy) -> String {
    let fingerprinted = match policy.layout {
        UrlLayout::Query => format!("{reference}?{checksum}"),
        UrlLayout::PathPrefix => format!(
            "{PATH_PREFIX_SEGMENT}{checksum}{}",
            with_leading_slash(reference)
        ),
    };

    match select_static_server(checksum, &policy.static_servers) {
        Some(host) => format!("http://{host}{}", with_leading_slash(&fingerprinted)),
        None => fingerprinted,
    }
}

/// Pick the shard for `checksum`: `servers[checksum % servers.len()]`.
pub fn select_static_server(checksum: Checksum, servers: &[String]) -> Option<&str> {
    if servers.is_empty() {
        return None;
    }

    let index = u64::from(checksum.value()) % servers.len() as u64;
    servers.get(index as usize).map(String::as_str)
}

fn with_leading_slash(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}
