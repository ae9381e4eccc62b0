//! Helpers for classifying, resolving and fingerprinting asset references.
//!
//! The responsibilities are split into focused submodules so that external-URL
//! detection, build-root resolution and URL construction can be tested independently of
//! the line scanner that drives them.

mod filters;
mod fingerprint;
mod resolve;

pub use filters::{ReferenceClass, classify_reference};
pub use fingerprint::{PATH_PREFIX_SEGMENT, fingerprint_reference, select_static_server};
pub use resolve::{ResolvedAsset, resolve_reference};
