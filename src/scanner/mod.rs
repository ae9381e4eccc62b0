//! Line-oriented detection and rewriting of asset references.

mod line;
mod lookup;
mod patterns;

pub use line::{LineScan, LineScanner};
pub use lookup::{AssetLookup, AssetSource, FsAssetSource};
pub use patterns::ReferenceKind;
