#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod checksum;
pub mod config;
pub mod discovery;
pub mod error;
pub mod models;
pub mod policy;
pub mod processor;
pub mod scanner;
pub mod selection;

pub use checksum::Checksum;
pub use config::FingerprintConfig;
pub use error::FingerprintError;
pub use models::{FileReport, ReferenceEvent, RunStatistics, RunSummary, SourceFile};
pub use policy::{RewritePolicy, UrlLayout};
pub use processor::Fingerprinter;
pub use scanner::{LineScan, LineScanner, ReferenceKind};
pub use selection::{SourceInclusion, SourceSelection};
