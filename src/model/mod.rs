//! Core data types for identifiers and scan results.
//!
//! - [`PackageIdentifier`] - A validated `name@version` release
//! - [`Source`] - Where evidence of a package was looked for
//! - [`ScanRecord`] - Per-identifier verdicts across all sources
//! - [`ScanReport`] - Complete scan results
//!
//! # Example
//!
//! ```
//! use nymc::{PackageIdentifier, ScanRecord, Source};
//!
//! let id = PackageIdentifier::parse("evil@1.0.0").unwrap();
//! let mut record = ScanRecord::new(id);
//! record.set(Source::Manifest, true);
//!
//! assert!(record.is_positive());
//! ```

mod identifier;
mod record;

pub use identifier::*;
pub use record::*;
