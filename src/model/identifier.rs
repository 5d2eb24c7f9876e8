use crate::error::{Result, ScanError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

static IDENTIFIER_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+@\d+(\.\d+){0,2}$").expect("valid identifier regex"));

/// A validated `name@version` release identifier.
///
/// The version is everything after the *last* `@`, so scoped names such as
/// `@scope/name@1.2.3` keep their leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentifier {
    raw: String,
    name: String,
    version: String,
}

impl PackageIdentifier {
    /// Parses and validates a single identifier.
    ///
    /// The version must be one to three dot-separated non-negative integers;
    /// ranges, tags and pre-release suffixes are rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use nymc::PackageIdentifier;
    ///
    /// let id = PackageIdentifier::parse("@scope/malware@1.0.0").unwrap();
    /// assert_eq!(id.name(), "@scope/malware");
    /// assert_eq!(id.version(), "1.0.0");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if !IDENTIFIER_FORMAT.is_match(raw) {
            return Err(ScanError::InvalidIdentifier(raw.to_string()));
        }

        let (name, version) = raw
            .rsplit_once('@')
            .ok_or_else(|| ScanError::InvalidIdentifier(raw.to_string()))?;

        // The name ends up as an npm/yarn argument.
        if name.starts_with('-') {
            return Err(ScanError::InvalidIdentifier(raw.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PackageIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Validates a configured package list, all or nothing.
///
/// Stops at the first malformed entry. On success the identifiers come back
/// in input order.
pub fn validate_packages<S: AsRef<str>>(packages: &[S]) -> Result<Vec<PackageIdentifier>> {
    packages
        .iter()
        .map(|raw| PackageIdentifier::parse(raw.as_ref()))
        .collect()
}
