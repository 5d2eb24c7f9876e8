//! Scan configuration handling.
//!
//! The list of known-malicious releases lives in a JSON file inside the
//! project being scanned.
//!
//! # Configuration Location
//!
//! `<project-root>/.nymc/config.json`
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "url": "https://example.com/malicious-packages.json",
//!   "httpsHeader": "Authorization: Bearer token123",
//!   "packages": ["evil@1.0.0", "@scope/malware@2.1"]
//! }
//! ```
//!
//! When `url` is set, the JSON array it serves replaces `packages` for the scan.

use crate::error::{Result, ScanError};
use crate::model::{validate_packages, PackageIdentifier};
use crate::project::MANIFEST_FILE;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_DIR: &str = ".nymc";
pub const CONFIG_FILE: &str = "config.json";

/// Version written by `--init` when the project manifest has none.
const FALLBACK_VERSION: &str = "0.0.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,

    /// Remote feed of malicious identifiers. Empty means use `packages`.
    pub url: String,

    /// A single `Name: value` header sent with the feed request.
    #[serde(rename = "httpsHeader")]
    pub https_header: String,

    pub packages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: FALLBACK_VERSION.to_string(),
            url: String::new(),
            https_header: String::new(),
            packages: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct ManifestVersion {
    version: Option<String>,
}

impl Config {
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    pub fn exists(root: &Path) -> bool {
        Self::path(root).exists()
    }

    /// Loads the configuration for the project at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ConfigNotFound`] if the file is missing, or
    /// [`ScanError::Parse`] naming the file if it is not valid JSON.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);

        if !path.exists() {
            return Err(ScanError::ConfigNotFound(path));
        }

        let content = fs::read_to_string(&path)?;
        let config: Config =
            serde_json::from_str(&content).map_err(|source| ScanError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(config)
    }

    /// Writes the configuration, creating `.nymc/` if needed.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Creates a default configuration for the project at `root`.
    ///
    /// The version is copied from the project's `package.json`. Returns the
    /// path written, or `None` if a config already exists and `force` is false.
    pub fn init(root: &Path, force: bool) -> Result<Option<PathBuf>> {
        let path = Self::path(root);

        if !force && path.exists() {
            debug!(path = %path.display(), "config already exists, leaving it alone");
            return Ok(None);
        }

        let config = Config {
            version: manifest_version(root).unwrap_or_else(|| FALLBACK_VERSION.to_string()),
            ..Config::default()
        };
        config.save(root)?;

        info!(path = %path.display(), "config created");
        Ok(Some(path))
    }

    pub fn has_feed(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

fn manifest_version(root: &Path) -> Option<String> {
    let content = fs::read_to_string(root.join(MANIFEST_FILE)).ok()?;
    let manifest: ManifestVersion = serde_json::from_str(&content).ok()?;
    manifest.version
}

/// Splits `Name: value` at the first colon. An empty string means no header.
pub fn parse_header(raw: &str) -> Result<Option<(String, String)>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ScanError::InvalidHeader(raw.to_string()))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ScanError::InvalidHeader(raw.to_string()));
    }

    Ok(Some((name.to_string(), value.trim().to_string())))
}

fn build_headers(raw: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    if let Some((name, value)) = parse_header(raw)? {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ScanError::InvalidHeader(raw.to_string()))?;
        let value =
            HeaderValue::from_str(&value).map_err(|_| ScanError::InvalidHeader(raw.to_string()))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Downloads the identifier list from the configured feed.
///
/// The feed must answer with a JSON array of strings. The result is not
/// validated here.
pub async fn fetch_packages(config: &Config) -> Result<Vec<String>> {
    if !config.has_feed() {
        return Err(ScanError::MissingFeedUrl);
    }

    let url = config.url.trim();
    let headers = build_headers(&config.https_header)?;

    debug!(url, "fetching package list");
    let response = reqwest::Client::new()
        .get(url)
        .headers(headers)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::FeedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let packages: Vec<String> = response.json().await?;
    info!(url, count = packages.len(), "fetched package list");
    Ok(packages)
}

/// Picks the identifier list for a scan and validates it.
///
/// A configured `url`, or `network`, makes the remote list replace the local
/// `packages` entirely. One malformed entry rejects the whole list.
pub async fn resolve_packages(config: &Config, network: bool) -> Result<Vec<PackageIdentifier>> {
    let raw = if network || config.has_feed() {
        fetch_packages(config).await?
    } else {
        config.packages.clone()
    };

    validate_packages(raw.as_slice())
}
