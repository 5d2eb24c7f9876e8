use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Config not found at {}. Run 'nymc --init' to create it.", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("package.json not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Invalid package format: \"{0}\". Expected format: \"package_name@version\"")]
    InvalidIdentifier(String),

    #[error("No url configured in .nymc/config.json")]
    MissingFeedUrl,

    #[error("Invalid httpsHeader \"{0}\". Expected format: \"Header-Name: value\"")]
    InvalidHeader(String),

    #[error("Failed to fetch packages from {url}: HTTP {status}")]
    FeedStatus { url: String, status: u16 },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
