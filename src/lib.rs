pub mod command;
pub mod config;
pub mod detector;
pub mod error;
pub mod model;
pub mod output;
pub mod project;
pub mod scanner;

pub use config::Config;
pub use error::{Result, ScanError};
pub use model::{validate_packages, PackageIdentifier, ScanRecord, ScanReport, Source};
pub use project::PackageManagerKind;
pub use scanner::Scanner;
