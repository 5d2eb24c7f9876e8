//! Scan orchestration.
//!
//! Runs every detector against every identifier and collects the verdicts
//! into a [`ScanReport`].
//!
//! # Example
//!
//! ```no_run
//! use nymc::command::SystemCommandRunner;
//! use nymc::detector::{default_detectors, ScanContext, DEFAULT_TIMEOUT};
//! use nymc::{validate_packages, Scanner};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> nymc::Result<()> {
//!     let ids = validate_packages(&["evil@1.0.0"])?;
//!     let ctx = ScanContext::detect("/path/to/project");
//!
//!     let detectors = default_detectors(Arc::new(SystemCommandRunner), DEFAULT_TIMEOUT);
//!     let scanner = Scanner::new(detectors);
//!     let report = scanner.scan(&ctx, &ids).await?;
//!
//!     println!("{} positive", report.positive_count());
//!     Ok(())
//! }
//! ```

use crate::detector::{Detector, ScanContext};
use crate::error::Result;
use crate::model::{PackageIdentifier, ScanRecord, ScanReport};
use futures::future::try_join_all;
use indicatif::ProgressBar;
use tracing::{debug, info};

pub struct Scanner {
    detectors: Vec<Box<dyn Detector>>,
    parallel: bool,
    progress: Option<ProgressBar>,
}

impl Scanner {
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self {
            detectors,
            parallel: false,
            progress: None,
        }
    }

    /// Scan identifiers concurrently. Report order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Checks every identifier against every detector.
    ///
    /// # Errors
    ///
    /// The first fatal detector error aborts the whole scan.
    pub async fn scan(&self, ctx: &ScanContext, ids: &[PackageIdentifier]) -> Result<ScanReport> {
        info!(
            root = %ctx.root.display(),
            package_manager = %ctx.kind,
            packages = ids.len(),
            parallel = self.parallel,
            "starting scan"
        );

        let records = if self.parallel {
            try_join_all(ids.iter().map(|id| self.scan_one(ctx, id))).await
        } else {
            self.scan_sequential(ctx, ids).await
        };

        // Clear before the error path too, or the bar is left on the terminal
        if let Some(ref pb) = self.progress {
            pb.finish_and_clear();
        }

        let report = ScanReport::new(ctx.kind, records?);
        info!(positive = report.positive_count(), "scan finished");

        Ok(report)
    }

    async fn scan_sequential(
        &self,
        ctx: &ScanContext,
        ids: &[PackageIdentifier],
    ) -> Result<Vec<ScanRecord>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            records.push(self.scan_one(ctx, id).await?);
        }
        Ok(records)
    }

    async fn scan_one(&self, ctx: &ScanContext, id: &PackageIdentifier) -> Result<ScanRecord> {
        if let Some(ref pb) = self.progress {
            pb.set_message(format!("Checking {}...", id));
        }

        let mut record = ScanRecord::new(id.clone());

        // No short-circuit: every source is consulted even after a hit
        for detector in &self.detectors {
            let found = detector.detect(ctx, id).await?;
            record.set(detector.source(), found);
        }

        debug!(identifier = %id, positive = record.is_positive(), "identifier checked");

        if let Some(ref pb) = self.progress {
            pb.inc(1);
        }

        Ok(record)
    }
}
