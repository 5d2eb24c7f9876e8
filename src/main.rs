use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nymc::{
    command::{CommandRunner, SystemCommandRunner},
    config::{resolve_packages, Config, CONFIG_DIR, CONFIG_FILE},
    detector::{default_detectors, ScanContext},
    output::{print_report, OutputFormat},
    project::find_project_root,
    Scanner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}

#[derive(Parser)]
#[command(name = "nymc")]
#[command(
    author,
    version,
    about = "Check a project for known-malicious package releases"
)]
struct Cli {
    /// (Re)create .nymc/config.json and exit
    #[arg(long)]
    init: bool,

    /// Fetch the package list from the configured url
    #[arg(long)]
    network: bool,

    /// Output format (text, table, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Scan packages concurrently
    #[arg(long)]
    parallel: bool,

    /// Seconds to wait for the package manager's dependency listing
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Directory to start looking for the project root from
    #[arg(short = 'C', long)]
    dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            println!("Error: {:#}", e);
            ExitCode::from(exit_codes::FAILURE)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("nymc=debug")
        } else {
            EnvFilter::new("nymc=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let format = OutputFormat::from_str(&cli.format).map_err(|e| anyhow::anyhow!(e))?;

    let start = match cli.dir {
        Some(dir) => std::fs::canonicalize(&dir)
            .with_context(|| format!("Failed to resolve directory: {}", dir.display()))?,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let root = find_project_root(&start);

    if cli.init {
        if let Some(path) = Config::init(&root, true)? {
            println!("Config created at: {}", path.display());
        }
        println!(
            "Please add your packages to the packages array in {}/{}",
            CONFIG_DIR, CONFIG_FILE
        );
        return Ok(exit_codes::SUCCESS);
    }

    let config = Config::load(&root)?;
    let ids = resolve_packages(&config, cli.network).await?;

    let ctx = ScanContext::detect(&root);
    info!(root = %root.display(), package_manager = %ctx.kind, "project detected");

    let runner = Arc::new(SystemCommandRunner);
    if !runner.exists(ctx.kind.program()).await {
        warn!(
            program = ctx.kind.program(),
            "package manager not found on PATH, dependency tree results will be empty"
        );
    }

    let mut scanner = Scanner::new(default_detectors(
        runner,
        Duration::from_secs(cli.timeout),
    ))
    .parallel(cli.parallel);

    if format != OutputFormat::Json {
        scanner = scanner.with_progress(progress_bar(ids.len()));
    }

    let report = scanner.scan(&ctx, &ids).await?;
    print_report(&report, format)?;

    if report.has_findings() {
        Ok(exit_codes::FAILURE)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
