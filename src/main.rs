//! swagger-watch command-line interface.
//!
//! Runs one watch pass over every host in the configuration and exits.
//! Exit codes: 0 when every host was processed, 1 when at least one host
//! failed, 2 when the run could not start (bad config, no HTTP client).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use swagger_watch::config::DEFAULT_CONFIG_FILE;
use swagger_watch::{format_report, load_config, run, OutputFormat, RunOptions};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// swagger-watch - report changed endpoints of Swagger/OpenAPI documents
///
/// Fetches the Swagger document of each configured host, stores it as the
/// next numbered snapshot and posts the differences to the previous snapshot
/// to a chat webhook.
#[derive(Parser)]
#[command(name = "swagger-watch")]
#[command(version)]
#[command(about = "Report changed endpoints of Swagger/OpenAPI documents", long_about = None)]
struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding one snapshot directory per host
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    snapshot_dir: PathBuf,

    /// Print reports instead of posting them to the webhook
    #[arg(long)]
    dry_run: bool,

    /// Output format for dry-run reports
    #[arg(short = 'f', long, value_enum, default_value = "plain")]
    format: OutputFormatArg,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// The notification text
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            error!("{:#}", err);
            process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swagger_watch={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn execute(cli: Cli) -> Result<i32> {
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    config
        .validate(!cli.dry_run)
        .with_context(|| format!("Invalid config: {}", cli.config.display()))?;

    let options = RunOptions {
        snapshot_root: cli.snapshot_dir,
        dry_run: cli.dry_run,
    };
    let summary = run(&config, &options).context("Failed to start watch run")?;

    if cli.dry_run {
        let format: OutputFormat = cli.format.into();
        for report in summary.reports() {
            let output = format_report(report, format).context("Failed to format report")?;
            println!("{}", output);
        }
    }

    if summary.has_failures() {
        Ok(1)
    } else {
        Ok(0)
    }
}
