use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ricoverage::aws;
use ricoverage::config::{self, Config};
use ricoverage::error::{ConfigError, CoverageError};
use ricoverage::exit_codes;
use ricoverage::fetch::FetchOptions;
use ricoverage::report::{run_reports, OutputFormat, RunOptions};
use ricoverage::service::ServiceKind;

#[derive(Parser)]
#[command(name = "ricoverage")]
#[command(
    about = "Reserved instance coverage report for EC2, RDS, and ElastiCache",
    long_about = "ricoverage compares running resources against active reservations in every\nenabled AWS region and marks each instance type as covered or not.\n\nWith no arguments it reports Cache, EC2, and RDS in that order."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Services to report, in order (repeatable)
    #[arg(short, long = "service", value_enum)]
    services: Vec<ServiceKind>,

    /// Only report these regions (repeatable)
    #[arg(long = "region", value_name = "REGION")]
    regions: Vec<String>,

    /// Disable colored status glyphs
    #[arg(long)]
    no_color: bool,

    /// Regions fetched in parallel
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Abort on the first failing service
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".ricoverage.toml")]
        output: PathBuf,
    },
}

/// CLI flags take precedence over the config file.
///
/// The file already passed validation on load, so anything rejected here came
/// from a flag and is reported as a usage error.
fn apply_overrides(mut config: Config, cli: &Cli) -> ricoverage::error::Result<Config> {
    if !cli.services.is_empty() {
        config.services = cli.services.clone();
    }
    if !cli.regions.is_empty() {
        config.regions = cli.regions.clone();
    }
    if let Some(n) = cli.concurrency {
        config.concurrency = n;
    }
    if cli.no_color {
        config.color = false;
    }
    if cli.fail_fast {
        config.fail_fast = true;
    }
    config.validate().map_err(|e| match e {
        ConfigError::InvalidValue { field, reason } => CoverageError::Validation { field, reason },
        other => other.into(),
    })?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings only unless --verbose; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(Commands::Init { output }) = &cli.command {
        config::init_config(output)?;
        return Ok(());
    }

    let config = match Config::load(cli.config.as_deref()).and_then(|c| apply_overrides(c, &cli)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_codes::exit_code_for_error(&e));
        }
    };
    debug!("Effective config: {:?}", config);

    let sdk_config = aws::load_sdk_config().await;
    let regions = match aws::list_regions(
        &sdk_config,
        &config.home_region,
        config.retry.max_attempts,
    )
    .await
    .and_then(|regions| aws::select_regions(regions, &config.regions))
    {
        Ok(regions) => regions,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_codes::exit_code_for_error(&e));
        }
    };

    let services: Vec<_> = config
        .services
        .iter()
        .map(|kind| aws::service_for(*kind, &sdk_config))
        .collect();

    let options = RunOptions {
        fetch: FetchOptions::new(config.concurrency, config.retry.max_attempts),
        output: cli.output,
        color: config.color && console::colors_enabled(),
        fail_fast: config.fail_fast,
        progress: true,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_reports(&services, &regions, &options, &mut out).await {
        Ok(outcome) if outcome.is_success() => Ok(()),
        Ok(outcome) => {
            let code = exit_codes::exit_code_for_failures(outcome.failures.iter().map(|f| &f.error));
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_codes::exit_code_for_error(&e));
        }
    }
}
