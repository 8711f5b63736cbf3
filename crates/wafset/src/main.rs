// # wafset - WAF IP set manager
//
// Thin integration layer: flags → configuration → logging → one sync run.
// All reconciliation and concurrency logic lives in wafset-core.
//
// ## Configuration
//
// Every flag can also be set from the environment:
//
// - `--profile` / `WAFSET_PROFILE`: AWS shared config profile (required)
// - `--region` / `WAFSET_REGION`: AWS region (required)
// - `--action` / `WAFSET_ACTION`: add-ip, remove-ip or clear (required)
// - `--id` / `WAFSET_IPSET_ID`: IP set ID (required)
// - `--name` / `WAFSET_IPSET_NAME`: IP set name (required)
// - `--scope` / `WAFSET_SCOPE`: CLOUDFRONT (default) or REGIONAL
// - `--data`: comma-separated CIDR list
// - `--file`: file with one CIDR per line
// - `--dry-run` / `WAFSET_DRY_RUN`: read and log the update without sending it
// - `--log-level` / `WAFSET_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// wafset --profile prod --region us-east-1 \
//     --id 1a2b3c --name blocklist --scope REGIONAL \
//     --action add-ip --data "203.0.113.0/24,198.51.100.0/24"
// ```
//
// The exit status is the same whatever the outcome; results are reported
// through the log.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::instrument::WithSubscriber;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use wafset_core::{
    Action, ExecuteConfig, IpSetProvider, IpSetSync, Operation, Scope, SyncOutcome, input,
};
use wafset_provider_aws::AwsWafProvider;

/// Command-line flags
#[derive(Debug, Parser)]
#[command(name = "wafset", version)]
#[command(about = "Add, remove or clear CIDR entries of an AWS WAF IP set")]
struct Cli {
    /// AWS profile
    #[arg(long, env = "WAFSET_PROFILE")]
    profile: Option<String>,

    /// AWS region
    #[arg(long, env = "WAFSET_REGION")]
    region: Option<String>,

    /// Action to execute in the IP set. Values: add-ip, remove-ip, clear
    #[arg(long, env = "WAFSET_ACTION")]
    action: Option<String>,

    /// IP set ID
    #[arg(long, env = "WAFSET_IPSET_ID")]
    id: Option<String>,

    /// IP set name
    #[arg(long, env = "WAFSET_IPSET_NAME")]
    name: Option<String>,

    /// IP set scope (CLOUDFRONT or REGIONAL)
    #[arg(long, env = "WAFSET_SCOPE", default_value = "CLOUDFRONT")]
    scope: String,

    /// IP CIDR list, separated with commas. Ex: "cidr_1,cidr_2,cidr_3"
    #[arg(long)]
    data: Option<String>,

    /// File with a list of IP CIDR, one per line
    #[arg(long)]
    file: Option<PathBuf>,

    /// Read the IP set and log the update without sending it
    #[arg(long, env = "WAFSET_DRY_RUN")]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WAFSET_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Build and validate the invocation configuration
    fn to_config(&self) -> wafset_core::Result<ExecuteConfig> {
        let action: Action = self
            .action
            .as_deref()
            .ok_or_else(|| wafset_core::Error::config("invalid action: --action is required"))?
            .parse()?;

        let config = ExecuteConfig {
            profile: self.profile.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
            action,
            id: self.id.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            scope: self.scope.parse::<Scope>()?,
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn print_usage() {
    if let Err(e) = Cli::command().print_help() {
        eprintln!("Failed to print usage: {}", e);
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if let Err(print_err) = e.print() {
                eprintln!("{}", print_err);
            }
            return ExitCode::SUCCESS;
        }
    };

    let Some(log_level) = parse_log_level(&cli.log_level) else {
        eprintln!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            cli.log_level
        );
        print_usage();
        return ExitCode::SUCCESS;
    };

    // Scoped to this run rather than installed globally
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return ExitCode::SUCCESS;
        }
    };

    let session = async {
        if let Err(e) = run(cli).await {
            error!("{:#}", e);
        }
    };
    rt.block_on(session.with_subscriber(subscriber));

    ExitCode::SUCCESS
}

/// Run one invocation
///
/// Failures are returned, not logged; `main` reports them once.
async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config().inspect_err(|_| print_usage())?;

    info!(
        "connecting to AWS [{}] [{}] - action ({})",
        config.profile, config.region, config.action
    );

    let operation = plan_operation(&config, cli.data.as_deref(), cli.file.as_deref()).await?;
    let Some(operation) = operation else {
        info!("no IP list informed");
        return Ok(());
    };

    let provider = AwsWafProvider::connect(&config.profile, &config.region)
        .await
        .context("failed to load config from AWS")?;

    apply(&config, Box::new(provider), &operation).await?;
    Ok(())
}

/// Turn the configured action and input sources into an operation
///
/// Returns `None` when an add/remove action was given no input source at
/// all. `clear` never reads input.
async fn plan_operation(
    config: &ExecuteConfig,
    data: Option<&str>,
    file: Option<&Path>,
) -> Result<Option<Operation>> {
    if !config.action.needs_addresses() {
        return Ok(Some(Operation::new(config.action, Vec::new())));
    }

    let addresses = input::load(data, file)
        .await
        .context("failed to read IP list")?;

    Ok(addresses.map(|addresses| Operation::new(config.action, addresses)))
}

/// Run the operation against the configured IP set through `provider`
async fn apply(
    config: &ExecuteConfig,
    provider: Box<dyn IpSetProvider>,
    operation: &Operation,
) -> Result<SyncOutcome> {
    if config.dry_run {
        warn!("running in DRY-RUN mode - no changes will be made");
    }

    let ip_set = config.ip_set_info();
    let sync = IpSetSync::new(provider, ip_set.clone()).with_dry_run(config.dry_run);

    let outcome = sync
        .execute(operation)
        .await
        .with_context(|| format!("{} on IP set {} aborted", config.action, ip_set))?;

    debug!("{} on IP set {} finished: {:?}", config.action, ip_set, outcome);
    Ok(outcome)
}
