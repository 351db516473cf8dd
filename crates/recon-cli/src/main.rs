use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recon_core::wire::ScanType;

mod commands;
mod context;

#[derive(Parser)]
#[command(
    name = "recon",
    about = "ReconLink — OSINT scan backend client",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to a recon.toml config file (default: ./recon.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API key sent as X-API-Key (overrides RECON_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Explicit backend base URL; scheme-less input is coerced to https
    #[arg(long, global = true)]
    url: Option<String>,

    /// Hostname the dashboard is served from, used to derive candidate
    /// backend URLs (e.g. osint-frontend-7g2.onrender.com)
    #[arg(long, global = true)]
    hostname: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe candidate backends until one answers or the budget runs out
    Probe {
        /// Override the wait budget in seconds
        #[arg(long)]
        wait: Option<u64>,
    },
    /// Submit a scan and poll it to completion.
    ///
    /// Finds a live backend first, tolerating cold starts, then submits
    /// and polls every couple of seconds. The full result payload is
    /// printed as JSON on success.
    Scan {
        /// Target domain, email, username, or phone number
        #[arg(short, long)]
        target: String,

        /// Scan type: domain, email, username, phone, or full
        #[arg(short = 'T', long = "type", default_value = "domain")]
        scan_type: ScanType,

        /// Enable deep scanning (slower, more thorough)
        #[arg(long)]
        deep: bool,
    },
    /// Fetch the current status of a submitted scan
    Status {
        /// Backend-assigned scan id
        #[arg(long)]
        scan_id: String,
    },
    /// Write a recon.toml scaffold to the current directory
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let ctx = context::AppContext::resolve(
        cli.config.as_deref(),
        cli.api_key,
        cli.url,
        cli.hostname,
    )?;

    match cli.command {
        Commands::Probe { wait } => commands::probe::run(ctx, wait).await,
        Commands::Scan {
            target,
            scan_type,
            deep,
        } => commands::scan::run(ctx, &target, scan_type, deep).await,
        Commands::Status { scan_id } => commands::status::run(ctx, &scan_id).await,
        Commands::Init => commands::init::run(),
    }
}
