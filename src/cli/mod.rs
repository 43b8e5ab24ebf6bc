mod commands;
pub mod error;

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, ProcessEnv, Registry, Role};
use crate::store::{RestConnector, RestStore};
use crate::sync::{SyncJob, interrupt_signal};
use error::CliResult;

#[derive(Parser)]
#[command(name = "detail-ops")]
#[command(author, version, about = "Detailing platform operations", long_about = None)]
pub struct Cli {
    /// YAML file overriding endpoints, collections, timeout and lock path
    #[arg(long, global = true, env = "DETAIL_OPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-call timeout in seconds against remote services
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy essential data from production to development and seed test data
    SyncDb {
        /// Lock file serializing sync jobs
        #[arg(long)]
        lock_file: Option<PathBuf>,
    },
    /// List the services and categories of a shop
    InspectServices {
        /// Shop ID
        shop_id: String,
        /// Environment to query
        #[arg(long = "env", value_enum, default_value_t = Role::Source)]
        role: Role,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Serve the HEIC to JPEG conversion endpoint
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Third-party conversion endpoint
        #[arg(long, env = "CONVERSION_API_URL")]
        upstream_url: Option<String>,
        /// Credential for the conversion endpoint
        #[arg(long, env = "CONVERSION_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

/// Output format for read-only commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Initialize tracing subscriber with env filter. Logs go to stderr so
/// command output on stdout stays clean.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "detail_ops=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve configuration once: file (or defaults), then CLI overrides.
fn load_config(cli: &Cli, lock_file: Option<PathBuf>) -> CliResult<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(secs) = cli.request_timeout {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    if let Some(path) = lock_file {
        config = config.with_lock_path(path);
    }
    config.validate()?;
    Ok(config)
}

async fn sync_db(cli: &Cli, lock_file: Option<PathBuf>) -> CliResult<SyncJob> {
    let config = load_config(cli, lock_file)?;
    let connector = RestConnector::new(config.request_timeout());
    commands::sync_db::sync_db(&config, ProcessEnv, connector, interrupt_signal()).await
}

async fn inspect_services(
    cli: &Cli,
    shop_id: &str,
    role: Role,
    format: OutputFormat,
) -> CliResult<String> {
    let config = load_config(cli, None)?;
    let profile = Registry::from_config(&config, ProcessEnv).resolve(role)?;
    let client = RestStore::new(&profile, config.request_timeout())?;
    commands::inspect::inspect(&client, shop_id, format).await
}

async fn serve(
    cli: &Cli,
    host: IpAddr,
    port: u16,
    upstream_url: Option<String>,
    api_key: Option<String>,
) -> CliResult<()> {
    let config = load_config(cli, None)?;
    let server = commands::serve::server_config(
        host,
        port,
        upstream_url,
        api_key,
        config.request_timeout(),
    )?;
    commands::serve::serve(server).await
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let _ = rustls::crypto::ring::default_provider().install_default();

    match &cli.command {
        Commands::SyncDb { lock_file } => match sync_db(&cli, lock_file.clone()).await {
            Ok(job) => {
                println!("{}", commands::sync_db::format_job(&job));
                job.outcome().into()
            }
            Err(e) => {
                eprintln!("sync-db failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::InspectServices {
            shop_id,
            role,
            format,
        } => match inspect_services(&cli, shop_id, *role, *format).await {
            Ok(output) => {
                println!("{}", output);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("inspect-services failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Serve {
            host,
            port,
            upstream_url,
            api_key,
        } => match serve(&cli, *host, *port, upstream_url.clone(), api_key.clone()).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("serve failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
