//! vixwatch CLI
//!
//! Command-line interface for the VIX threshold monitor.

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vixwatch::api::HttpServer;
use vixwatch::config::LoggingConfig;
use vixwatch::{AlertCheck, Config};

/// vixwatch - VIX threshold alerts
#[derive(Parser, Debug)]
#[command(name = "vixwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "VIXWATCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one check and print the response
    Check,

    /// Serve the check over HTTP
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show the resolved configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = match parse_cli(None, std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    init_logging(&config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Check => run_check(config, cli.format).await,
        Commands::Serve { host, port } => run_serve(config, host, port).await.map(|()| true),
        Commands::Config => run_config(&config, cli.format).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load `.env` (from `dotenv_path`, or the working directory) and parse `args`
///
/// `.env` goes first so clap sees variables such as `VIXWATCH_CONFIG`.
fn parse_cli<I, T>(dotenv_path: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let _ = match dotenv_path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };

    Cli::try_parse_from(args)
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_check(config: Config, format: OutputFormat) -> anyhow::Result<bool> {
    let check = AlertCheck::from_config(config)?;
    let payload = check.handle().await;

    let rendered = match format {
        OutputFormat::Text => serde_json::to_string_pretty(&payload)?,
        OutputFormat::Json => serde_json::to_string(&payload)?,
    };
    println!("{rendered}");

    Ok(payload.is_success())
}

async fn run_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.http_port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    info!(
        upper = config.alert.upper_threshold,
        lower = config.alert.lower_threshold,
        "Starting vixwatch on {}",
        addr
    );

    let check = Arc::new(AlertCheck::from_config(config)?);
    HttpServer::new(check).serve(&addr).await?;

    Ok(())
}

fn run_config(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let redacted = config.redacted();
    let rendered = match format {
        OutputFormat::Text => serde_json::to_string_pretty(&redacted)?,
        OutputFormat::Json => serde_json::to_string(&redacted)?,
    };
    println!("{rendered}");
    Ok(())
}
