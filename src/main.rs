//! uber-ads-mcp: MCP server for the Uber Ads External API
//!
//! Exposes read-only Uber Ads operations (accounts, campaigns, statistics)
//! as MCP tools so AI assistants can inspect advertising data.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use uber_ads_mcp::ads::UberAdsClient;
use uber_ads_mcp::config::{Config, ENV_ACCESS_TOKEN};
use uber_ads_mcp::mcp::server::McpServer;

/// MCP server for the Uber Ads External API.
///
/// Configuration comes from the environment: UBER_ACCESS_TOKEN (required),
/// UBER_BASE_URL, UBER_CLIENT_ID, UBER_CLIENT_SECRET. A .env file in the
/// working directory is honoured.
#[derive(Parser, Debug)]
#[command(name = "uber-ads-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
fn get_log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Logs go to stderr; stdout is reserved for MCP protocol messages.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the uber-ads-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration from the environment
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("\nSet {ENV_ACCESS_TOKEN} (and optionally UBER_BASE_URL) in the");
            eprintln!("environment or a .env file before starting the server.");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %cfg.base_url,
        "Starting uber-ads-mcp server"
    );

    // Create the API client and MCP server
    let client = match UberAdsClient::new(&cfg) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create Uber Ads client");
            return ExitCode::FAILURE;
        }
    };

    let mut server = McpServer::new(client);

    info!("MCP server ready, waiting for client connection...");

    // Run the server
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(server.run());

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_mapping() {
        assert_eq!(get_log_level(0, true), Level::ERROR);
        assert_eq!(get_log_level(3, true), Level::ERROR);
        assert_eq!(get_log_level(0, false), Level::WARN);
        assert_eq!(get_log_level(1, false), Level::INFO);
        assert_eq!(get_log_level(2, false), Level::DEBUG);
        assert_eq!(get_log_level(5, false), Level::TRACE);
    }
}
