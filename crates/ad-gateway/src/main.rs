//! ad-gateway: Vehicle Ad Publishing Gateway Main Binary
//!
//! Usage:
//!   ad-gateway           - Start the HTTP API server
//!   ad-gateway --help    - Show help
//!   ad-gateway --version - Show version

use ad_core::Config;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// HTTP API server
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("ad-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting ad-gateway...");
    tracing::info!("Target portal: {}", config.site.login_url);

    run_server(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("ad-gateway - Vehicle Ad Publishing Gateway");
    println!();
    println!("Usage:");
    println!("  ad-gateway           Start the HTTP API server");
    println!("  ad-gateway --help    Show this help message");
    println!("  ad-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  SEMINUEVOS_EMAIL     Portal login email (required without ad-gateway.toml)");
    println!("  SEMINUEVOS_PASSWORD  Portal login password (required without ad-gateway.toml)");
    println!("  API_PORT             HTTP API port (default: 3000)");
    println!("  SCREENSHOTS_DIR      Artifact output directory (default: screenshots)");
    println!("  NAVIGATION_TIMEOUT_MS  Full-page navigation bound (default: 60000)");
    println!("  ELEMENT_TIMEOUT_MS     Element appearance bound (default: 10000)");
}

/// Run the HTTP API server until interrupted
async fn run_server(config: Config) -> anyhow::Result<()> {
    let handle = tokio::spawn(async move {
        if let Err(e) = ad_api::start_server(config).await {
            tracing::error!("HTTP API error: {}", e);
        }
    });

    tracing::info!("ad-gateway initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    handle.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
