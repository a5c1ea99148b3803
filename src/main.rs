//! julesync - terminal client for remote task sessions
//!
#![doc = "julesync - terminal client for remote task sessions"]
#![doc = "Main entry point for the julesync binary."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use julesync::cli::{Cli, Commands};
use julesync::commands;
use julesync::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Sessions { command } => {
            tracing::info!("Starting sessions command");
            commands::sessions::handle_sessions(&config, command).await?;
            Ok(())
        }
        Commands::Watch { id, older } => {
            tracing::info!("Watching session {}", id);
            commands::watch::run_watch(&config, &id, older).await?;
            Ok(())
        }
        Commands::Send { id, message } => {
            tracing::debug!("Sending message to session {}", id);
            commands::send::send_message(&config, &id, &message).await?;
            Ok(())
        }
        Commands::Sources => {
            commands::sources::list_sources(&config).await?;
            Ok(())
        }
        Commands::Recent { command } => {
            commands::recent::handle_recent(&config, command)?;
            Ok(())
        }
        Commands::Auth { command } => {
            tracing::info!("Starting auth command");
            commands::auth::handle_auth(&config, command).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set. Output is JSON when `JULESYNC_LOG_JSON=true`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "julesync=debug"
    } else {
        "julesync=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json = std::env::var("JULESYNC_LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
