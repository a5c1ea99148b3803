/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `sessions`: list, create, cancel, delete sessions
- `watch`: stream a session's activities
- `recent`: recently used items
- `send`, `sources`, `auth`: small one-shot commands

Handlers build a [`SyncContext`] from the loaded configuration and print
results; all synchronization logic lives in the library modules.
*/

use crate::api::TaskApi;
use crate::cli::AuthCommand;
use crate::config::Config;
use crate::context::SyncContext;
use crate::error::{Result, SyncError};
use colored::Colorize;

// Session list management
pub mod sessions;

// Live activity streaming
pub mod watch;

// Recent-items commands
pub mod recent;

/// Send command
pub mod send {
    use super::*;

    /// Posts `message` to a session and prints the created activity.
    pub async fn send_message(config: &Config, session_id: &str, message: &str) -> Result<()> {
        let ctx = SyncContext::from_config(config)?;
        let activity = ctx.api().create_activity(session_id, message).await?;
        println!("{} {}", "Sent:".green(), activity.describe());
        Ok(())
    }
}

/// Sources command
pub mod sources {
    use super::*;
    use crate::display::clean_source_name;

    /// Prints every source the API key can target.
    pub async fn list_sources(config: &Config) -> Result<()> {
        let ctx = SyncContext::from_config(config)?;
        let sources = ctx.list_sources().await?;

        if sources.is_empty() {
            println!("{}", "No sources found.".yellow());
            return Ok(());
        }

        for source in sources {
            let branch = source
                .github_repo_context
                .as_ref()
                .and_then(|ctx| ctx.starting_branch.as_deref())
                .map(|b| format!(" ({})", b))
                .unwrap_or_default();
            println!("{}{}", clean_source_name(&source.name).cyan(), branch);
        }
        Ok(())
    }
}

/// Auth command(s)
///
/// Stores, removes, or reports the API key used for every request.
pub mod auth {
    use super::*;

    /// Dispatches an auth subcommand.
    pub async fn handle_auth(config: &Config, command: AuthCommand) -> Result<()> {
        let ctx = SyncContext::from_config(config)?;

        match command {
            AuthCommand::Login {
                api_key,
                skip_validation,
            } => {
                let api_key = api_key.trim();
                if api_key.is_empty() {
                    return Err(SyncError::Config("API key must not be empty".into()).into());
                }
                if !skip_validation && !ctx.api().validate_api_key(api_key).await {
                    eprintln!("{}", "The service rejected this API key.".red());
                    return Err(SyncError::NotAuthenticated.into());
                }
                if config.api.api_key.is_some() {
                    tracing::warn!(
                        "An API key is configured via file or environment and takes precedence"
                    );
                }
                ctx.save_api_key(api_key)?;
                println!("{}", "API key saved.".green());
            }
            AuthCommand::Logout => {
                ctx.clear_api_key()?;
                println!("{}", "API key removed.".green());
            }
            AuthCommand::Status => {
                if ctx.has_api_key()? {
                    println!("{}", "Authenticated: an API key is available.".green());
                } else {
                    println!(
                        "{} Run {} to add one.",
                        "Not authenticated.".yellow(),
                        "julesync auth login --api-key <KEY>".cyan()
                    );
                }
            }
        }

        Ok(())
    }

}
