//! Command-line interface definition for julesync
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// julesync - keep remote task sessions in sync from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "julesync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the key-value store location
    #[arg(long, env = "JULESYNC_STORE_PATH")]
    pub store_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List, create, cancel, or delete sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Stream a session's activities until it finishes
    Watch {
        /// Session id
        id: String,

        /// Also load the page of history before the newest one
        #[arg(long)]
        older: bool,
    },

    /// Send a message to a session
    Send {
        /// Session id
        id: String,

        /// Message text
        message: String,
    },

    /// List repositories sessions can target
    Sources,

    /// Show or record recently used items
    Recent {
        /// Recent-items subcommand
        #[command(subcommand)]
        command: RecentCommand,
    },

    /// Manage the stored API key
    Auth {
        /// Auth subcommand
        #[command(subcommand)]
        command: AuthCommand,
    },
}

/// Session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions
    List {
        /// Bypass the cached first page
        #[arg(long)]
        refresh: bool,

        /// Follow pagination until every session is loaded
        #[arg(long)]
        all: bool,
    },

    /// Start a new session
    Create {
        /// Task description
        #[arg(short, long)]
        prompt: String,

        /// Source to work against, e.g. sources/github/owner/repo
        #[arg(short, long)]
        source: Option<String>,

        /// Starting branch
        #[arg(short, long, requires = "source")]
        branch: Option<String>,

        /// Automation mode passed through to the service
        #[arg(long)]
        automation_mode: Option<String>,

        /// Require plan approval before execution
        #[arg(long)]
        require_plan_approval: bool,
    },

    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },

    /// Cancel a running session
    Cancel {
        /// Session id
        id: String,
    },
}

/// Recent-items subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RecentCommand {
    /// Show recent items, newest first
    List,

    /// Record an item as most recently used
    Add {
        /// Item id
        item: String,
    },
}

/// Auth subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Store an API key in the OS keyring
    Login {
        /// API key
        #[arg(long)]
        api_key: String,

        /// Store the key without checking it against the service
        #[arg(long)]
        skip_validation: bool,
    },

    /// Remove the stored API key
    Logout,

    /// Report whether an API key is available
    Status,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
