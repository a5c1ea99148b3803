//! julesync - client-side synchronization for remote task sessions
//!
//! This library keeps a local, observable view of work running on a remote
//! task service: a cached and paginated session list, a live-tailing
//! activity log per open session, and a small persisted list of recently
//! used items.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: REST client and wire/domain types
//! - `sync`: session list synchronizer, activity poller, merge logic
//! - `recent`: bounded most-recently-used cache
//! - `storage`: durable key-value store
//! - `credentials`: API key storage in the OS keyring
//! - `context`: composition root wiring everything together
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`, `commands`, `display`: command-line front end
//!
//! # Example
//!
//! ```no_run
//! use julesync::{Config, SyncContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let ctx = SyncContext::from_config(&config)?;
//!     let page = ctx.sessions().load(false).await?;
//!     println!("{} sessions", page.items.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod credentials;
pub mod display;
pub mod error;
pub mod recent;
pub mod storage;
pub mod sync;

// Re-export commonly used types
pub use config::Config;
pub use context::SyncContext;
pub use error::{Result, SyncError};

#[cfg(test)]
pub mod test_utils;
