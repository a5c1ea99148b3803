use crate::cli::RecentCommand;
use crate::config::Config;
use crate::context::SyncContext;
use crate::display::clean_source_name;
use crate::error::Result;
use colored::Colorize;

/// Handle recent-items commands
pub fn handle_recent(config: &Config, command: RecentCommand) -> Result<()> {
    let ctx = SyncContext::from_config(config)?;

    match command {
        RecentCommand::List => {
            let items = ctx.recent().get()?;
            if items.is_empty() {
                println!("{}", "No recent items.".yellow());
                return Ok(());
            }
            for (index, item) in items.iter().enumerate() {
                println!("{:>2}. {}", index + 1, clean_source_name(item).cyan());
            }
        }
        RecentCommand::Add { item } => {
            ctx.recent().add(&item)?;
            println!("{}", format!("Recorded {}", item).green());
        }
    }

    Ok(())
}
