use crate::api::{CreateSessionRequest, Session};
use crate::cli::SessionCommand;
use crate::config::Config;
use crate::context::SyncContext;
use crate::display::{format_ordinal_date, short_repo_name};
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

const MAX_TITLE_CHARS: usize = 40;

/// Handle session commands
pub async fn handle_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let ctx = SyncContext::from_config(config)?;

    match command {
        SessionCommand::List { refresh, all } => {
            let first = ctx.sessions().load(refresh).await?;
            let mut has_more = first.has_more();
            while all && has_more {
                let page = ctx.sessions().load_more().await?;
                has_more = page.has_more();
            }

            let state = ctx.sessions().snapshot();
            if state.sessions.is_empty() {
                println!("{}", "No sessions found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Status".bold(),
                "Source".bold(),
                "Created".bold()
            ]);
            for session in state.sessions.iter() {
                let [id, title, status, source, created] = session_row(session);
                table.add_row(prettytable::row![id.cyan(), title, status, source, created]);
            }

            println!("\nSessions:");
            table.printstd();
            if state.has_more {
                println!("More sessions available; use {}.", "--all".cyan());
            }
            println!();
        }
        SessionCommand::Create {
            prompt,
            source,
            branch,
            automation_mode,
            require_plan_approval,
        } => {
            let mut request = CreateSessionRequest::new(prompt);
            if let Some(source) = source {
                request = request.with_source(source, branch);
            }
            if let Some(mode) = automation_mode {
                request = request.with_automation_mode(mode);
            }
            if require_plan_approval {
                request = request.with_plan_approval(true);
            }

            let session = ctx.create_session(&request).await?;
            println!(
                "{} {} ({})",
                "Created session".green(),
                session.id.cyan(),
                session.display_name()
            );
            println!("Follow it with {}.", format!("julesync watch {}", session.id).cyan());
        }
        SessionCommand::Delete { id } => {
            ctx.sessions().delete(&id).await?;
            println!("{}", format!("Deleted session {}", id).green());
        }
        SessionCommand::Cancel { id } => {
            let poller = ctx.open_session(&id)?;
            let session = poller.cancel_session().await?;
            poller.stop();
            println!(
                "{} {} ({})",
                "Cancellation requested for".green(),
                session.id.cyan(),
                session.status.as_deref().unwrap_or("unknown status")
            );
        }
    }

    Ok(())
}

/// Table cells for one session: id, title, status, source, created.
fn session_row(session: &Session) -> [String; 5] {
    let title = session.display_name();
    let title = if title.chars().count() > MAX_TITLE_CHARS {
        let truncated: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    };
    let status = session.status.clone().unwrap_or_else(|| "-".to_string());
    let source = session
        .source_ref()
        .map(short_repo_name)
        .unwrap_or_else(|| "-".to_string());
    let created = session
        .created_at()
        .map(|date| format_ordinal_date(&date))
        .unwrap_or_else(|| "-".to_string());
    [session.id.clone(), title, status, source, created]
}
