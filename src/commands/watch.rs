use std::time::Duration;

use colored::Colorize;

use crate::api::{Activity, ActivityKind};
use crate::config::Config;
use crate::context::SyncContext;
use crate::error::Result;
use crate::sync::{ActivityPoller, ActivityState};

const FIRST_TICK_TIMEOUT: Duration = Duration::from_secs(60);

/// Stream a session's activities until it reaches a terminal status or the
/// user presses Ctrl-C.
///
/// With `older`, the page of history preceding the newest one is loaded
/// before anything is printed.
pub async fn run_watch(config: &Config, session_id: &str, older: bool) -> Result<()> {
    let ctx = SyncContext::from_config(config)?;
    let poller = ctx.open_session(session_id)?;
    let mut updates = poller.subscribe();

    println!("Watching session {} (Ctrl-C to stop)", session_id.cyan());

    if older {
        load_older_after_first_tick(&poller, &mut updates).await;
    }

    let mut printed = 0;
    let mut last_error: Option<String> = None;
    loop {
        let state = updates.borrow_and_update().clone();
        printed = print_new(&state, printed);

        if state.last_error != last_error {
            if let Some(error) = &state.last_error {
                eprintln!("{} {}", "Sync failed, retrying:".yellow(), error);
            }
            last_error = state.last_error.clone();
        }

        if !state.is_polling() {
            let status = state.session_status.as_deref().unwrap_or("unknown");
            println!("Session finished with status {}", status.bold());
            break;
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                poller.stop();
                println!("\nStopped watching.");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    Ok(())
}

async fn load_older_after_first_tick(
    poller: &ActivityPoller,
    updates: &mut tokio::sync::watch::Receiver<ActivityState>,
) {
    let first_tick = async {
        loop {
            {
                let state = updates.borrow_and_update();
                if state.last_synced_at.is_some() || !state.is_polling() {
                    return;
                }
            }
            if updates.changed().await.is_err() {
                return;
            }
        }
    };
    if tokio::time::timeout(FIRST_TICK_TIMEOUT, first_tick)
        .await
        .is_err()
    {
        tracing::warn!("No successful sync yet; skipping older history");
        return;
    }

    match poller.load_older().await {
        Ok(added) => tracing::debug!(added, "Loaded older history"),
        Err(e) => eprintln!("{} {:#}", "Could not load older history:".yellow(), e),
    }
}

/// Prints activities past `printed`; returns the new printed count.
fn print_new(state: &ActivityState, printed: usize) -> usize {
    for activity in state.activities.iter().skip(printed) {
        println!("{}", format_activity(activity));
    }
    state.activities.len().max(printed)
}

fn format_activity(activity: &Activity) -> String {
    let label = match &activity.kind {
        ActivityKind::UserMessage(_) => "you".blue(),
        ActivityKind::AgentMessage(_) => "agent".magenta(),
        ActivityKind::PlanGenerated(_) | ActivityKind::PlanApproved { .. } => "plan".cyan(),
        ActivityKind::ProgressUpdate { .. } => "progress".normal(),
        ActivityKind::SessionCompleted => "done".green(),
        ActivityKind::SessionFailed { .. } => "failed".red(),
        ActivityKind::Generic => activity
            .originator
            .as_deref()
            .unwrap_or("activity")
            .normal(),
    };
    let time = activity
        .created_at()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    format!("[{}] {:>8}: {}", time.dimmed(), label, activity.describe())
}
