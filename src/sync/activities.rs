//! Live-tail polling of one session's activity log
//!
//! An [`ActivityPoller`] owns the activity buffer for a single open session.
//! Once started it runs one background task that, every interval, fetches the
//! session status and the newest activity page and merges new entries onto
//! the end of the buffer. Older history is pulled on demand with
//! [`ActivityPoller::load_older`]. Polling ends for good when the session
//! reaches a terminal status, when [`ActivityPoller::stop`] is called, or
//! when the poller is dropped.
//!
//! Every buffer mutation happens under one mutex which is never held across
//! an `.await`. The cancellation token is re-checked under that mutex before
//! anything publishes, so no snapshot follows `stop()` or drop.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::merge::{merge_activities, MergeDirection};
use super::sessions::SessionListSync;
use super::InFlightGuard;
use crate::api::{Activity, Page, Session, TaskApi};
use crate::config::PollConfig;
use crate::error::{Result, SyncError};

/// Lifecycle of a poller. `Stopped` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// Created, not yet started.
    #[default]
    Idle,
    /// The poll loop is running.
    Polling,
    /// Polling has ended; start a new poller to poll again.
    Stopped,
}

/// Published view of an open session.
#[derive(Debug, Clone, Default)]
pub struct ActivityState {
    /// Buffered activities, oldest first.
    pub activities: Arc<Vec<Activity>>,
    /// Latest known session record.
    pub session: Option<Session>,
    /// Latest known session status.
    pub session_status: Option<String>,
    /// Poll lifecycle.
    pub poll_state: PollState,
    /// A `load_older` request is in flight.
    pub is_loading_older: bool,
    /// Older history can be requested.
    pub has_older: bool,
    /// Failure of the most recent tick, cleared by the next successful one.
    pub last_error: Option<String>,
    /// Completion time of the most recent successful tick.
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl ActivityState {
    /// Returns `true` while the poll loop is running.
    pub fn is_polling(&self) -> bool {
        self.poll_state == PollState::Polling
    }
}

/// Poll cadence and stop condition.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Pause between the end of one tick and the start of the next.
    pub interval: Duration,
    /// Upper-cased statuses that end polling.
    pub terminal_states: HashSet<String>,
}

impl PollSettings {
    /// Creates settings; status names are upper-cased.
    pub fn new<I, S>(interval: Duration, terminal_states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            interval,
            terminal_states: terminal_states
                .into_iter()
                .map(|s| s.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    /// Builds settings from the `poll` configuration section.
    pub fn from_config(config: &PollConfig) -> Self {
        Self {
            interval: config.interval(),
            terminal_states: config.terminal_set(),
        }
    }

    /// Case-insensitive terminal check.
    pub fn is_terminal(&self, status: &str) -> bool {
        self.terminal_states.contains(&status.to_uppercase())
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::from_config(&PollConfig::default())
    }
}

struct Buffer {
    activities: Arc<Vec<Activity>>,
    older_cursor: Option<String>,
    captured_cursor: bool,
    poll_state: PollState,
}

struct PollerInner {
    api: Arc<dyn TaskApi>,
    settings: PollSettings,
    session_list: OnceLock<Arc<SessionListSync>>,
    session_id: OnceLock<String>,
    buffer: Mutex<Buffer>,
    loading_older: AtomicBool,
    cancel: CancellationToken,
    state_tx: watch::Sender<ActivityState>,
}

/// Activity synchronizer for one session.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use julesync::api::HttpTaskApi;
/// use julesync::config::ApiConfig;
/// use julesync::credentials::KeyringCredentialStore;
/// use julesync::sync::{ActivityPoller, PollSettings};
///
/// # async fn example() -> julesync::error::Result<()> {
/// let api = Arc::new(HttpTaskApi::new(
///     &ApiConfig::default(),
///     Arc::new(KeyringCredentialStore::default()),
/// )?);
/// let poller = ActivityPoller::new(api, PollSettings::default());
/// poller.start("12345")?;
///
/// let mut updates = poller.subscribe();
/// while updates.changed().await.is_ok() {
///     let state = updates.borrow_and_update().clone();
///     println!("{} activities", state.activities.len());
///     if !state.is_polling() {
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ActivityPoller {
    inner: Arc<PollerInner>,
}

impl ActivityPoller {
    /// Creates an idle poller.
    pub fn new(api: Arc<dyn TaskApi>, settings: PollSettings) -> Self {
        let (state_tx, _) = watch::channel(ActivityState::default());
        Self {
            inner: Arc::new(PollerInner {
                api,
                settings,
                session_list: OnceLock::new(),
                session_id: OnceLock::new(),
                buffer: Mutex::new(Buffer {
                    activities: Arc::new(Vec::new()),
                    older_cursor: None,
                    captured_cursor: false,
                    poll_state: PollState::Idle,
                }),
                loading_older: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                state_tx,
            }),
        }
    }

    /// Mirrors every session record this poller learns about into `list`.
    ///
    /// Only the first attached list is used.
    pub fn with_session_list(self, list: Arc<SessionListSync>) -> Self {
        if self.inner.session_list.set(list).is_err() {
            tracing::warn!("Poller already mirrors a session list; ignoring another");
        }
        self
    }

    /// Starts polling `session_id`; the first tick runs immediately.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidState` unless the poller is idle.
    pub fn start(&self, session_id: &str) -> Result<()> {
        {
            let mut buffer = self.inner.lock_buffer();
            if buffer.poll_state != PollState::Idle {
                return Err(SyncError::InvalidState(format!(
                    "cannot start a poller that is {:?}",
                    buffer.poll_state
                ))
                .into());
            }
            if self.inner.session_id.set(session_id.to_string()).is_err() {
                return Err(SyncError::InvalidState("poller already has a session".into()).into());
            }
            buffer.poll_state = PollState::Polling;
            self.inner
                .state_tx
                .send_modify(|state| state.poll_state = PollState::Polling);
        }

        tracing::info!(session_id, "Starting activity poller");
        let inner = self.inner.clone();
        tokio::spawn(inner.run());
        Ok(())
    }

    /// Stops polling and closes the view. Idempotent; nothing publishes
    /// after this returns, including requests still in flight.
    pub fn stop(&self) {
        self.inner.cancel.cancel();
        let mut buffer = self.inner.lock_buffer();
        let was_stopped = buffer.poll_state == PollState::Stopped;
        buffer.poll_state = PollState::Stopped;
        self.inner.state_tx.send_if_modified(|state| {
            let changed = state.poll_state != PollState::Stopped || state.is_loading_older;
            state.poll_state = PollState::Stopped;
            state.is_loading_older = false;
            changed
        });
        if !was_stopped {
            tracing::debug!("Activity poller stopped");
        }
    }

    /// Fetches the page before the oldest buffered one and prepends it.
    ///
    /// Returns the number of activities added. Does nothing (returns 0) when
    /// there is no older page or a call is already in flight.
    pub async fn load_older(&self) -> Result<usize> {
        let inner = &self.inner;
        let Some(_guard) = InFlightGuard::acquire(&inner.loading_older).map(|guard| {
            guard.on_release(|| {
                inner
                    .state_tx
                    .send_if_modified(|state| std::mem::replace(&mut state.is_loading_older, false));
            })
        }) else {
            return Ok(0);
        };
        let Some(session_id) = inner.session_id.get() else {
            return Ok(0);
        };
        let cursor = {
            let buffer = inner.lock_buffer();
            if inner.cancel.is_cancelled() {
                return Ok(0);
            }
            let Some(cursor) = buffer.older_cursor.clone() else {
                return Ok(0);
            };
            inner
                .state_tx
                .send_modify(|state| state.is_loading_older = true);
            cursor
        };

        let result = inner.api.list_activities(session_id, Some(&cursor)).await;

        let mut buffer = inner.lock_buffer();
        if inner.cancel.is_cancelled() {
            tracing::debug!(session_id = %session_id, "Discarding older page after stop");
            return Ok(0);
        }
        let Page {
            items,
            next_page_token,
        } = result?;

        let before = buffer.activities.len();
        if let Some(merged) = merge_activities(&buffer.activities, items, MergeDirection::Prepend) {
            buffer.activities = Arc::new(merged);
        }
        buffer.older_cursor = next_page_token;
        let added = buffer.activities.len() - before;

        let activities = buffer.activities.clone();
        let has_older = buffer.older_cursor.is_some();
        inner.state_tx.send_modify(|state| {
            state.activities = activities;
            state.has_older = has_older;
            state.is_loading_older = false;
        });

        tracing::debug!(session_id = %session_id, added, "Loaded older activities");
        Ok(added)
    }

    /// Posts a user message and appends the created activity.
    ///
    /// If a live-tail tick already delivered the same activity it is not
    /// added twice. On failure the buffer is unchanged and `text` remains
    /// with the caller for a retry.
    pub async fn send_message(&self, text: &str) -> Result<Activity> {
        let session_id = self.inner.require_session_id()?;
        let activity = self.inner.api.create_activity(session_id, text).await?;

        let mut buffer = self.inner.lock_buffer();
        if self.inner.cancel.is_cancelled() {
            return Ok(activity);
        }
        if let Some(merged) = merge_activities(
            &buffer.activities,
            vec![activity.clone()],
            MergeDirection::Append,
        ) {
            let merged = Arc::new(merged);
            buffer.activities = merged.clone();
            self.inner
                .state_tx
                .send_modify(|state| state.activities = merged);
        }
        Ok(activity)
    }

    /// Asks the service to cancel the session and records the returned
    /// session. Polling continues until a terminal status is observed.
    pub async fn cancel_session(&self) -> Result<Session> {
        let session_id = self.inner.require_session_id()?;
        let session = self.inner.api.cancel_session(session_id).await?;

        {
            let _buffer = self.inner.lock_buffer();
            if !self.inner.cancel.is_cancelled() {
                let updated = session.clone();
                self.inner.state_tx.send_modify(|state| {
                    state.session_status = updated.status.clone();
                    state.session = Some(updated);
                });
            }
        }
        if let Some(list) = self.inner.session_list.get() {
            list.apply_session_update(&session);
        }
        tracing::info!(session_id, "Requested session cancellation");
        Ok(session)
    }

    /// The session this poller was started for.
    pub fn session_id(&self) -> Option<&str> {
        self.inner.session_id.get().map(String::as_str)
    }

    /// Current published state.
    pub fn snapshot(&self) -> ActivityState {
        self.inner.state_tx.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ActivityState> {
        self.inner.state_tx.subscribe()
    }
}

impl Drop for ActivityPoller {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

impl PollerInner {
    fn lock_buffer(&self) -> MutexGuard<'_, Buffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_session_id(&self) -> Result<&str> {
        self.session_id
            .get()
            .map(String::as_str)
            .ok_or_else(|| SyncError::InvalidState("poller has not been started".into()).into())
    }

    async fn run(self: Arc<Self>) {
        let Some(session_id) = self.session_id.get().cloned() else {
            return;
        };

        loop {
            if self.tick(&session_id).await {
                break;
            }
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
        }

        tracing::debug!(session_id = %session_id, "Poll loop exited");
    }

    /// Runs one poll cycle. Returns `true` when polling must end.
    ///
    /// A session fetched before the activity request failed is still
    /// applied, so a terminal status ends polling on this tick.
    async fn tick(&self, session_id: &str) -> bool {
        let session = match self.until_cancelled(self.api.get_session(session_id)).await {
            None => return true,
            Some(Ok(session)) => session,
            Some(Err(e)) => return self.report_error(session_id, e),
        };
        let page = match self
            .until_cancelled(self.api.list_activities(session_id, None))
            .await
        {
            None => return true,
            Some(page) => page,
        };
        self.apply_tick(session_id, session, page)
    }

    /// Awaits `request` unless the poller is cancelled first.
    async fn until_cancelled<T>(&self, request: impl Future<Output = Result<T>>) -> Option<Result<T>> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = request => Some(result),
        }
    }

    fn report_error(&self, session_id: &str, error: anyhow::Error) -> bool {
        let message = format!("{:#}", error);
        tracing::warn!(session_id, error = %message, "Activity poll failed");
        let _buffer = self.lock_buffer();
        if self.cancel.is_cancelled() {
            return true;
        }
        self.state_tx.send_if_modified(|state| {
            let changed = state.last_error.as_deref() != Some(message.as_str());
            state.last_error = Some(message);
            changed
        });
        false
    }

    fn apply_tick(&self, session_id: &str, session: Session, page: Result<Page<Activity>>) -> bool {
        let (items, next_page_token, error) = match page {
            Ok(Page {
                items,
                next_page_token,
            }) => (items, next_page_token, None),
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!(session_id, error = %message, "Activity poll failed");
                (Vec::new(), None, Some(message))
            }
        };

        let terminal = {
            let mut buffer = self.lock_buffer();
            if self.cancel.is_cancelled() {
                return true;
            }

            let merged = merge_activities(&buffer.activities, items, MergeDirection::Append);
            let added = merged.is_some();
            if let Some(merged) = merged {
                buffer.activities = Arc::new(merged);
            }
            if error.is_none() && !buffer.captured_cursor {
                buffer.captured_cursor = true;
                buffer.older_cursor = next_page_token;
            }

            let terminal = session
                .status
                .as_deref()
                .is_some_and(|status| self.settings.is_terminal(status));
            if terminal {
                buffer.poll_state = PollState::Stopped;
            }

            if let Some(list) = self.session_list.get() {
                list.apply_session_update(&session);
            }

            let activities = buffer.activities.clone();
            let has_older = buffer.older_cursor.is_some();
            let poll_state = buffer.poll_state;
            let updated = session.clone();
            self.state_tx.send_if_modified(|state| {
                let changed = added
                    || state.session.as_ref() != Some(&updated)
                    || state.last_error != error
                    || state.has_older != has_older
                    || state.poll_state != poll_state;
                state.activities = activities;
                state.session_status = updated.status.clone();
                state.session = Some(updated);
                state.has_older = has_older;
                state.poll_state = poll_state;
                if error.is_none() {
                    state.last_synced_at = Some(Utc::now());
                }
                state.last_error = error;
                changed
            });

            if added {
                tracing::debug!(count = buffer.activities.len(), "Merged live activities");
            }
            terminal
        };

        if terminal {
            tracing::info!(
                session_id,
                status = session.status.as_deref().unwrap_or_default(),
                "Session reached terminal status"
            );
        }
        terminal
    }
}
