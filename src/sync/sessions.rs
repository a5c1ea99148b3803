//! Paginated, cached session list
//!
//! The first page is cached for the life of the process and served without a
//! network round-trip until a refresh is forced. Further pages are appended
//! by [`SessionListSync::load_more`], which collapses concurrent calls into a
//! single request. Observers subscribe to a `watch` channel of immutable
//! snapshots.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::InFlightGuard;
use crate::api::{CreateSessionRequest, Page, Session, TaskApi};
use crate::error::Result;

/// Published view of the session list.
#[derive(Debug, Clone, Default)]
pub struct SessionListState {
    /// Loaded sessions, first page first.
    pub sessions: Arc<Vec<Session>>,
    /// A `load_more` request is in flight.
    pub is_loading_more: bool,
    /// Another page can be requested.
    pub has_more: bool,
}

#[derive(Default)]
struct ListCache {
    sessions: Option<Arc<Vec<Session>>>,
    next_page_token: Option<String>,
    /// Bumped whenever the list is replaced or cleared, so a `load_more`
    /// that started against an older list can tell its cursor is stale.
    generation: u64,
}

/// Cached, paginated list of sessions.
pub struct SessionListSync {
    api: Arc<dyn TaskApi>,
    cache: Mutex<ListCache>,
    loading_more: AtomicBool,
    state_tx: watch::Sender<SessionListState>,
}

impl SessionListSync {
    /// Creates an empty synchronizer over `api`.
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        let (state_tx, _) = watch::channel(SessionListState::default());
        Self {
            api,
            cache: Mutex::new(ListCache::default()),
            loading_more: AtomicBool::new(false),
            state_tx,
        }
    }

    /// Returns the first page.
    ///
    /// Without `force_refresh` a cached first page is returned as-is, with
    /// its stored cursor. Otherwise the first page is fetched and replaces
    /// the whole list. A failed fetch leaves the cache untouched.
    pub async fn load(&self, force_refresh: bool) -> Result<Page<Session>> {
        if !force_refresh {
            let cache = self.lock_cache();
            if let Some(sessions) = &cache.sessions {
                tracing::debug!(count = sessions.len(), "Serving sessions from cache");
                return Ok(Page::new(
                    sessions.as_ref().clone(),
                    cache.next_page_token.clone(),
                ));
            }
        }

        let page = self.api.list_sessions(None).await?;

        {
            let mut cache = self.lock_cache();
            cache.sessions = Some(Arc::new(page.items.clone()));
            cache.next_page_token = page.next_page_token.clone();
            cache.generation += 1;
            self.publish(&cache);
        }

        tracing::info!(count = page.items.len(), "Loaded sessions");
        Ok(page)
    }

    /// Fetches the next page and appends it.
    ///
    /// Returns an empty page without a request when there is no cursor or a
    /// call is already in flight. A result that arrives after the list was
    /// replaced or cleared is dropped.
    pub async fn load_more(&self) -> Result<Page<Session>> {
        let Some(_guard) = InFlightGuard::acquire(&self.loading_more)
            .map(|guard| guard.on_release(|| self.publish_loading(false)))
        else {
            tracing::debug!("load_more already in flight");
            return Ok(Page::empty());
        };

        let (token, generation) = {
            let cache = self.lock_cache();
            match &cache.next_page_token {
                Some(token) => (token.clone(), cache.generation),
                None => return Ok(Page::empty()),
            }
        };

        self.publish_loading(true);
        let result = self.api.list_sessions(Some(&token)).await;

        let mut cache = self.lock_cache();
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.publish_state(&cache, false);
                return Err(e);
            }
        };

        if cache.generation != generation {
            tracing::debug!("Discarding stale session page");
            self.publish_state(&cache, false);
            return Ok(Page::empty());
        }

        let mut sessions = cache
            .sessions
            .as_deref()
            .cloned()
            .unwrap_or_default();
        sessions.extend(page.items.iter().cloned());
        cache.sessions = Some(Arc::new(sessions));
        cache.next_page_token = page.next_page_token.clone();
        self.publish_state(&cache, false);

        tracing::debug!(count = page.items.len(), "Appended sessions page");
        Ok(page)
    }

    /// Deletes a session remotely, then drops it from the list.
    pub async fn delete(&self, session_id: &str) -> Result<()> {
        self.api.delete_session(session_id).await?;

        let mut cache = self.lock_cache();
        if let Some(sessions) = &cache.sessions {
            let remaining: Vec<Session> = sessions
                .iter()
                .filter(|session| session.id != session_id)
                .cloned()
                .collect();
            cache.sessions = Some(Arc::new(remaining));
            self.publish(&cache);
        }
        Ok(())
    }

    /// Starts a new session. The cached list is not modified.
    pub async fn create(&self, request: &CreateSessionRequest) -> Result<Session> {
        self.api.create_session(request).await
    }

    /// Replaces the cached entry with the same id, if present.
    pub fn apply_session_update(&self, session: &Session) {
        let mut cache = self.lock_cache();
        let Some(sessions) = &cache.sessions else {
            return;
        };
        let Some(index) = sessions.iter().position(|s| s.id == session.id) else {
            return;
        };
        if sessions[index] == *session {
            return;
        }
        let mut updated = sessions.as_ref().clone();
        updated[index] = session.clone();
        cache.sessions = Some(Arc::new(updated));
        self.publish(&cache);
    }

    /// Drops the cached list and cursor.
    pub fn clear(&self) {
        let mut cache = self.lock_cache();
        cache.sessions = None;
        cache.next_page_token = None;
        cache.generation += 1;
        self.publish(&cache);
    }

    /// Returns `true` once a first page has been loaded.
    pub fn has_cached_sessions(&self) -> bool {
        self.lock_cache().sessions.is_some()
    }

    /// Current published state.
    pub fn snapshot(&self) -> SessionListState {
        self.state_tx.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionListState> {
        self.state_tx.subscribe()
    }

    fn lock_cache(&self) -> MutexGuard<'_, ListCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes the cached list, keeping the published loading flag.
    fn publish(&self, cache: &ListCache) {
        let sessions = cache.sessions.clone().unwrap_or_default();
        let has_more = cache.next_page_token.is_some();
        self.state_tx.send_modify(|state| {
            state.sessions = sessions;
            state.has_more = has_more;
        });
    }

    fn publish_state(&self, cache: &ListCache, is_loading_more: bool) {
        let state = SessionListState {
            sessions: cache.sessions.clone().unwrap_or_default(),
            is_loading_more,
            has_more: cache.next_page_token.is_some(),
        };
        self.state_tx.send_replace(state);
    }

    fn publish_loading(&self, is_loading_more: bool) {
        self.state_tx.send_if_modified(|state| {
            if state.is_loading_more == is_loading_more {
                return false;
            }
            state.is_loading_more = is_loading_more;
            true
        });
    }
}
