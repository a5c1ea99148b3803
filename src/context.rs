//! Composition root
//!
//! [`SyncContext`] builds the HTTP client, credential store, key-value store,
//! session list, and recent-items cache from a [`Config`], and hands out
//! activity pollers wired to the shared session list.

use std::sync::Arc;

use crate::api::{CreateSessionRequest, HttpTaskApi, Session, Source, TaskApi};
use crate::config::Config;
use crate::credentials::{CredentialStore, KeyringCredentialStore, MemoryCredentialStore};
use crate::error::Result;
use crate::recent::RecentItems;
use crate::storage::{KeyValueStore, SledStore};
use crate::sync::{ActivityPoller, PollSettings, SessionListSync};

/// Owns every long-lived synchronizer for one process.
pub struct SyncContext {
    api: Arc<HttpTaskApi>,
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<SessionListSync>,
    recent: RecentItems,
    poll_settings: PollSettings,
}

impl SyncContext {
    /// Builds a context with the production stores.
    ///
    /// An API key present in the configuration is held in memory; otherwise
    /// the OS keyring is used. The key-value store opens at
    /// `storage.path`, or the platform data directory when unset.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be opened or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials: Arc<dyn CredentialStore> = match &config.api.api_key {
            Some(key) => Arc::new(MemoryCredentialStore::with_key(key.clone())),
            None => Arc::new(KeyringCredentialStore::default()),
        };
        let store_path = match &config.storage.path {
            Some(path) => path.clone(),
            None => SledStore::default_path()?,
        };
        let store = Arc::new(SledStore::open(store_path)?);
        Self::new(config, credentials, store)
    }

    /// Builds a context over explicit stores.
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let api = Arc::new(HttpTaskApi::new(&config.api, credentials.clone())?);
        let sessions = Arc::new(SessionListSync::new(api.clone()));
        Ok(Self {
            api,
            credentials,
            sessions,
            recent: RecentItems::new(store),
            poll_settings: PollSettings::from_config(&config.poll),
        })
    }

    /// The REST client.
    pub fn api(&self) -> &HttpTaskApi {
        &self.api
    }

    /// The shared session list.
    pub fn sessions(&self) -> &Arc<SessionListSync> {
        &self.sessions
    }

    /// The recent-items cache.
    pub fn recent(&self) -> &RecentItems {
        &self.recent
    }

    /// Opens a session view: a started poller whose status updates also
    /// reach the session list.
    pub fn open_session(&self, session_id: &str) -> Result<ActivityPoller> {
        let poller = ActivityPoller::new(self.api.clone(), self.poll_settings.clone())
            .with_session_list(self.sessions.clone());
        poller.start(session_id)?;
        Ok(poller)
    }

    /// Creates a session and records its source as recently used.
    ///
    /// A failure to record the source is logged, not returned, because the
    /// session already exists remotely.
    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        let session = self.sessions.create(request).await?;
        if let Some(source) = request.source_ref() {
            if let Err(e) = self.recent.add(source) {
                tracing::warn!("Failed to record recent source {}: {:#}", source, e);
            }
        }
        Ok(session)
    }

    /// Lists the repositories sessions can target.
    pub async fn list_sources(&self) -> Result<Vec<Source>> {
        self.api.list_sources().await
    }

    /// Stores a new API key.
    pub fn save_api_key(&self, key: &str) -> Result<()> {
        self.credentials.save_api_key(key)?;
        tracing::info!("API key saved");
        Ok(())
    }

    /// Removes the API key and forgets every cached session.
    pub fn clear_api_key(&self) -> Result<()> {
        self.credentials.clear_api_key()?;
        self.sessions.clear();
        tracing::info!("API key cleared");
        Ok(())
    }

    /// Returns `true` when a non-empty API key is available.
    pub fn has_api_key(&self) -> Result<bool> {
        Ok(self
            .credentials
            .api_key()?
            .is_some_and(|key| !key.is_empty()))
    }
}
