//! API key persistence
//!
//! The API key lives in the operating system's native credential store
//! (Keychain on macOS, Secret Service on Linux, Windows Credential Manager on
//! Windows). A key supplied through configuration or the environment is held
//! in memory instead and never written to the keyring.

use std::sync::{Mutex, PoisonError};

use crate::error::{Result, SyncError};

/// Keyring service name used for the API key.
pub const KEYRING_SERVICE: &str = "julesync";

/// Keyring account name used for the API key.
pub const KEYRING_ACCOUNT: &str = "api_key";

/// Read/write access to the stored API key.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored key, or `None` when nothing has been saved.
    fn api_key(&self) -> Result<Option<String>>;

    /// Stores `key`, replacing any previous value.
    fn save_api_key(&self, key: &str) -> Result<()>;

    /// Removes the stored key. Clearing an empty store is not an error.
    fn clear_api_key(&self) -> Result<()>;
}

/// Credential store backed by the OS keyring.
///
/// # Examples
///
/// ```no_run
/// use julesync::credentials::{CredentialStore, KeyringCredentialStore};
///
/// let store = KeyringCredentialStore::default();
/// store.save_api_key("my-key").unwrap();
/// assert_eq!(store.api_key().unwrap().as_deref(), Some("my-key"));
/// ```
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service: String,
    account: String,
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
    }
}

impl KeyringCredentialStore {
    /// Creates a store for an explicit service/account pair.
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(|e| SyncError::Keyring(e).into())
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn api_key(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SyncError::Keyring(e).into()),
        }
    }

    fn save_api_key(&self, key: &str) -> Result<()> {
        self.entry()?
            .set_password(key)
            .map_err(SyncError::Keyring)?;
        tracing::debug!("Stored API key in keyring service {}", self.service);
        Ok(())
    }

    fn clear_api_key(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SyncError::Keyring(e).into()),
        }
    }
}

/// In-process credential store.
///
/// Used when the key comes from configuration, and by tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates a store pre-populated with `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Mutex::new(Some(key.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn api_key(&self) -> Result<Option<String>> {
        Ok(self
            .key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save_api_key(&self, key: &str) -> Result<()> {
        *self.key.lock().unwrap_or_else(PoisonError::into_inner) = Some(key.to_string());
        Ok(())
    }

    fn clear_api_key(&self) -> Result<()> {
        *self.key.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
