//! Bounded most-recently-used list of item ids
//!
//! The list is read once per process from a [`KeyValueStore`] and kept as an
//! immutable snapshot. Readers take the snapshot without blocking writers for
//! longer than a pointer swap; writers serialize on a mutex, persist first,
//! and only then publish the new snapshot.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Storage key holding the serialized list.
pub const RECENT_ITEMS_KEY: &str = "recent_repos";

/// Maximum number of items kept.
pub const MAX_RECENT_ITEMS: usize = 10;

/// Most-recently-used cache of item ids, newest first.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use julesync::recent::RecentItems;
/// use julesync::storage::MemoryStore;
///
/// # fn main() -> julesync::error::Result<()> {
/// let recent = RecentItems::new(Arc::new(MemoryStore::default()));
/// recent.add("sources/github/acme/widgets")?;
/// recent.add("sources/github/acme/gadgets")?;
/// recent.add("sources/github/acme/widgets")?;
/// assert_eq!(
///     recent.get()?,
///     vec!["sources/github/acme/widgets", "sources/github/acme/gadgets"]
/// );
/// # Ok(())
/// # }
/// ```
pub struct RecentItems {
    store: Arc<dyn KeyValueStore>,
    snapshot: RwLock<Option<Arc<Vec<String>>>>,
    write_lock: Mutex<()>,
}

impl RecentItems {
    /// Creates an empty cache over `store`. Nothing is read until first use.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(None),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the current list, loading it from the store on first call.
    pub fn get(&self) -> Result<Vec<String>> {
        Ok(self.current()?.as_ref().clone())
    }

    /// Moves `item` to the front, inserting it if absent.
    ///
    /// Adding the item that is already first does nothing, not even a store
    /// write. If the store write fails the cached list is left as it was.
    pub fn add(&self, item: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = match self.published() {
            Some(list) => list,
            None => self.load_locked()?,
        };

        if current.first().map(String::as_str) == Some(item) {
            return Ok(());
        }

        let mut updated = Vec::with_capacity(MAX_RECENT_ITEMS);
        updated.push(item.to_string());
        updated.extend(current.iter().filter(|existing| *existing != item).cloned());
        updated.truncate(MAX_RECENT_ITEMS);

        self.store
            .set_string(RECENT_ITEMS_KEY, &serde_json::to_string(&updated)?)?;
        self.publish(Arc::new(updated));
        tracing::debug!(item, "Recorded recent item");
        Ok(())
    }

    /// Forgets the cached list; the next read goes back to the store.
    pub fn reset(&self) {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn current(&self) -> Result<Arc<Vec<String>>> {
        if let Some(list) = self.published() {
            return Ok(list);
        }

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // another caller may have loaded it while we waited
        match self.published() {
            Some(list) => Ok(list),
            None => self.load_locked(),
        }
    }

    /// Reads the store and publishes the result. Caller holds `write_lock`.
    fn load_locked(&self) -> Result<Arc<Vec<String>>> {
        let raw = self.store.get_string(RECENT_ITEMS_KEY)?;
        let list = Arc::new(raw.as_deref().map(decode).unwrap_or_default());
        self.publish(list.clone());
        Ok(list)
    }

    fn published(&self) -> Option<Arc<Vec<String>>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, list: Arc<Vec<String>>) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(list);
    }
}

/// Parses a stored list: JSON array, else the legacy comma-separated form.
fn decode(raw: &str) -> Vec<String> {
    let items: Vec<String> = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(_) => raw.split(',').map(|s| s.trim().to_string()).collect(),
    };

    let mut unique: Vec<String> = Vec::with_capacity(MAX_RECENT_ITEMS);
    for item in items {
        if item.is_empty() || unique.contains(&item) {
            continue;
        }
        unique.push(item);
        if unique.len() == MAX_RECENT_ITEMS {
            break;
        }
    }
    unique
}
