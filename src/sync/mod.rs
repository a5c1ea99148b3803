//! Client-side synchronizers
//!
//! - [`sessions`]: cached, paginated session list
//! - [`activities`]: per-session activity poller
//! - [`merge`]: identity-based merge shared by the poller's fetch paths

use std::sync::atomic::{AtomicBool, Ordering};

pub mod activities;
pub mod merge;
pub mod sessions;

pub use activities::{ActivityPoller, ActivityState, PollSettings, PollState};
pub use merge::{merge_activities, MergeDirection};
pub use sessions::{SessionListState, SessionListSync};

/// Holds an in-flight flag and clears it however the owning future ends,
/// including when it is dropped mid-request.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    on_release: Option<Box<dyn FnOnce() + Send + 'a>>,
}

impl<'a> InFlightGuard<'a> {
    /// Sets the flag, or returns `None` if it was already set.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag,
                on_release: None,
            })
    }

    /// Runs `release` when the guard drops, before the flag is cleared.
    ///
    /// Used to retract a published "loading" marker on every exit path.
    pub(crate) fn on_release(mut self, release: impl FnOnce() + Send + 'a) -> Self {
        self.on_release = Some(Box::new(release));
        self
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.on_release.take() {
            release();
        }
        self.flag.store(false, Ordering::Release);
    }
}
