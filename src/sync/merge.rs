//! Identity-based merging of activity pages into a buffer

use std::collections::HashSet;

use crate::api::Activity;

/// Where a fetched page lands relative to the existing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDirection {
    /// Newest entries (live tail, sent messages) go after the buffer.
    Append,
    /// Older entries (backward pagination) go before the buffer.
    Prepend,
}

/// Merges `incoming` into `current`, dropping entries whose identity is
/// already present in either the buffer or earlier in the same page.
///
/// Entries without an identity are always kept. Returns `None` when nothing
/// new was added, so callers can skip publishing.
pub fn merge_activities(
    current: &[Activity],
    incoming: Vec<Activity>,
    direction: MergeDirection,
) -> Option<Vec<Activity>> {
    let mut seen: HashSet<&str> = current.iter().filter_map(Activity::identity).collect();

    let fresh: Vec<&Activity> = incoming
        .iter()
        .filter(|activity| match activity.identity() {
            Some(identity) => seen.insert(identity),
            None => true,
        })
        .collect();

    if fresh.is_empty() {
        return None;
    }

    let mut merged = Vec::with_capacity(current.len() + fresh.len());
    match direction {
        MergeDirection::Append => {
            merged.extend_from_slice(current);
            merged.extend(fresh.into_iter().cloned());
        }
        MergeDirection::Prepend => {
            merged.extend(fresh.into_iter().cloned());
            merged.extend_from_slice(current);
        }
    }
    Some(merged)
}
