//! Prior-content snapshots.

use std::collections::HashMap;

use crate::models::PostId;

/// Single-slot-per-post snapshot of the content a post had before a run.
///
/// Lives as long as its owner (the content optimizer); nothing is persisted and
/// each backup overwrites the previous one for that post.
#[derive(Debug, Default)]
pub struct VersionCache {
    slots: HashMap<PostId, String>,
}

impl VersionCache {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` for `id`, returning the snapshot it replaced.
    pub fn backup(&mut self, id: PostId, content: impl Into<String>) -> Option<String> {
        self.slots.insert(id, content.into())
    }

    /// Snapshot held for a post.
    pub fn get(&self, id: PostId) -> Option<&str> {
        self.slots.get(&id).map(String::as_str)
    }

    /// Removes and returns the snapshot for `id`.
    pub fn take(&mut self, id: PostId) -> Option<String> {
        self.slots.remove(&id)
    }

    /// Number of posts with a snapshot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no snapshot is held.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
