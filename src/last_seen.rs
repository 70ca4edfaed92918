//! Last-seen marker
//!
//! Remembers the newest item the user has acknowledged in a namespace so
//! that anything first seen after it can be flagged as new.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSeen {
    namespace: String,
    last_seen_at: Option<i64>,
}

impl LastSeen {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            last_seen_at: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Epoch milliseconds of the newest acknowledged item
    pub fn last_seen(&self) -> Option<i64> {
        self.last_seen_at
    }

    /// Advance the marker; never moves backwards
    ///
    /// Returns `true` if the marker changed.
    pub fn mark_seen(&mut self, at: i64) -> bool {
        if self.last_seen_at.map_or(false, |seen| seen >= at) {
            return false;
        }

        log::debug!("Marking {} seen up to {}", self.namespace, at);
        self.last_seen_at = Some(at);
        true
    }

    /// Advance the marker to the current wall-clock time
    pub fn mark_seen_now(&mut self) -> bool {
        self.mark_seen(chrono::Utc::now().timestamp_millis())
    }

    pub fn is_unseen(&self, first_seen_at: i64) -> bool {
        self.last_seen_at.map_or(true, |seen| first_seen_at > seen)
    }
}
