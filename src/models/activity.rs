// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cached activity model for storage and API.

use serde::{Deserialize, Serialize};

/// A single stored activity.
///
/// Immutable once written; only the sync engine creates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID (globally unique, remote-assigned)
    pub id: u64,
    /// Sport type (Ride, Run, Hike, etc.)
    pub sport_type: String,
    /// Start date/time as Strava sends it (ISO 8601)
    pub start_date: String,
    /// Encoded GPS track (Google polyline, precision 5)
    pub polyline: String,
}

/// The on-disk activity cache.
///
/// `activities` is append-only in insertion order. `last_fetched_at`
/// is the watermark used as the `after` bound of the next sync; it
/// only ever moves forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCache {
    pub last_fetched_at: i64,
    pub activities: Vec<Activity>,
}

impl Default for ActivityCache {
    /// Empty cache for a first run: watermark 0 fetches everything.
    fn default() -> Self {
        Self {
            last_fetched_at: 0,
            activities: Vec::new(),
        }
    }
}

impl ActivityCache {
    /// Ids of all activities already in the cache.
    pub fn known_ids(&self) -> std::collections::HashSet<u64> {
        self.activities.iter().map(|a| a.id).collect()
    }
}

/// Outcome of one sync run, returned to the caller but never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyncResult {
    /// Activities appended by this run
    pub added: usize,
    /// Total activities in the cache after the run
    pub total: usize,
}
