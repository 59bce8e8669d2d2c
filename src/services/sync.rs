// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity synchronization engine.
//!
//! One sync run:
//! 1. Obtain a valid access token (refreshing if needed)
//! 2. Walk the activity listing page by page from the stored watermark
//! 3. Drop activities without GPS data and ids already in the cache
//! 4. Append the rest and persist the cache with an advanced watermark

use crate::error::AppError;
use crate::models::{Activity, ActivityCache, SyncResult};
use crate::services::strava::StravaClient;
use crate::services::token::TokenManager;
use crate::store::JsonStore;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Maximum page size Strava allows; keeps the request count minimal.
const ACTIVITIES_PER_PAGE: u32 = 200;

/// Stop paging once the 15-minute usage counter reaches this.
/// Below Strava's hard cap of 100 to leave headroom for other callers.
const RATE_LIMIT_SHORT_THRESHOLD: u32 = 90;

/// Stop paging once the daily usage counter reaches this (hard cap 1000).
const RATE_LIMIT_DAILY_THRESHOLD: u32 = 900;

/// Orchestrates token management, fetching, dedup and persistence.
#[derive(Clone)]
pub struct SyncService {
    strava: StravaClient,
    tokens: TokenManager,
    store: JsonStore,
    /// Serializes sync runs; overlapping calls would double-count
    /// pages and race on the cache write.
    sync_lock: Arc<Mutex<()>>,
}

impl SyncService {
    pub fn new(strava: StravaClient, store: JsonStore) -> Self {
        let tokens = TokenManager::new(strava.clone(), store.clone());
        Self {
            strava,
            tokens,
            store,
            sync_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run one sync: fetch everything new since the watermark, merge it
    /// into the cache, and persist.
    ///
    /// Any token or fetch failure aborts before the cache is touched,
    /// leaving both the activities and the watermark as they were.
    pub async fn sync(&self) -> Result<SyncResult, AppError> {
        let _guard = self.sync_lock.lock().await;

        let access_token = self.tokens.valid_access_token().await?;

        let mut cache = self.store.read_activities().await;
        let mut known_ids = cache.known_ids();

        let new_activities = self
            .fetch_since(cache.last_fetched_at, &access_token, &mut known_ids)
            .await?;

        let added = new_activities.len();
        cache.activities.extend(new_activities);
        // The watermark moves to "now", not to the newest fetched
        // activity. After a rate-limit stop this permanently skips
        // anything between the last page reached and now (known
        // limitation, see DESIGN.md).
        cache.last_fetched_at = chrono::Utc::now().timestamp();
        self.store.write_activities(&cache).await?;

        tracing::info!(added, total = cache.activities.len(), "Sync complete");

        Ok(SyncResult {
            added,
            total: cache.activities.len(),
        })
    }

    /// The persisted cache, verbatim.
    pub async fn current_activities(&self) -> ActivityCache {
        self.store.read_activities().await
    }

    /// Walk the listing endpoint from `after`, newest pages first per
    /// Strava's ordering, collecting activities not yet in `known_ids`.
    ///
    /// `known_ids` also picks up every accepted id, so overlapping
    /// pages within one run cannot produce duplicates.
    async fn fetch_since(
        &self,
        after: i64,
        access_token: &str,
        known_ids: &mut HashSet<u64>,
    ) -> Result<Vec<Activity>, AppError> {
        let mut accepted = Vec::new();
        let mut page = 1u32;

        loop {
            let batch = self
                .strava
                .list_activities(access_token, after, page, ACTIVITIES_PER_PAGE)
                .await?;

            let rate_limited = batch.rate_limit.is_some_and(|usage| {
                let near_cap = usage.short >= RATE_LIMIT_SHORT_THRESHOLD
                    || usage.daily >= RATE_LIMIT_DAILY_THRESHOLD;
                if near_cap {
                    tracing::warn!(
                        short = usage.short,
                        daily = usage.daily,
                        "Approaching Strava rate limits, stopping fetch after this page"
                    );
                }
                near_cap
            });

            let full_page = batch.activities.len() == ACTIVITIES_PER_PAGE as usize;

            for act in batch.activities {
                // No track means no GPS data (indoor activity); skip.
                let Some(polyline) = act.summary_polyline() else {
                    continue;
                };
                // `after`-based pages can overlap; ids already seen in
                // the cache or earlier in this run are skipped.
                if !known_ids.insert(act.id) {
                    continue;
                }

                accepted.push(Activity {
                    id: act.id,
                    sport_type: act.sport_type,
                    start_date: act.start_date,
                    polyline: polyline.to_string(),
                });
            }

            if !full_page || rate_limited {
                break;
            }
            page += 1;
        }

        Ok(accepted)
    }
}
