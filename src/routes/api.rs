// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the map front-end.

use crate::error::Result;
use crate::models::{ActivityCache, SyncResult};
use crate::services::{calculate_stats, StatsByCategory};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// API routes (require a stored grant).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities))
        .route("/api/sync", post(post_sync))
        .route("/api/stats", get(get_stats))
}

/// The persisted activity cache, verbatim.
async fn get_activities(State(state): State<Arc<AppState>>) -> Json<ActivityCache> {
    Json(state.sync_service.current_activities().await)
}

/// Run one sync against Strava.
async fn post_sync(State(state): State<Arc<AppState>>) -> Result<Json<SyncResult>> {
    let result = state.sync_service.sync().await?;
    Ok(Json(result))
}

/// Distance stats response.
#[derive(Serialize)]
pub struct StatsResponse {
    pub km_by_category: StatsByCategory,
    pub total_km: f64,
    pub activity_count: usize,
}

/// Per-category distance totals over the cache.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let cache = state.sync_service.current_activities().await;
    let stats = calculate_stats(&cache.activities);

    Json(StatsResponse {
        total_km: stats.total(),
        km_by_category: stats,
        activity_count: cache.activities.len(),
    })
}
