// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: a mock Strava server and app builders.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use ridemap::config::Config;
use ridemap::models::TokenRecord;
use ridemap::services::{StravaClient, SyncService};
use ridemap::store::JsonStore;
use ridemap::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Mutable behavior of the mock Strava server.
#[derive(Default)]
pub struct MockStravaState {
    /// Listing pages, 1-based; pages beyond the end return `[]`.
    pub pages: Mutex<Vec<Value>>,
    /// `x-ratelimit-usage` header value for listing responses.
    pub rate_limit_header: Mutex<Option<String>>,
    /// Non-200 makes the listing endpoint fail with this status.
    pub list_status: Mutex<Option<u16>>,
    /// When true, refresh requests are rejected with HTTP 400.
    pub reject_refresh: Mutex<bool>,
    pub list_requests: AtomicU32,
    pub refresh_requests: AtomicU32,
}

pub struct MockStrava {
    pub base: String,
    pub state: Arc<MockStravaState>,
}

impl MockStrava {
    /// A `StravaClient` pointed at this mock server.
    pub fn client(&self) -> StravaClient {
        StravaClient::with_base_urls(
            "test_client_id".to_string(),
            "test_secret".to_string(),
            format!("{}/api/v3", self.base),
            format!("{}/oauth", self.base),
        )
    }

    pub fn set_pages(&self, pages: Vec<Value>) {
        *self.state.pages.lock().unwrap() = pages;
    }

    pub fn set_rate_limit(&self, header: &str) {
        *self.state.rate_limit_header.lock().unwrap() = Some(header.to_string());
    }

    pub fn fail_listing(&self, status: u16) {
        *self.state.list_status.lock().unwrap() = Some(status);
    }

    pub fn reject_refresh(&self) {
        *self.state.reject_refresh.lock().unwrap() = true;
    }

    pub fn list_requests(&self) -> u32 {
        self.state.list_requests.load(Ordering::SeqCst)
    }
}

async fn mock_list_activities(
    State(state): State<Arc<MockStravaState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.list_requests.fetch_add(1, Ordering::SeqCst);

    if let Some(status) = *state.list_status.lock().unwrap() {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, "mock listing failure").into_response();
    }

    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let body = state
        .pages
        .lock()
        .unwrap()
        .get(page.saturating_sub(1))
        .cloned()
        .unwrap_or_else(|| json!([]));

    let mut response = Json(body).into_response();
    if let Some(header) = state.rate_limit_header.lock().unwrap().clone() {
        response
            .headers_mut()
            .insert("x-ratelimit-usage", header.parse().unwrap());
    }
    response
}

async fn mock_oauth_token(
    State(state): State<Arc<MockStravaState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let expires_at = chrono::Utc::now().timestamp() + 21_600;

    match params.get("grant_type").map(String::as_str) {
        Some("refresh_token") => {
            state.refresh_requests.fetch_add(1, Ordering::SeqCst);
            if *state.reject_refresh.lock().unwrap() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"message": "invalid_grant"})),
                )
                    .into_response();
            }
            Json(json!({
                "access_token": "refreshed_access",
                "refresh_token": "refreshed_refresh",
                "expires_at": expires_at,
            }))
            .into_response()
        }
        Some("authorization_code") => Json(json!({
            "access_token": "exchanged_access",
            "refresh_token": "exchanged_refresh",
            "expires_at": expires_at,
            "athlete": {"id": 4242},
        }))
        .into_response(),
        _ => (StatusCode::BAD_REQUEST, "unsupported grant_type").into_response(),
    }
}

/// Bind a mock Strava server on an ephemeral port.
pub async fn spawn_mock_strava() -> MockStrava {
    let state = Arc::new(MockStravaState::default());
    let router = Router::new()
        .route("/api/v3/athlete/activities", get(mock_list_activities))
        .route("/oauth/token", post(mock_oauth_token))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });

    MockStrava {
        base: format!("http://{}", addr),
        state,
    }
}

/// A listing-endpoint activity payload.
#[allow(dead_code)]
pub fn activity_json(id: u64, sport_type: &str, polyline: Option<&str>) -> Value {
    json!({
        "id": id,
        "sport_type": sport_type,
        "start_date": "2026-05-01T10:00:00Z",
        "map": {"summary_polyline": polyline},
    })
}

/// A full page of 200 distinct activities with ids starting at `first_id`.
#[allow(dead_code)]
pub fn full_page(first_id: u64) -> Value {
    let items: Vec<Value> = (0..200)
        .map(|i| activity_json(first_id + i, "Ride", Some("abcd")))
        .collect();
    json!(items)
}

/// A sync service wired to the mock server and a temp data dir.
#[allow(dead_code)]
pub fn sync_service(mock: &MockStrava, dir: &tempfile::TempDir) -> (SyncService, JsonStore) {
    let store = JsonStore::new(dir.path());
    (SyncService::new(mock.client(), store.clone()), store)
}

/// A token record that will not need a refresh.
#[allow(dead_code)]
pub fn fresh_token() -> TokenRecord {
    TokenRecord {
        access_token: "fresh_access".to_string(),
        refresh_token: "fresh_refresh".to_string(),
        expires_at: chrono::Utc::now().timestamp() + 3_600,
        athlete_id: 4242,
    }
}

/// A token record inside the refresh buffer.
#[allow(dead_code)]
pub fn expiring_token() -> TokenRecord {
    TokenRecord {
        access_token: "stale_access".to_string(),
        refresh_token: "stale_refresh".to_string(),
        expires_at: chrono::Utc::now().timestamp() + 60,
        athlete_id: 4242,
    }
}

/// Create a test app over the mock Strava server.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(mock: &MockStrava, dir: &tempfile::TempDir) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let store = JsonStore::new(dir.path());
    let strava = mock.client();
    let sync_service = SyncService::new(strava.clone(), store.clone());

    let state = Arc::new(AppState {
        config,
        store,
        strava,
        sync_service,
    });

    (ridemap::routes::create_router(state.clone()), state)
}
