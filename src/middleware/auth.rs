// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication guard for the API routes.
//!
//! This is a single-user application: a request is authenticated when
//! a Strava grant exists on disk. Token validity itself is enforced by
//! the token manager when the grant is used.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Middleware that rejects API requests until the OAuth flow has run.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !state.store.token_exists().await {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
