// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::TokenRecord;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/strava", get(auth_start))
        .route("/auth/strava/callback", get(auth_callback))
}

/// Start OAuth flow - redirect to Strava authorization.
async fn auth_start(State(state): State<Arc<AppState>>) -> Redirect {
    let auth_url = format!(
        "https://www.strava.com/oauth/authorize?\
         client_id={}&\
         redirect_uri={}&\
         response_type=code&\
         scope=activity:read_all",
        state.config.strava_client_id,
        urlencoding::encode(&state.config.redirect_uri),
    );

    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting OAuth flow, redirecting to Strava"
    );

    Redirect::temporary(&auth_url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens and store the grant.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth flow denied");
        return Err(AppError::BadRequest(format!("Authorization denied: {}", error)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing code parameter".to_string()))?;

    let exchange = state.strava.exchange_code(&code).await?;

    let token = TokenRecord {
        access_token: exchange.access_token,
        refresh_token: exchange.refresh_token,
        expires_at: exchange.expires_at,
        athlete_id: exchange.athlete.id,
    };
    state.store.write_token(&token).await?;

    tracing::info!(athlete_id = token.athlete_id, "OAuth grant stored");

    Ok(Redirect::to("/"))
}
