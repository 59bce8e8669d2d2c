// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token lifecycle management.

use crate::error::AppError;
use crate::models::TokenRecord;
use crate::services::StravaClient;
use crate::store::JsonStore;

/// Margin before token expiration when we proactively refresh.
///
/// A token valid "now" may expire while a request is in flight, so
/// anything expiring within this window is refreshed first.
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 300;

/// Keeps the stored Strava grant usable.
///
/// Reads the persisted token record, refreshes it against the Strava
/// OAuth endpoint when it is close to expiry, and persists the
/// replacement before handing out the access token.
#[derive(Clone)]
pub struct TokenManager {
    client: StravaClient,
    store: JsonStore,
}

impl TokenManager {
    pub fn new(client: StravaClient, store: JsonStore) -> Self {
        Self { client, store }
    }

    /// Get an access token guaranteed to be valid for the buffer window.
    ///
    /// Fails with `NotAuthenticated` when no grant is stored, and with
    /// `TokenRefreshFailed` when Strava rejects the refresh; in the
    /// latter case the old record is left untouched.
    pub async fn valid_access_token(&self) -> Result<String, AppError> {
        let Some(token) = self.store.read_token().await else {
            return Err(AppError::NotAuthenticated);
        };

        let now = chrono::Utc::now().timestamp();
        if token.expires_at - now >= TOKEN_EXPIRY_BUFFER_SECS {
            return Ok(token.access_token);
        }

        tracing::info!(
            athlete_id = token.athlete_id,
            expires_at = token.expires_at,
            "Access token expiring, refreshing"
        );

        let refreshed = self.client.refresh_token(&token.refresh_token).await?;

        // The refresh response has no athlete object; keep the id from
        // the record being replaced.
        let replacement = TokenRecord {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token,
            expires_at: refreshed.expires_at,
            athlete_id: token.athlete_id,
        };
        self.store.write_token(&replacement).await?;

        tracing::info!(athlete_id = replacement.athlete_id, "Token refreshed");
        Ok(replacement.access_token)
    }
}
