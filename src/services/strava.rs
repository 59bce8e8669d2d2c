// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - Authorization-code exchange and token refresh
//! - Paginated activity listing
//! - Rate limit usage reporting from response headers

use crate::error::AppError;
use serde::Deserialize;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base: String,
    oauth_base: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            "https://www.strava.com/api/v3".to_string(),
            "https://www.strava.com/oauth".to_string(),
        )
    }

    /// Create a client pointed at non-default endpoints (tests).
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        api_base: String,
        oauth_base: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            oauth_base,
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        let url = format!("{}/token", self.oauth_base);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("Failed to parse token response: {}", e)))
    }

    /// Refresh an expired access token.
    ///
    /// A rejection from the token endpoint means the stored grant is no
    /// longer usable, which is distinct from a transport failure.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let url = format!("{}/token", self.oauth_base);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Strava token refresh rejected");
            return Err(AppError::TokenRefreshFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("Failed to parse refresh response: {}", e)))
    }

    /// List one page of the athlete's activities created after `after`.
    ///
    /// Returns the page together with the rate-limit usage Strava
    /// reports in the response headers.
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64, // Unix timestamp
        page: u32,
        per_page: u32,
    ) -> Result<ActivityPage, AppError> {
        let url = format!("{}/athlete/activities", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        let rate_limit = response
            .headers()
            .get("x-ratelimit-usage")
            .and_then(|h| h.to_str().ok())
            .and_then(RateLimitUsage::parse);

        let activities = response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))?;

        Ok(ActivityPage {
            activities,
            rate_limit,
        })
    }
}

/// One page of the activity listing plus the rate-limit signal that
/// came with it.
#[derive(Debug, Clone)]
pub struct ActivityPage {
    pub activities: Vec<StravaActivitySummary>,
    pub rate_limit: Option<RateLimitUsage>,
}

/// Parsed `x-ratelimit-usage` header: requests consumed in the
/// 15-minute window and in the current day.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitUsage {
    pub short: u32,
    pub daily: u32,
}

impl RateLimitUsage {
    /// Parse the `"<short>,<daily>"` header value. Malformed values
    /// yield `None`, which callers treat as "no signal".
    pub fn parse(raw: &str) -> Option<Self> {
        let (short, daily) = raw.split_once(',')?;
        Some(Self {
            short: short.trim().parse().ok()?,
            daily: daily.trim().parse().ok()?,
        })
    }
}

/// Summary activity from the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    pub sport_type: String,
    pub start_date: String,
    #[serde(default)]
    pub map: Option<StravaMap>,
}

impl StravaActivitySummary {
    /// The summary polyline, if the activity has GPS data.
    ///
    /// Strava sends an empty string for activities without a track
    /// (e.g. indoor rides); that counts as absent here.
    pub fn summary_polyline(&self) -> Option<&str> {
        self.map
            .as_ref()
            .and_then(|m| m.summary_polyline.as_deref())
            .filter(|p| !p.is_empty())
    }
}

/// Activity map data with the encoded track.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaMap {
    pub summary_polyline: Option<String>,
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub athlete: StravaAthlete,
}

/// Athlete info from OAuth token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: u64,
}

/// Token refresh response from Strava.
///
/// Unlike the exchange response this carries no athlete object, so the
/// caller keeps the athlete id from the record being replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}
