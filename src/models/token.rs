// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stored OAuth token record.

use serde::{Deserialize, Serialize};

/// The single persisted Strava OAuth grant.
///
/// Replaced wholesale on code exchange and on refresh; there is never
/// more than one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as Unix epoch seconds
    pub expires_at: i64,
    /// Strava athlete the grant belongs to
    pub athlete_id: u64,
}
