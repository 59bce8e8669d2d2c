// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Business logic services.

pub mod stats;
pub mod strava;
pub mod sync;
pub mod token;

pub use stats::{calculate_stats, SportCategory, StatsByCategory};
pub use strava::StravaClient;
pub use sync::SyncService;
pub use token::TokenManager;
