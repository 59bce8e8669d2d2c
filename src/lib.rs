// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ridemap: a self-hosted mirror of your Strava activity history.
//!
//! This crate provides the backend that keeps a local cache of the
//! athlete's activities in sync with Strava and serves it to the
//! map front-end.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use services::{StravaClient, SyncService};
use store::JsonStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: JsonStore,
    pub strava: StravaClient,
    pub sync_service: SyncService,
}
