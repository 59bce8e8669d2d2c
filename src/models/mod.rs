// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for storage and API.

pub mod activity;
pub mod token;

pub use activity::{Activity, ActivityCache, SyncResult};
pub use token::TokenRecord;
