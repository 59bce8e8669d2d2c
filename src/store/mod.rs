// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file persistence for the token record and the activity cache.
//!
//! Reads treat a missing or unreadable file as "not yet initialized"
//! rather than an error; writes must succeed or the caller aborts.

use crate::error::AppError;
use crate::models::{ActivityCache, TokenRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

const TOKENS_FILE: &str = "tokens.json";
const ACTIVITIES_FILE: &str = "activities.json";

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Read the stored token record, if any.
    ///
    /// An unreadable or unparsable file is treated the same as an
    /// absent one; the caller decides whether that means "not
    /// authenticated".
    pub async fn read_token(&self) -> Option<TokenRecord> {
        self.read_json(&self.data_dir.join(TOKENS_FILE)).await
    }

    /// Replace the stored token record.
    pub async fn write_token(&self, token: &TokenRecord) -> Result<(), AppError> {
        self.write_json(&self.data_dir.join(TOKENS_FILE), token)
            .await
    }

    /// Whether a token record exists on disk.
    pub async fn token_exists(&self) -> bool {
        self.read_token().await.is_some()
    }

    /// Read the activity cache, falling back to an empty cache on a
    /// first run (or an unreadable file).
    pub async fn read_activities(&self) -> ActivityCache {
        self.read_json(&self.data_dir.join(ACTIVITIES_FILE))
            .await
            .unwrap_or_default()
    }

    /// Persist the activity cache as a single write.
    pub async fn write_activities(&self, cache: &ActivityCache) -> Result<(), AppError> {
        self.write_json(&self.data_dir.join(ACTIVITIES_FILE), cache)
            .await
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let bytes = tokio::fs::read(path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unparsable store file");
                None
            }
        }
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| AppError::Storage(format!("create {}: {}", self.data_dir.display(), e)))?;

        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::Storage(format!("serialize {}: {}", path.display(), e)))?;

        tokio::fs::write(path, json)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;

    fn test_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_absent_token_reads_as_none() {
        let (_dir, store) = test_store();
        assert!(store.read_token().await.is_none());
        assert!(!store.token_exists().await);
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let (_dir, store) = test_store();
        let token = TokenRecord {
            access_token: "acc".to_string(),
            refresh_token: "ref".to_string(),
            expires_at: 1_900_000_000,
            athlete_id: 42,
        };

        store.write_token(&token).await.expect("write");
        let read = store.read_token().await.expect("token present");
        assert_eq!(read.access_token, "acc");
        assert_eq!(read.athlete_id, 42);
    }

    #[tokio::test]
    async fn test_absent_activities_read_as_empty_cache() {
        let (_dir, store) = test_store();
        let cache = store.read_activities().await;
        assert_eq!(cache.last_fetched_at, 0);
        assert!(cache.activities.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_activities_read_as_empty_cache() {
        let (dir, store) = test_store();
        tokio::fs::write(dir.path().join("activities.json"), b"{not json")
            .await
            .expect("write corrupt file");

        let cache = store.read_activities().await;
        assert_eq!(cache.last_fetched_at, 0);
        assert!(cache.activities.is_empty());
    }

    #[tokio::test]
    async fn test_activities_round_trip_preserves_order() {
        let (_dir, store) = test_store();
        let cache = ActivityCache {
            last_fetched_at: 1000,
            activities: vec![
                Activity {
                    id: 2,
                    sport_type: "Ride".to_string(),
                    start_date: "2026-01-02T00:00:00Z".to_string(),
                    polyline: "abc".to_string(),
                },
                Activity {
                    id: 1,
                    sport_type: "Run".to_string(),
                    start_date: "2026-01-01T00:00:00Z".to_string(),
                    polyline: "def".to_string(),
                },
            ],
        };

        store.write_activities(&cache).await.expect("write");
        let read = store.read_activities().await;
        assert_eq!(read.last_fetched_at, 1000);
        let ids: Vec<u64> = read.activities.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
