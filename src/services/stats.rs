// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Distance statistics over the cached activities.

use crate::models::Activity;
use geo::{Haversine, Length};
use serde::Serialize;

/// Broad sport category a Strava `sport_type` falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SportCategory {
    Bicycle,
    Running,
    Walking,
    Other,
}

const BICYCLE_TYPES: &[&str] = &[
    "Ride",
    "MountainBikeRide",
    "GravelRide",
    "EBikeRide",
    "VirtualRide",
];
const RUNNING_TYPES: &[&str] = &["Run", "TrailRun", "VirtualRun"];
const WALKING_TYPES: &[&str] = &["Walk", "Hike"];

impl SportCategory {
    pub fn from_sport_type(sport_type: &str) -> Self {
        if BICYCLE_TYPES.contains(&sport_type) {
            Self::Bicycle
        } else if RUNNING_TYPES.contains(&sport_type) {
            Self::Running
        } else if WALKING_TYPES.contains(&sport_type) {
            Self::Walking
        } else {
            Self::Other
        }
    }
}

/// Kilometres covered per sport category.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatsByCategory {
    pub bicycle: f64,
    pub running: f64,
    pub walking: f64,
    pub other: f64,
}

impl StatsByCategory {
    pub fn total(&self) -> f64 {
        self.bicycle + self.running + self.walking + self.other
    }
}

/// Sum track distances per category across the cache.
pub fn calculate_stats(activities: &[Activity]) -> StatsByCategory {
    let mut stats = StatsByCategory::default();

    for act in activities {
        let km = track_distance_km(&act.polyline, act.id);
        match SportCategory::from_sport_type(&act.sport_type) {
            SportCategory::Bicycle => stats.bicycle += km,
            SportCategory::Running => stats.running += km,
            SportCategory::Walking => stats.walking += km,
            SportCategory::Other => stats.other += km,
        }
    }

    stats
}

/// Haversine length of an encoded track (Strava format, precision 5),
/// in kilometres.
fn track_distance_km(encoded: &str, activity_id: u64) -> f64 {
    match polyline::decode_polyline(encoded, 5) {
        Ok(line) => Haversine.length(&line) / 1000.0,
        Err(e) => {
            tracing::warn!(activity_id, error = %e, "Skipping undecodable polyline in stats");
            0.0
        }
    }
}
