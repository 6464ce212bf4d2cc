//! Tracking entry model and DTOs.

use chrono::NaiveDate;
use habitforge_core::tracking::FiveFactors;
use habitforge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tracking_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackingEntry {
    pub id: DbId,
    pub habit_id: DbId,
    pub user_id: DbId,
    pub completed_on: NaiveDate,
    pub tracked_at: Timestamp,
    pub location: Option<String>,
    pub emotional_state: Option<String>,
    pub people_present: Option<String>,
    pub time_of_day: Option<String>,
    pub preceding_action: Option<String>,
    pub notes: Option<String>,
    pub duration_minutes: Option<i32>,
}

impl TrackingEntry {
    pub fn factors(&self) -> FiveFactors {
        FiveFactors {
            location: self.location.clone(),
            emotional_state: self.emotional_state.clone(),
            people_present: self.people_present.clone(),
            time_of_day: self.time_of_day.clone(),
            preceding_action: self.preceding_action.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTrackingEntry {
    pub habit_id: DbId,
    pub user_id: DbId,
    pub completed_on: NaiveDate,
    pub factors: FiveFactors,
    pub notes: Option<String>,
    pub duration_minutes: Option<i32>,
}
