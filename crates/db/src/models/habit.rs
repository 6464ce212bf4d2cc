//! Habit entity model and DTOs.

use chrono::NaiveDate;
use habitforge_core::habits::{Frequency, HabitCategory, HabitType};
use habitforge_core::rope::RopeState;
use habitforge_core::streaks::{Milestone, StreakState};
use habitforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `habits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Habit {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub habit_type: String,
    pub frequency: Json<Frequency>,
    pub status: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_completions: i32,
    pub last_completed_on: Option<NaiveDate>,
    pub completion_rate: f64,
    pub rope: Json<RopeState>,
    pub milestones: Json<Vec<Milestone>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Habit {
    /// The streak counters as stored on the row.
    pub fn streak_state(&self) -> StreakState {
        StreakState {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            total_completions: self.total_completions,
            last_completed_on: self.last_completed_on,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHabit {
    pub title: String,
    pub description: Option<String>,
    pub category: HabitCategory,
    #[serde(default = "default_habit_type")]
    pub habit_type: HabitType,
    #[serde(default)]
    pub frequency: Frequency,
}

fn default_habit_type() -> HabitType {
    HabitType::Build
}

/// Partial habit update. Status changes go through the status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHabit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<HabitCategory>,
    pub habit_type: Option<HabitType>,
    pub frequency: Option<Frequency>,
}

/// Counters written back after a completion.
#[derive(Debug, Clone)]
pub struct HabitProgress {
    pub streak: StreakState,
    pub completion_rate: f64,
    pub rope: RopeState,
    pub milestones: Vec<Milestone>,
}
