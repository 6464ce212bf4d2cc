//! Streak bookkeeping, completion rate and streak milestones.
//!
//! All functions are pure; the caller supplies "today" as a local
//! [`NaiveDate`] so results do not depend on the server clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Streak lengths (in days) that are celebrated as milestones.
pub const MILESTONE_DAYS: &[i32] = &[7, 21, 30, 66, 100, 365];

/// Current habit counters as stored on the habit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_completions: i32,
    pub last_completed_on: Option<NaiveDate>,
}

/// A streak milestone reached by a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub days: i32,
    pub reached_on: NaiveDate,
}

/// Apply a completion on `today` to the habit's counters.
///
/// Completing twice on the same day is rejected with a conflict; a
/// completion on the day after the previous one extends the streak, any
/// larger gap restarts it at 1.
pub fn record_completion(state: StreakState, today: NaiveDate) -> Result<StreakState, CoreError> {
    let current_streak = match state.last_completed_on {
        Some(last) if last == today => {
            return Err(CoreError::Conflict(
                "Habit already completed today".into(),
            ));
        }
        Some(last) if last > today => {
            return Err(CoreError::Validation(
                "Completion date is earlier than the last recorded completion".into(),
            ));
        }
        Some(last) if today.pred_opt() == Some(last) => state.current_streak.max(0) + 1,
        _ => 1,
    };

    Ok(StreakState {
        current_streak,
        longest_streak: state.longest_streak.max(current_streak),
        total_completions: state.total_completions.max(0) + 1,
        last_completed_on: Some(today),
    })
}

/// Whether the habit has been completed on `today`.
pub fn completed_today(last_completed_on: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_completed_on == Some(today)
}

/// The streak to display: a stored streak lapses once a full day is missed.
pub fn effective_streak(
    current_streak: i32,
    last_completed_on: Option<NaiveDate>,
    today: NaiveDate,
) -> i32 {
    match last_completed_on {
        Some(last) if last == today || today.pred_opt() == Some(last) => current_streak.max(0),
        _ => 0,
    }
}

/// Completions divided by days elapsed since creation (inclusive), in `[0, 1]`.
pub fn completion_rate(total_completions: i32, created_on: NaiveDate, today: NaiveDate) -> f64 {
    let days = (today - created_on).num_days() + 1;
    let days = days.max(1) as f64;
    (f64::from(total_completions.max(0)) / days).clamp(0.0, 1.0)
}

/// Milestones newly reached by `streak` that are not already recorded.
pub fn new_milestones(streak: i32, existing: &[Milestone], today: NaiveDate) -> Vec<Milestone> {
    MILESTONE_DAYS
        .iter()
        .copied()
        .filter(|days| streak >= *days)
        .filter(|days| !existing.iter().any(|m| m.days == *days))
        .map(|days| Milestone {
            days,
            reached_on: today,
        })
        .collect()
}
