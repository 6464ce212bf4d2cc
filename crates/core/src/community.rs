//! Challenge and buddy-request enums and validation.

use chrono::{Duration, NaiveDate};

use crate::error::CoreError;

/// Longest allowed challenge in days.
pub const MAX_CHALLENGE_DAYS: i32 = 365;
/// Default participant cap when none is given.
pub const DEFAULT_MAX_PARTICIPANTS: i32 = 50;
/// Maximum challenge title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

define_text_enum! {
    ChallengeDifficulty ("challenge difficulty") {
        Easy = "easy",
        Medium = "medium",
        Hard = "hard",
    }
}

define_text_enum! {
    ChallengeStatus ("challenge status") {
        Upcoming = "upcoming",
        Active = "active",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

define_text_enum! {
    /// Lifecycle of a buddy request.
    BuddyStatus ("buddy status") {
        Pending = "pending",
        Accepted = "accepted",
        Declined = "declined",
    }
}

impl ChallengeStatus {
    /// Status implied by the challenge dates relative to `today`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            ChallengeStatus::Upcoming
        } else if today > end {
            ChallengeStatus::Completed
        } else {
            ChallengeStatus::Active
        }
    }

    /// Current status of a challenge stored with `stored` status. A
    /// cancellation sticks; otherwise the dates decide.
    pub fn effective(stored: &str, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if stored == ChallengeStatus::Cancelled.as_str() {
            ChallengeStatus::Cancelled
        } else {
            Self::from_dates(start, end, today)
        }
    }

    /// Whether users may still join.
    pub fn is_joinable(self) -> bool {
        matches!(self, ChallengeStatus::Upcoming | ChallengeStatus::Active)
    }
}

/// Last day of a challenge that starts on `start` and lasts `duration_days`.
pub fn end_date(start: NaiveDate, duration_days: i32) -> NaiveDate {
    start + Duration::days(i64::from(duration_days.max(1)) - 1)
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let len = title.trim().chars().count();
    if len == 0 || len > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Challenge title must be 1-{MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_duration(duration_days: i32) -> Result<(), CoreError> {
    if (1..=MAX_CHALLENGE_DAYS).contains(&duration_days) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Challenge duration must be between 1 and {MAX_CHALLENGE_DAYS} days"
        )))
    }
}

pub fn validate_max_participants(max: i32) -> Result<(), CoreError> {
    if (2..=10_000).contains(&max) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "max_participants must be between 2 and 10000".into(),
        ))
    }
}
