//! Habit enums, frequency configuration, status transitions and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum habit title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum habit description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

define_text_enum! {
    /// Habit category.
    HabitCategory ("habit category") {
        Health = "health",
        Fitness = "fitness",
        Productivity = "productivity",
        Mindfulness = "mindfulness",
        Learning = "learning",
        Social = "social",
        Finance = "finance",
        Creativity = "creativity",
        Other = "other",
    }
}

define_text_enum! {
    /// Whether the user is building a new habit or breaking an old one.
    HabitType ("habit type") {
        Build = "build",
        Break = "break",
    }
}

define_text_enum! {
    /// Habit lifecycle status. `Archived` doubles as the soft-delete flag.
    HabitStatus ("habit status") {
        Active = "active",
        Paused = "paused",
        Completed = "completed",
        Abandoned = "abandoned",
        Archived = "archived",
    }
}

impl HabitStatus {
    /// Statuses reachable from `self`.
    pub fn valid_transitions(self) -> &'static [HabitStatus] {
        use HabitStatus::*;
        match self {
            Active => &[Paused, Completed, Abandoned, Archived],
            Paused => &[Active, Abandoned, Archived],
            Completed => &[Active, Archived],
            Abandoned => &[Active, Archived],
            Archived => &[Active],
        }
    }

    /// Validate a status change. Re-applying the current status is allowed.
    pub fn validate_transition(self, to: HabitStatus) -> Result<(), CoreError> {
        if self == to || self.valid_transitions().contains(&to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid habit status transition: {self} -> {to}"
            )))
        }
    }

    /// Only active habits count toward completion and achievement stats.
    pub fn is_trackable(self) -> bool {
        self == HabitStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// How often a habit is meant to be performed.
///
/// Stored as a JSON object tagged by `kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    /// Specific weekdays, 0 = Sunday .. 6 = Saturday.
    Weekly { days: Vec<u8> },
    TimesPerWeek { count: u8 },
}

impl Frequency {
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Frequency::Daily => Ok(()),
            Frequency::Weekly { days } => {
                if days.is_empty() {
                    return Err(CoreError::Validation(
                        "Weekly frequency requires at least one day".into(),
                    ));
                }
                if let Some(bad) = days.iter().find(|d| **d > 6) {
                    return Err(CoreError::Validation(format!(
                        "Invalid weekday {bad}. Must be 0 (Sunday) through 6 (Saturday)"
                    )));
                }
                Ok(())
            }
            Frequency::TimesPerWeek { count } => {
                if (1..=7).contains(count) {
                    Ok(())
                } else {
                    Err(CoreError::Validation(
                        "times_per_week count must be between 1 and 7".into(),
                    ))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a habit title: non-blank and at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Habit title is required".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Habit title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(CoreError::Validation(
            format!("Description must be at most {MAX_DESCRIPTION_LEN} characters"),
        )),
        _ => Ok(()),
    }
}
