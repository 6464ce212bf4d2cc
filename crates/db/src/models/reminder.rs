//! Reminder entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use habitforge_core::account::UserPreferences;
use habitforge_core::clock;
use habitforge_core::reminders::ReminderSchedule;
use habitforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `reminders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reminder {
    pub id: DbId,
    pub user_id: DbId,
    pub habit_id: Option<DbId>,
    #[serde(with = "clock::hhmm")]
    pub time_of_day: NaiveTime,
    pub days_of_week: Vec<i16>,
    pub message: String,
    pub utc_offset_minutes: i32,
    pub is_enabled: bool,
    pub last_fired_on: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reminder {
    pub fn schedule(&self) -> ReminderSchedule {
        ReminderSchedule {
            time_of_day: self.time_of_day,
            days_of_week: self.days_of_week.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
            last_fired_on: self.last_fired_on,
        }
    }
}

/// An enabled reminder joined with its owner's preferences.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduledReminder {
    #[sqlx(flatten)]
    pub reminder: Reminder,
    pub preferences: Json<UserPreferences>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReminder {
    pub habit_id: Option<DbId>,
    #[serde(with = "clock::hhmm")]
    pub time_of_day: NaiveTime,
    #[serde(default)]
    pub days_of_week: Vec<i16>,
    pub message: String,
    /// Defaults to the owner's preference when omitted.
    pub utc_offset_minutes: Option<i32>,
}

/// Insert values with the offset already resolved.
#[derive(Debug, Clone)]
pub struct NewReminder<'a> {
    pub user_id: DbId,
    pub habit_id: Option<DbId>,
    pub time_of_day: NaiveTime,
    pub days_of_week: &'a [i16],
    pub message: &'a str,
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReminder {
    #[serde(default, with = "optional_hhmm")]
    pub time_of_day: Option<NaiveTime>,
    pub days_of_week: Option<Vec<i16>>,
    pub message: Option<String>,
    pub utc_offset_minutes: Option<i32>,
    pub is_enabled: Option<bool>,
}

mod optional_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|s| {
                habitforge_core::clock::parse_hhmm(&s).map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
