//! Fires due reminders.
//!
//! Every tick lists enabled reminders and asks
//! [`habitforge_core::reminders::due_on`] whether each is due. A due
//! reminder is claimed by advancing its `last_fired_on` watermark with a
//! conditional update; only the claimant publishes `reminder.due`, so a
//! reminder fires at most once per local day even with several schedulers.

use std::sync::Arc;
use std::time::Duration;

use habitforge_core::notifications::EVENT_REMINDER_DUE;
use habitforge_core::reminders::{due_on, Skip};
use habitforge_core::types::Timestamp;
use habitforge_db::models::reminder::ScheduledReminder;
use habitforge_db::repositories::ReminderRepo;
use habitforge_db::DbPool;
use habitforge_events::{DomainEvent, EventBus};
use tokio_util::sync::CancellationToken;

use crate::config::ReminderConfig;

pub async fn run(
    pool: DbPool,
    event_bus: Arc<EventBus>,
    config: ReminderConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = config.check_interval_secs,
        catch_up_mins = config.catch_up_mins,
        "Reminder scheduler started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.check_interval_secs));
    let catch_up = chrono::Duration::minutes(config.catch_up_mins);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reminder scheduler stopping");
                break;
            }
            _ = interval.tick() => {
                match tick(&pool, &event_bus, chrono::Utc::now(), catch_up).await {
                    Ok(0) => {}
                    Ok(fired) => tracing::info!(fired, "Reminders fired"),
                    Err(e) => tracing::error!(error = %e, "Reminder scheduler tick failed"),
                }
            }
        }
    }
}

/// One scheduler pass at `now`. Returns how many reminders fired.
pub async fn tick(
    pool: &DbPool,
    event_bus: &EventBus,
    now: Timestamp,
    catch_up: chrono::Duration,
) -> Result<usize, sqlx::Error> {
    let reminders = ReminderRepo::list_enabled(pool).await?;
    let mut fired = 0;

    for ScheduledReminder {
        reminder,
        preferences,
    } in reminders
    {
        let today = match due_on(&reminder.schedule(), &preferences, now, catch_up) {
            Ok(today) => today,
            Err(Skip::QuietHours) => {
                tracing::debug!(reminder_id = reminder.id, "Reminder skipped: quiet hours");
                continue;
            }
            Err(_) => continue,
        };

        if !ReminderRepo::try_advance_watermark(pool, reminder.id, today).await? {
            continue;
        }

        event_bus.publish(
            DomainEvent::new(EVENT_REMINDER_DUE)
                .with_source("reminder", reminder.id)
                .with_recipient(reminder.user_id)
                .with_payload(serde_json::json!({
                    "reminder_id": reminder.id,
                    "message": reminder.message,
                    "date": today.to_string(),
                    "habit_id": reminder.habit_id,
                })),
        );
        fired += 1;
    }

    Ok(fired)
}
