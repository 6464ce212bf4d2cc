//! Event-to-notification routing.
//!
//! [`NotificationRouter`] consumes the event bus, renders each event into a
//! notification for its target user, stores it (deduplicated per user by
//! `dedup_key`) and pushes it over WebSocket unless the user is inside
//! their quiet hours.

use std::sync::Arc;

use axum::extract::ws::Message;
use habitforge_core::clock;
use habitforge_core::types::{DbId, Timestamp};
use habitforge_db::models::notification::{CreateNotification, Notification};
use habitforge_db::repositories::{NotificationRepo, UserRepo};
use habitforge_db::DbPool;
use habitforge_events::{render, DomainEvent, RenderedNotification};
use tokio::sync::broadcast;

/// What happened to one routed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Stored and pushed to this many live connections.
    Pushed(usize),
    /// Stored but not pushed (quiet hours).
    Stored,
    /// An identical notification already exists.
    Duplicate,
    /// The recipient has notifications turned off or no longer exists.
    Suppressed,
    /// The event does not produce a notification.
    Ignored,
}

pub struct NotificationRouter {
    pool: DbPool,
    ws_manager: Arc<crate::ws::WsManager>,
}

impl NotificationRouter {
    pub fn new(pool: DbPool, ws_manager: Arc<crate::ws::WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Route events until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => match self.route_event(&event).await {
                    Ok(delivery) => {
                        tracing::debug!(
                            event_type = %event.event_type,
                            ?delivery,
                            "Event routed"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Render, store and push a single event.
    pub async fn route_event(&self, event: &DomainEvent) -> Result<Delivery, sqlx::Error> {
        let Some(user_id) = event.target_user() else {
            return Ok(Delivery::Ignored);
        };
        let Some(rendered) = render(event) else {
            return Ok(Delivery::Ignored);
        };

        let Some(user) = UserRepo::find_by_id(&self.pool, user_id).await? else {
            return Ok(Delivery::Suppressed);
        };
        let prefs = &user.preferences.0;
        if !user.is_active || !prefs.notifications_enabled {
            return Ok(Delivery::Suppressed);
        }

        let input = to_create(user_id, rendered, event.timestamp);
        let Some(notification) = NotificationRepo::create(&self.pool, &input).await? else {
            return Ok(Delivery::Duplicate);
        };

        let local_now = clock::to_local(chrono::Utc::now(), prefs.utc_offset_minutes).time();
        if !prefs.accepts_notifications_at(local_now) {
            return Ok(Delivery::Stored);
        }

        let reached = self.push(user_id, &notification).await;
        Ok(Delivery::Pushed(reached))
    }

    async fn push(&self, user_id: DbId, notification: &Notification) -> usize {
        let msg = serde_json::json!({
            "type": "notification",
            "notification": notification,
        });
        let ws_msg = Message::Text(msg.to_string().into());
        self.ws_manager.send_to_user(user_id, ws_msg).await
    }
}

fn to_create(user_id: DbId, rendered: RenderedNotification, at: Timestamp) -> CreateNotification {
    CreateNotification {
        user_id,
        kind: rendered.kind,
        priority: rendered.priority,
        title: rendered.title,
        message: rendered.message,
        action_url: rendered.action_url,
        scheduled_for: Some(at),
        dedup_key: rendered.dedup_key,
    }
}
