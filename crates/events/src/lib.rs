//! HabitForge domain events.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`]: the event envelope published by handlers and
//!   background tasks.
//! - [`render`]: turns an event into the in-app notification it produces.

pub mod bus;
pub mod render;

pub use bus::{DomainEvent, EventBus};
pub use render::{render, RenderedNotification};
