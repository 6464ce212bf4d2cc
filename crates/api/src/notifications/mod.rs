//! Turns domain events into stored notifications and live pushes.

pub mod router;

pub use router::NotificationRouter;
