//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create DTOs for inserts
//! - Update DTOs (all `Option` fields) for patches

pub mod achievement;
pub mod buddy;
pub mod challenge;
pub mod habit;
pub mod notification;
pub mod reminder;
pub mod session;
pub mod stats;
pub mod tracking;
pub mod user;
