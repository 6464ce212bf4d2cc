//! HabitForge domain core.
//!
//! Pure domain logic with no I/O: enums and validation for every stored
//! entity, streak and rope derivation, the achievement catalog and its
//! evaluator, level computation, buddy match scoring and reminder due-time
//! evaluation. Used by the `db` and `api` crates.

#[macro_use]
mod text_enum;

pub mod account;
pub mod achievements;
pub mod buddy;
pub mod clock;
pub mod community;
pub mod error;
pub mod habits;
pub mod leveling;
pub mod notifications;
pub mod reminders;
pub mod roles;
pub mod rope;
pub mod streaks;
pub mod tracking;
pub mod types;
