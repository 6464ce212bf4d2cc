//! Streak rope visualization state.
//!
//! A habit's streak is drawn as a rope that thickens and changes material as
//! the streak grows, and frays when the completion rate drops.

use serde::{Deserialize, Serialize};

/// Maximum rope thickness.
pub const MAX_THICKNESS: i32 = 10;

/// Completion rate below which the rope is drawn frayed.
pub const FRAY_THRESHOLD: f64 = 0.5;

define_text_enum! {
    /// Rope material tier, ordered from weakest to strongest.
    RopeMaterial ("rope material") {
        Thread = "thread",
        Twine = "twine",
        Rope = "rope",
        Cable = "cable",
        Chain = "chain",
    }
}

impl RopeMaterial {
    /// Material for a streak length.
    pub fn for_streak(streak: i32) -> Self {
        match streak {
            s if s >= 100 => RopeMaterial::Chain,
            s if s >= 66 => RopeMaterial::Cable,
            s if s >= 21 => RopeMaterial::Rope,
            s if s >= 7 => RopeMaterial::Twine,
            _ => RopeMaterial::Thread,
        }
    }

    /// Display colour (hex) for the material.
    pub fn color(&self) -> &'static str {
        match self {
            RopeMaterial::Thread => "#d4c5a9",
            RopeMaterial::Twine => "#b08d57",
            RopeMaterial::Rope => "#8b5a2b",
            RopeMaterial::Cable => "#5f6b73",
            RopeMaterial::Chain => "#c0c0c0",
        }
    }
}

/// Persisted rope state for a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RopeState {
    pub thickness: i32,
    pub material: RopeMaterial,
    pub color: String,
    pub frayed: bool,
}

impl Default for RopeState {
    fn default() -> Self {
        rope_for(0, 0.0)
    }
}

/// Derive the rope from the current streak and completion rate.
pub fn rope_for(streak: i32, completion_rate: f64) -> RopeState {
    let streak = streak.max(0);
    let material = RopeMaterial::for_streak(streak);
    RopeState {
        thickness: (1 + streak / 7).min(MAX_THICKNESS),
        material,
        color: material.color().to_string(),
        frayed: completion_rate < FRAY_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_habit_is_thin_frayed_thread() {
        let rope = RopeState::default();
        assert_eq!(rope.thickness, 1);
        assert_eq!(rope.material, RopeMaterial::Thread);
        assert!(rope.frayed);
    }

    #[test]
    fn material_boundaries() {
        assert_eq!(RopeMaterial::for_streak(6), RopeMaterial::Thread);
        assert_eq!(RopeMaterial::for_streak(7), RopeMaterial::Twine);
        assert_eq!(RopeMaterial::for_streak(21), RopeMaterial::Rope);
        assert_eq!(RopeMaterial::for_streak(66), RopeMaterial::Cable);
        assert_eq!(RopeMaterial::for_streak(100), RopeMaterial::Chain);
    }

    #[test]
    fn thickness_grows_weekly_and_caps() {
        assert_eq!(rope_for(13, 1.0).thickness, 2);
        assert_eq!(rope_for(14, 1.0).thickness, 3);
        assert_eq!(rope_for(1000, 1.0).thickness, MAX_THICKNESS);
    }

    #[test]
    fn fraying_follows_completion_rate() {
        assert!(rope_for(10, 0.49).frayed);
        assert!(!rope_for(10, 0.5).frayed);
    }

    #[test]
    fn negative_streak_is_treated_as_zero() {
        assert_eq!(rope_for(-3, 1.0), rope_for(0, 1.0));
    }
}
