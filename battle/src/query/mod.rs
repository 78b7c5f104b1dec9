//! Query helpers for battle decision making
//!
//! Read-only helpers over [`BattleSnapshot`](crate::BattleSnapshot) for
//! advisors and automated players.

mod targets;

pub use targets::{
    // Targeting
    check_suggestion,
    taunting_enemies,
    valid_targets,
    weakest_ally,
    weakest_enemy,
};
