//! Turn-based battle simulator for Mayhem-style team battles.
//!
//! This crate owns the battle state: characters, skills, timed effects,
//! initiative order, action resolution and the win/loss/draw state machine.
//!
//! # Overview
//!
//! `mayhem-battle` sits between the log parser and the higher-level drivers:
//!
//! ```text
//! mayhem-protocol (battle log format)
//!        │
//!        ▼
//! mayhem-replay (loader, catalogue, replay, metrics)
//!        │
//!        ▼
//! mayhem-battle (simulator + advisor port) ← THIS CRATE
//!        │
//!        └─> mayhem-session (interactive loop, advisor timeouts)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Character`] - A combatant with HP, stats, skills and effects
//! - [`Skill`] - Power, cooldown, [`TargetPattern`] and effect templates
//! - [`Effect`] / [`EffectKind`] - Timed buffs, debuffs and control effects
//! - [`Team`] - One of the two sides
//!
//! ## Simulation
//! - [`Battle`] - Roster, turn pointer and outcome; [`Battle::resolve`] is the only mutation
//! - [`BattleRules`] - Damage formula and other tunable constants
//! - [`BattleSnapshot`] - Owned, read-only view handed to advisors
//! - [`Advisor`] - Outbound port for move recommendations
//!
//! # Example Usage
//!
//! ```ignore
//! use mayhem_battle::{Battle, BattleRules, Outcome};
//!
//! let mut battle = Battle::new(left, right, BattleRules::default())?;
//!
//! while let Some(actor) = battle.pending_actor() {
//!     let actor = actor.id.clone();
//!     let skill = battle.available_skills(&actor)?[0].id.clone();
//!     let target = battle.enemies_of(&actor)[0].id.clone();
//!     battle.resolve(&actor, &skill, &[target.as_str()])?;
//! }
//!
//! assert!(battle.outcome().is_terminal());
//! ```

pub mod advisor;
pub mod engine;
pub mod error;
pub mod query;
pub mod rules;
pub mod snapshot;
pub mod types;

// Re-export main types at crate root for convenience
pub use advisor::{Advisor, Suggestion};
pub use engine::{Battle, Outcome, TurnScheduler, initiative_order};
pub use error::{AdvisorError, ResolveError, SetupError};
pub use rules::BattleRules;
pub use snapshot::{BattleSnapshot, CharacterSnapshot, EffectSnapshot, SkillSnapshot};
pub use types::{
    Action, ActionChoice, ActiveEffects, BaseStats, BattleEvent, Character, Effect, EffectKind,
    EffectRecipient, EffectTemplate, SkillSlot, SkipReason, Skill, Stat, StatModifiers, TargetOutcome,
    TargetPattern, Team, TeamState,
};
