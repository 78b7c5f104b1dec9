//! Domain types for the battle simulator

mod action;
mod character;
mod effect;
mod skill;
mod stats;
mod team;

pub use action::{Action, ActionChoice, BattleEvent, SkipReason, TargetOutcome};
pub use character::{Character, DamageTaken, SkillSlot, TurnEnd};
pub use effect::{ActiveEffects, Effect, EffectKind, EffectRecipient, EffectTemplate, EffectTick, StackingRule};
pub use skill::{Skill, TargetPattern};
pub use stats::{BaseStats, Stat, StatModifiers};
pub use team::{Team, TeamState};
