use std::time::Duration;

use thiserror::Error;

use crate::engine::Outcome;

/// Rejections from [`Battle::resolve`](crate::Battle::resolve); none of them mutate the battle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Battle is already over: {0}")]
    BattleAlreadyOver(Outcome),

    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    #[error("It is {expected}'s turn, not {actor}'s")]
    NotActorsTurn { actor: String, expected: String },

    #[error("{actor} cannot act: {reason}")]
    ActorIncapacitated { actor: String, reason: String },

    #[error("{actor} has no usable skill {skill}")]
    UnknownSkill { actor: String, skill: String },

    #[error("{skill} is on cooldown for {remaining} more turn(s)")]
    SkillOnCooldown { skill: String, remaining: u32 },

    #[error("Invalid target for {skill}: {reason}")]
    InvalidTarget { skill: String, reason: String },
}

/// Rejected battle construction input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Malformed battle input: {0}")]
    MalformedInput(String),
}

/// Failures from an external advisor; always recoverable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("Advisor timed out after {0:?}")]
    Timeout(Duration),

    #[error("Advisor failed: {0}")]
    Failed(String),

    #[error("Advisor suggestion rejected: {0}")]
    Rejected(String),
}
