use thiserror::Error;

pub mod log;

pub use log::{
    BattleResult, CharacterRef, ChanceStat, DamageLine, DamageRecord, HealRecord, HealthEntry,
    HpPair, KnockoutRecord, LogLine, ParsedBattle, RosterEntry, RosterSkill, Side, SkillSlotKind,
    SkillUseRecord, StatChange, StatChangeMode, StatChangeRecord, StatName, StatusRecord,
    TurnRecord, parse_battle_log, parse_log_line,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid log line: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty battle log")]
    EmptyLog,
}
