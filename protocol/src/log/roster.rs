//! Roster lines printed under `[BattleStartFlowEvent]`

use crate::ParseError;
use crate::log::LogLine;
use crate::log::refs::{HpPair, Side};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Integer stats printed as "current/max"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatName {
    Health,
    Attack,
    Defense,
    Speed,
}

impl StatName {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Health" | "MaxHealth" => Some(StatName::Health),
            "Attack" => Some(StatName::Attack),
            "Defense" => Some(StatName::Defense),
            "Speed" => Some(StatName::Speed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Health => "Health",
            StatName::Attack => "Attack",
            StatName::Defense => "Defense",
            StatName::Speed => "Speed",
        }
    }
}

/// Percentage stats printed as "x%"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanceStat {
    Critical,
    Dodge,
    Counter,
    Lifesteal,
    Piercing,
}

impl ChanceStat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Critical Chance" => Some(ChanceStat::Critical),
            "Dodge Chance" => Some(ChanceStat::Dodge),
            "Counter Chance" => Some(ChanceStat::Counter),
            "Lifesteal" => Some(ChanceStat::Lifesteal),
            "Piercing" => Some(ChanceStat::Piercing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillSlotKind {
    Active,
    Passive,
}

impl SkillSlotKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" | "active" => Some(SkillSlotKind::Active),
            "Passive" | "passive" => Some(SkillSlotKind::Passive),
            _ => None,
        }
    }
}

pub(crate) fn parse_character_header(line: &str) -> Result<LogLine> {
    // <bugs_bunny> (L:30|Q:3|E:2)
    let rest = line
        .strip_prefix('<')
        .ok_or_else(|| ParseError::InvalidFormat(line.to_string()))?;
    let (id, rest) = rest
        .split_once('>')
        .ok_or_else(|| ParseError::InvalidFormat(line.to_string()))?;

    if id.is_empty() {
        return Err(ParseError::MissingField("character id".to_string()).into());
    }

    let mut level = 1;
    let mut quality = 1;
    let mut evolution = 1;

    let details = rest.trim().trim_start_matches('(').trim_end_matches(')');
    for part in details.split('|') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let value: u32 = value
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidFormat(format!("character header value: {part}")))?;
        match key.trim() {
            "L" => level = value,
            "Q" => quality = value,
            "E" => evolution = value,
            _ => {}
        }
    }

    Ok(LogLine::CharacterHeader {
        id: id.to_string(),
        level,
        quality,
        evolution,
    })
}

pub(crate) fn parse_team_assignment(value: &str) -> Result<LogLine> {
    // Team: LEFT
    let side = Side::parse(value.trim())
        .ok_or_else(|| ParseError::InvalidFormat(format!("unknown team: {value}")))?;
    Ok(LogLine::TeamAssignment(side))
}

pub(crate) fn parse_base_stat(stat: StatName, value: &str) -> Result<LogLine> {
    // Attack: 40/40
    let pair = HpPair::parse(value)
        .ok_or_else(|| ParseError::InvalidFormat(format!("{}: {value}", stat.as_str())))?;
    Ok(LogLine::BaseStat {
        stat,
        current: pair.current,
        max: pair.max,
    })
}

pub(crate) fn parse_chance_stat(stat: ChanceStat, value: &str) -> Result<LogLine> {
    // Critical Chance: 5.0%
    let percent: f64 = value
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidFormat(format!("percentage stat: {value}")))?;
    Ok(LogLine::ChanceStat { stat, percent })
}

/// `* (Active) skill_x` or `* tag_archetype_attacker: 1 - Age: 0`
pub(crate) fn parse_bullet(line: &str) -> Option<LogLine> {
    let body = line.strip_prefix('*')?.trim();

    if let Some(rest) = body.strip_prefix('(') {
        let (kind, id) = rest.split_once(')')?;
        let kind = SkillSlotKind::parse(kind.trim())?;
        let id = id.split_whitespace().next()?;
        return Some(LogLine::SkillEntry {
            kind,
            id: id.to_string(),
        });
    }

    let (name, rest) = body.split_once(':')?;
    if !rest.contains("Age:") {
        return None;
    }
    Some(LogLine::Tag(name.trim().to_string()))
}
