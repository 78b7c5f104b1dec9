//! In-battle flow events: turns, skills, damage, heals, KOs, statuses

use crate::ParseError;
use crate::log::LogLine;
use crate::log::refs::{CharacterRef, HealthEntry, HpPair, Side, parse_number};
use crate::log::roster::SkillSlotKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A fully parsed `Damage:` line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageLine {
    pub attacker: CharacterRef,
    pub target: CharacterRef,
    /// Target HP printed before the hit lands
    pub target_hp: Option<HpPair>,
    pub base_attack: Option<f64>,
    pub current_attack: Option<f64>,
    /// Skill power as a percentage (145.0 for 145%)
    pub skill_power: Option<f64>,
    pub attack_with_variance: Option<f64>,
    pub defense: Option<f64>,
    pub total: u32,
    pub critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatChangeMode {
    Flat,
    Mult,
}

/// `Change stat (flat): bugs_bunny_l - Stat: Attack - Amount: 57 (8 -> 57)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    pub mode: StatChangeMode,
    pub target: CharacterRef,
    /// Stat name exactly as logged ("Attack", "MaxHealth", ...)
    pub stat: String,
    pub amount: f64,
    pub from: Option<f64>,
    pub to: Option<f64>,
}

pub(crate) fn parse_turn_start(body: &str) -> Result<LogLine> {
    // Turn owner: bugs_bunny_l | Turn: 3
    let (owner_part, turn_part) = body
        .split_once('|')
        .ok_or_else(|| ParseError::InvalidFormat(format!("turn start: {body}")))?;

    let owner = owner_part
        .trim()
        .strip_prefix("Turn owner:")
        .and_then(CharacterRef::parse)
        .ok_or_else(|| ParseError::MissingField("turn owner".to_string()))?;

    let turn = turn_part
        .trim()
        .strip_prefix("Turn:")
        .and_then(|t| t.trim().parse().ok())
        .ok_or_else(|| ParseError::MissingField("turn number".to_string()))?;

    Ok(LogLine::TurnStart { owner, turn })
}

pub(crate) fn parse_skill_use(body: &str) -> Result<LogLine> {
    // bugs_bunny_l (active) skill_befuddle
    let (marker, kind) = if let Some(idx) = body.find("(active)") {
        (idx, SkillSlotKind::Active)
    } else if let Some(idx) = body.find("(passive)") {
        (idx, SkillSlotKind::Passive)
    } else {
        return Err(ParseError::MissingField("skill kind".to_string()).into());
    };

    let marker_len = match kind {
        SkillSlotKind::Active => "(active)".len(),
        SkillSlotKind::Passive => "(passive)".len(),
    };

    let skill_id = body[marker + marker_len..]
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::MissingField("skill id".to_string()))?;

    let actor = body[..marker]
        .split_whitespace()
        .filter_map(CharacterRef::parse)
        .find(|r| r.side.is_some());

    Ok(LogLine::SkillUse {
        actor,
        kind,
        skill_id: skill_id.to_string(),
    })
}

pub(crate) fn parse_damage(body: &str) -> Result<LogLine> {
    // (attacker) -> (target (hp/max)); Attack (Base) 40 (Current) 40; SkillPower 145%;
    // Attack with Variance 40; Defense 0; Total Damage 58
    let mut segments = body.split(';').map(str::trim);

    let header = segments
        .next()
        .ok_or_else(|| ParseError::MissingField("damage participants".to_string()))?;
    let (attacker_part, target_part) = header
        .split_once("->")
        .ok_or_else(|| ParseError::InvalidFormat(format!("damage participants: {header}")))?;

    let attacker = CharacterRef::parse(attacker_part)
        .ok_or_else(|| ParseError::InvalidFormat(format!("attacker: {attacker_part}")))?;

    let target_inner = target_part
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(target_part.trim());

    let (target, target_hp) = match HealthEntry::parse(target_inner) {
        Some(entry) => (entry.character, Some(entry.hp)),
        None => (
            CharacterRef::parse(target_inner)
                .ok_or_else(|| ParseError::InvalidFormat(format!("target: {target_inner}")))?,
            None,
        ),
    };

    let mut line = DamageLine {
        attacker,
        target,
        target_hp,
        base_attack: None,
        current_attack: None,
        skill_power: None,
        attack_with_variance: None,
        defense: None,
        total: 0,
        critical: false,
    };
    let mut total = None;

    for segment in segments {
        if let Some(rest) = segment.strip_prefix("Attack (Base)") {
            let (base, current) = rest.split_once("(Current)").unwrap_or((rest, ""));
            line.base_attack = base.trim().parse().ok();
            line.current_attack = current.trim().parse().ok();
        } else if let Some(rest) = segment.strip_prefix("Attack with Variance") {
            line.attack_with_variance = rest.trim().parse().ok();
        } else if let Some(rest) = segment.strip_prefix("SkillPower") {
            line.skill_power = rest.trim().trim_end_matches('%').parse().ok();
        } else if let Some(rest) = segment.strip_prefix("Defense") {
            line.defense = rest.trim().parse().ok();
        } else if let Some(rest) = segment.strip_prefix("Total Damage") {
            total = parse_number(rest);
        } else if segment.to_ascii_lowercase().contains("critical") {
            line.critical = true;
        }
    }

    line.total = total.ok_or_else(|| ParseError::MissingField("Total Damage".to_string()))?;

    Ok(LogLine::Damage(line))
}

pub(crate) fn parse_heal(body: &str) -> Result<LogLine> {
    // lola_bunny_l - Amount: 12
    let (target_part, amount_part) = body
        .split_once('-')
        .ok_or_else(|| ParseError::InvalidFormat(format!("heal: {body}")))?;

    let target = CharacterRef::parse(target_part)
        .ok_or_else(|| ParseError::InvalidFormat(format!("heal target: {target_part}")))?;
    let amount = amount_part
        .trim()
        .strip_prefix("Amount:")
        .and_then(parse_number)
        .ok_or_else(|| ParseError::MissingField("heal amount".to_string()))?;

    Ok(LogLine::Heal { target, amount })
}

pub(crate) fn parse_knockout(body: &str) -> Result<LogLine> {
    // KO => road_runner_r | Turn: 5
    let rest = body
        .trim()
        .strip_prefix("KO")
        .and_then(|r| r.trim().strip_prefix("=>"))
        .ok_or_else(|| ParseError::InvalidFormat(format!("knockout: {body}")))?;

    let (name, turn_part) = rest.split_once('|').unwrap_or((rest, ""));
    let character = CharacterRef::parse(name)
        .ok_or_else(|| ParseError::MissingField("knocked out character".to_string()))?;
    let turn = turn_part
        .trim()
        .strip_prefix("Turn:")
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or(0);

    Ok(LogLine::Knockout { character, turn })
}

pub(crate) fn parse_status_added(body: &str) -> Result<LogLine> {
    // DefenseDown (2) (bugs_bunny_l) -> (wile_e_coyote_r)
    let invalid = || ParseError::InvalidFormat(format!("status added: {body}"));

    let (left, target_part) = body.split_once("->").ok_or_else(invalid)?;
    let (status, rest) = left.trim().split_once('(').ok_or_else(invalid)?;
    let (duration, source_part) = rest.split_once(')').ok_or_else(invalid)?;

    let status = status.trim();
    if status.is_empty() {
        return Err(ParseError::MissingField("status name".to_string()).into());
    }

    Ok(LogLine::StatusAdded {
        status: status.to_string(),
        duration: duration.trim().parse().ok(),
        source: CharacterRef::parse(source_part),
        target: CharacterRef::parse(target_part).ok_or_else(invalid)?,
    })
}

pub(crate) fn parse_stat_change(line: &str) -> Result<LogLine> {
    // Change stat (flat): bugs_bunny_l - Stat: Attack - Amount: 57 (8 -> 57)
    let invalid = || ParseError::InvalidFormat(line.to_string());

    let rest = line.strip_prefix("Change stat").ok_or_else(invalid)?.trim();
    let (mode, rest) = rest
        .strip_prefix('(')
        .and_then(|r| r.split_once(')'))
        .ok_or_else(invalid)?;
    let mode = match mode.trim() {
        "flat" => StatChangeMode::Flat,
        "mult" => StatChangeMode::Mult,
        other => {
            return Err(ParseError::InvalidFormat(format!("stat change mode: {other}")).into());
        }
    };
    let rest = rest.trim().strip_prefix(':').ok_or_else(invalid)?;

    let parts: Vec<&str> = rest.split(" - ").map(str::trim).collect();
    let target = parts
        .first()
        .and_then(|p| CharacterRef::parse(p))
        .ok_or_else(|| ParseError::MissingField("stat change target".to_string()))?;
    let stat = parts
        .get(1)
        .and_then(|p| p.strip_prefix("Stat:"))
        .map(|s| s.trim().to_string())
        .ok_or_else(|| ParseError::MissingField("stat name".to_string()))?;
    let amount_part = parts
        .get(2)
        .and_then(|p| p.strip_prefix("Amount:"))
        .ok_or_else(|| ParseError::MissingField("stat amount".to_string()))?
        .trim();

    let (amount, range) = match amount_part.split_once('(') {
        Some((amount, range)) => (amount.trim(), Some(range.trim_end_matches(')'))),
        None => (amount_part, None),
    };
    let amount: f64 = amount.parse().map_err(|_| invalid())?;

    let (from, to) = match range.and_then(|r| r.split_once("->")) {
        Some((from, to)) => (from.trim().parse().ok(), to.trim().parse().ok()),
        None => (None, None),
    };

    Ok(LogLine::StatChange(StatChange {
        mode,
        target,
        stat,
        amount,
        from,
        to,
    }))
}

pub(crate) fn parse_state_change(body: &str) -> Result<LogLine> {
    // (Onboarding) -> (TurnStart)
    let (from, to) = body
        .split_once("->")
        .ok_or_else(|| ParseError::InvalidFormat(format!("state change: {body}")))?;
    let clean = |s: &str| s.trim().trim_start_matches('(').trim_end_matches(')').to_string();

    Ok(LogLine::StateChange {
        from: clean(from),
        to: clean(to),
    })
}

pub(crate) fn parse_team_health(side: Side, entries: &str) -> LogLine {
    LogLine::TeamHealth {
        side,
        entries: HealthEntry::parse_list(entries),
    }
}
