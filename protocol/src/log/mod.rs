mod events;
mod parsed;
mod refs;
mod result;
mod roster;

pub use events::{DamageLine, StatChange, StatChangeMode};
pub use parsed::{
    BattleResult, DamageRecord, HealRecord, KnockoutRecord, ParsedBattle, RosterEntry,
    RosterSkill, SkillUseRecord, StatChangeRecord, StatusRecord, TurnRecord, parse_battle_log,
};
pub use refs::{CharacterRef, HealthEntry, HpPair, Side};
pub use roster::{ChanceStat, SkillSlotKind, StatName};

use anyhow::Result;

/// One line of a battle log
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    Seed(u64),
    /// `--- Game Mode ---`, the mode name follows on the next line
    GameModeHeader,
    BattleStart,
    CharacterHeader {
        id: String,
        level: u32,
        quality: u32,
        evolution: u32,
    },
    TeamAssignment(Side),
    BaseStat {
        stat: StatName,
        current: u32,
        max: u32,
    },
    ChanceStat {
        stat: ChanceStat,
        percent: f64,
    },
    Tag(String),
    SkillEntry {
        kind: SkillSlotKind,
        id: String,
    },
    StateChange {
        from: String,
        to: String,
    },
    TeamHealth {
        side: Side,
        entries: Vec<HealthEntry>,
    },
    StatChange(StatChange),
    TurnStart {
        owner: CharacterRef,
        turn: u32,
    },
    SkillUse {
        actor: Option<CharacterRef>,
        kind: SkillSlotKind,
        skill_id: String,
    },
    Damage(DamageLine),
    Heal {
        target: CharacterRef,
        amount: u32,
    },
    Knockout {
        character: CharacterRef,
        turn: u32,
    },
    StatusAdded {
        status: String,
        duration: Option<u32>,
        source: Option<CharacterRef>,
        target: CharacterRef,
    },
    BattleWon(bool),
    Winner(String),
    TotalTurns(u32),
    Stars(u8),
    /// A bracketed flow event with no dedicated parser
    Flow {
        tag: String,
        body: String,
    },
    Raw(String),
}

/// Parse a single line of a battle log into a LogLine
pub fn parse_log_line(line: &str) -> Result<LogLine> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(LogLine::Raw(String::new()));
    }

    if let Some(rest) = line.strip_prefix('[') {
        let Some((tag, body)) = rest.split_once(']') else {
            return Ok(LogLine::Raw(line.to_string()));
        };
        let body = body.trim();

        return match tag {
            "BattleStartFlowEvent" => Ok(LogLine::BattleStart),
            "TurnStartFlowEvent" => events::parse_turn_start(body),
            "CharacterSkillPrankFlowEvent" => events::parse_skill_use(body),
            "KOPrankFlowEvent" => events::parse_knockout(body),
            "StateChangePrankFlowEvent" => events::parse_state_change(body),
            _ => Ok(LogLine::Flow {
                tag: tag.to_string(),
                body: body.to_string(),
            }),
        };
    }

    if line.starts_with('<') {
        return roster::parse_character_header(line);
    }

    if line.starts_with('*') {
        return Ok(roster::parse_bullet(line).unwrap_or_else(|| LogLine::Raw(line.to_string())));
    }

    if line == "--- Game Mode ---" {
        return Ok(LogLine::GameModeHeader);
    }

    if line.starts_with("\"BattleWon\"") {
        return result::parse_battle_won(line);
    }

    if line.starts_with("Change stat") {
        return events::parse_stat_change(line);
    }

    let Some((key, value)) = line.split_once(':') else {
        return Ok(LogLine::Raw(line.to_string()));
    };

    match key.trim() {
        "Seed" => result::parse_seed(value),
        "Team" => roster::parse_team_assignment(value),
        "Left Team" => Ok(events::parse_team_health(Side::Left, value)),
        "Right Team" => Ok(events::parse_team_health(Side::Right, value)),
        "Damage" => events::parse_damage(value),
        "Heal" => events::parse_heal(value),
        "Added" => events::parse_status_added(value),
        "Battle Winner" => result::parse_winner(value),
        "Total Battle Turns" => result::parse_total_turns(value),
        "Battle Stars" => result::parse_stars(value),
        key => {
            if let Some(stat) = StatName::parse(key).filter(|_| value.contains('/')) {
                roster::parse_base_stat(stat, value)
            } else if let Some(stat) = ChanceStat::parse(key).filter(|_| value.contains('%')) {
                roster::parse_chance_stat(stat, value)
            } else {
                Ok(LogLine::Raw(line.to_string()))
            }
        }
    }
}
