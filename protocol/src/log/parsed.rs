//! Folding log lines into a whole-battle structure

use crate::ParseError;
use crate::log::events::{DamageLine, StatChange};
use crate::log::refs::{CharacterRef, HealthEntry, Side};
use crate::log::roster::{ChanceStat, SkillSlotKind, StatName};
use crate::log::{LogLine, parse_log_line};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A character as printed in the roster section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub side: Option<Side>,
    pub level: u32,
    pub quality: u32,
    pub evolution: u32,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    /// Chance stats are stored as fractions (5% -> 0.05)
    pub critical_chance: f64,
    pub dodge_chance: f64,
    pub counter_chance: f64,
    pub lifesteal: f64,
    pub piercing: f64,
    /// Taken from a `tag_archetype_<name>` tag
    pub archetype: Option<String>,
    pub skills: Vec<RosterSkill>,
    pub tags: Vec<String>,
}

impl RosterEntry {
    fn new(id: String, level: u32, quality: u32, evolution: u32) -> Self {
        RosterEntry {
            id,
            side: None,
            level,
            quality,
            evolution,
            health: 0,
            max_health: 0,
            attack: 0,
            defense: 0,
            speed: 0,
            critical_chance: 0.0,
            dodge_chance: 0.0,
            counter_chance: 0.0,
            lifesteal: 0.0,
            piercing: 0.0,
            archetype: None,
            skills: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn character_ref(&self) -> CharacterRef {
        CharacterRef {
            id: self.id.clone(),
            side: self.side,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSkill {
    pub kind: SkillSlotKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub owner: CharacterRef,
    /// Most recent team health printed before this turn started
    pub team_health: Vec<HealthEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillUseRecord {
    pub turn: u32,
    pub actor: Option<CharacterRef>,
    pub kind: SkillSlotKind,
    pub skill_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub turn: u32,
    /// Last active skill announced in the same turn
    pub skill_id: Option<String>,
    pub line: DamageLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealRecord {
    pub turn: u32,
    pub target: CharacterRef,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnockoutRecord {
    pub turn: u32,
    pub character: CharacterRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub turn: u32,
    pub status: String,
    pub duration: Option<u32>,
    pub source: Option<CharacterRef>,
    pub target: CharacterRef,
}

impl StatusRecord {
    pub fn is_buff(&self) -> bool {
        self.status.contains("Up") || self.status.contains("Buff")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatChangeRecord {
    /// 0 for changes applied during onboarding
    pub turn: u32,
    pub change: StatChange,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BattleResult {
    pub won: bool,
    pub winner: Option<String>,
    pub total_turns: u32,
    pub stars: u8,
    /// Health printed with the BattleEnd state change
    pub final_health: Vec<HealthEntry>,
}

/// A whole battle log, folded line by line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedBattle {
    pub seed: u64,
    pub game_mode: String,
    pub left_team: Vec<RosterEntry>,
    pub right_team: Vec<RosterEntry>,
    /// Health printed with the first TurnStart state change
    pub turn_start_health: Vec<HealthEntry>,
    pub stat_changes: Vec<StatChangeRecord>,
    pub turns: Vec<TurnRecord>,
    pub skill_uses: Vec<SkillUseRecord>,
    pub damage_events: Vec<DamageRecord>,
    pub heal_events: Vec<HealRecord>,
    pub ko_events: Vec<KnockoutRecord>,
    pub status_events: Vec<StatusRecord>,
    pub result: BattleResult,
}

impl ParsedBattle {
    pub fn team(&self, side: Side) -> &[RosterEntry] {
        match side {
            Side::Left => &self.left_team,
            Side::Right => &self.right_team,
        }
    }

    /// Roster entry for a reference, honouring the side when one is known
    pub fn find_character(&self, character: &CharacterRef) -> Option<&RosterEntry> {
        self.left_team
            .iter()
            .chain(self.right_team.iter())
            .find(|c| c.id == character.id && (character.side.is_none() || c.side == character.side))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    Preamble,
    Roster,
    Battle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HealthTarget {
    #[default]
    None,
    FirstTurnStart,
    BattleEnd,
}

#[derive(Debug, Default)]
struct ParsedBattleBuilder {
    section: Section,
    health_target: HealthTarget,
    expect_game_mode: bool,
    current: Option<RosterEntry>,
    turn: u32,
    turn_owner: Option<CharacterRef>,
    last_skill: Option<String>,
    left_health: Vec<HealthEntry>,
    right_health: Vec<HealthEntry>,

    seed: u64,
    game_mode: Option<String>,
    left_team: Vec<RosterEntry>,
    right_team: Vec<RosterEntry>,
    turn_start_health: Vec<HealthEntry>,
    stat_changes: Vec<StatChangeRecord>,
    turns: Vec<TurnRecord>,
    skill_uses: Vec<SkillUseRecord>,
    damage_events: Vec<DamageRecord>,
    heal_events: Vec<HealRecord>,
    ko_events: Vec<KnockoutRecord>,
    status_events: Vec<StatusRecord>,
    won: Option<bool>,
    winner: Option<String>,
    total_turns: Option<u32>,
    stars: u8,
    final_health: Vec<HealthEntry>,
}

impl ParsedBattleBuilder {
    fn apply(&mut self, line: LogLine) {
        if self.expect_game_mode {
            match &line {
                LogLine::Raw(text) if text.is_empty() => return,
                LogLine::Raw(text) => {
                    self.game_mode = text.split_whitespace().next().map(str::to_string);
                    self.expect_game_mode = false;
                    return;
                }
                _ => self.expect_game_mode = false,
            }
        }

        match line {
            LogLine::Seed(seed) => self.seed = seed,
            LogLine::GameModeHeader => self.expect_game_mode = true,
            LogLine::BattleStart => self.section = Section::Roster,

            LogLine::CharacterHeader {
                id,
                level,
                quality,
                evolution,
            } if self.section == Section::Roster => {
                self.flush_character();
                self.current = Some(RosterEntry::new(id, level, quality, evolution));
            }
            LogLine::TeamAssignment(side) => {
                if let Some(current) = self.roster_entry() {
                    current.side = Some(side);
                }
            }
            LogLine::BaseStat { stat, current, max } => {
                if let Some(entry) = self.roster_entry() {
                    match stat {
                        StatName::Health => {
                            entry.health = current;
                            entry.max_health = max;
                        }
                        StatName::Attack => entry.attack = current,
                        StatName::Defense => entry.defense = current,
                        StatName::Speed => entry.speed = current,
                    }
                }
            }
            LogLine::ChanceStat { stat, percent } => {
                if let Some(entry) = self.roster_entry() {
                    let fraction = percent / 100.0;
                    match stat {
                        ChanceStat::Critical => entry.critical_chance = fraction,
                        ChanceStat::Dodge => entry.dodge_chance = fraction,
                        ChanceStat::Counter => entry.counter_chance = fraction,
                        ChanceStat::Lifesteal => entry.lifesteal = fraction,
                        ChanceStat::Piercing => entry.piercing = fraction,
                    }
                }
            }
            LogLine::Tag(tag) => {
                if let Some(entry) = self.roster_entry() {
                    if let Some(archetype) = tag.strip_prefix("tag_archetype_") {
                        entry.archetype = Some(archetype.to_string());
                    }
                    entry.tags.push(tag);
                }
            }
            LogLine::SkillEntry { kind, id } => {
                if let Some(entry) = self.roster_entry() {
                    entry.skills.push(RosterSkill { kind, id });
                }
            }

            LogLine::StateChange { to, .. } => {
                self.leave_roster();
                self.health_target = match to.as_str() {
                    "TurnStart" if self.turn_start_health.is_empty() => HealthTarget::FirstTurnStart,
                    "BattleEnd" => {
                        self.final_health.clear();
                        HealthTarget::BattleEnd
                    }
                    _ => HealthTarget::None,
                };
            }
            LogLine::TeamHealth { side, entries } => {
                match self.health_target {
                    HealthTarget::FirstTurnStart => self.turn_start_health.extend(entries.iter().cloned()),
                    HealthTarget::BattleEnd => self.final_health.extend(entries.iter().cloned()),
                    HealthTarget::None => {}
                }
                match side {
                    Side::Left => self.left_health = entries,
                    Side::Right => self.right_health = entries,
                }
            }
            LogLine::StatChange(change) => self.stat_changes.push(StatChangeRecord {
                turn: self.turn,
                change,
            }),

            LogLine::TurnStart { owner, turn } => {
                self.leave_roster();
                self.turn = turn;
                self.last_skill = None;
                self.turns.push(TurnRecord {
                    turn,
                    owner: owner.clone(),
                    team_health: self
                        .left_health
                        .iter()
                        .chain(self.right_health.iter())
                        .cloned()
                        .collect(),
                });
                self.turn_owner = Some(owner);
            }
            LogLine::SkillUse {
                actor,
                kind,
                skill_id,
            } => {
                let actor = match (actor, kind) {
                    (Some(actor), _) => Some(actor),
                    (None, SkillSlotKind::Active) => self.turn_owner.clone(),
                    (None, SkillSlotKind::Passive) => None,
                };
                if kind == SkillSlotKind::Active {
                    self.last_skill = Some(skill_id.clone());
                }
                self.skill_uses.push(SkillUseRecord {
                    turn: self.turn,
                    actor,
                    kind,
                    skill_id,
                });
            }
            LogLine::Damage(line) => self.damage_events.push(DamageRecord {
                turn: self.turn,
                skill_id: self.last_skill.clone(),
                line,
            }),
            LogLine::Heal { target, amount } => self.heal_events.push(HealRecord {
                turn: self.turn,
                target,
                amount,
            }),
            LogLine::Knockout { character, turn } => self.ko_events.push(KnockoutRecord {
                turn: if turn > 0 { turn } else { self.turn },
                character,
            }),
            LogLine::StatusAdded {
                status,
                duration,
                source,
                target,
            } => self.status_events.push(StatusRecord {
                turn: self.turn,
                status,
                duration,
                source,
                target,
            }),

            LogLine::BattleWon(won) => self.won = Some(won),
            LogLine::Winner(winner) => self.winner = Some(winner),
            LogLine::TotalTurns(turns) => self.total_turns = Some(turns),
            LogLine::Stars(stars) => self.stars = stars,

            LogLine::Flow { .. } => self.leave_roster(),
            LogLine::CharacterHeader { .. } | LogLine::Raw(_) => {}
        }
    }

    fn roster_entry(&mut self) -> Option<&mut RosterEntry> {
        if self.section != Section::Roster {
            return None;
        }
        self.current.as_mut()
    }

    fn leave_roster(&mut self) {
        if self.section == Section::Roster {
            self.flush_character();
            self.section = Section::Battle;
        }
    }

    fn flush_character(&mut self) {
        let Some(entry) = self.current.take() else {
            return;
        };
        match entry.side {
            Some(Side::Left) => self.left_team.push(entry),
            Some(Side::Right) => self.right_team.push(entry),
            None => {}
        }
    }

    fn finish(mut self) -> Result<ParsedBattle> {
        self.leave_roster();

        if self.left_team.is_empty() && self.right_team.is_empty() {
            return Err(ParseError::MissingField("roster".to_string()).into());
        }

        let last_turn = self.turns.iter().map(|t| t.turn).max().unwrap_or(0);
        let won = self
            .won
            .unwrap_or_else(|| self.winner.as_deref() == Some("Team1"));

        Ok(ParsedBattle {
            seed: self.seed,
            game_mode: self.game_mode.unwrap_or_else(|| "Unknown".to_string()),
            left_team: self.left_team,
            right_team: self.right_team,
            turn_start_health: self.turn_start_health,
            stat_changes: self.stat_changes,
            turns: self.turns,
            skill_uses: self.skill_uses,
            damage_events: self.damage_events,
            heal_events: self.heal_events,
            ko_events: self.ko_events,
            status_events: self.status_events,
            result: BattleResult {
                won,
                winner: self.winner,
                total_turns: self.total_turns.unwrap_or(last_turn),
                stars: self.stars,
                final_health: self.final_health,
            },
        })
    }
}

/// Parse a complete battle log
pub fn parse_battle_log(content: &str) -> Result<ParsedBattle> {
    if content.trim().is_empty() {
        return Err(ParseError::EmptyLog.into());
    }

    let mut builder = ParsedBattleBuilder::default();
    for (index, line) in content.lines().enumerate() {
        let parsed = parse_log_line(line).with_context(|| format!("line {}", index + 1))?;
        builder.apply(parsed);
    }

    builder.finish()
}
