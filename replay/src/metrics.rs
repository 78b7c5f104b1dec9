//! Post-hoc battle metrics computed from a parsed log

use mayhem_protocol::{CharacterRef, ParsedBattle, RosterEntry, Side};
use serde::{Deserialize, Serialize};

/// Turn-order entries kept in [`BattleMetrics::turn_order`]
const TURN_ORDER_LEN: usize = 5;

/// Relative difference (percent) needed before a side counts as ahead
const ADVANTAGE_THRESHOLD: f64 = 10.0;

/// Hits above this are key moments
const BIG_HIT: u32 = 50;

/// Knock-outs on or before this turn are early deaths
const EARLY_DEATH_TURN: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterMetrics {
    pub id: String,
    pub team: Side,
    pub archetype: Option<String>,
    pub level: u32,

    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub healing_received: u32,

    pub turns_taken: u32,
    pub first_turn: Option<u32>,

    pub knocked_out: bool,
    pub ko_turn: Option<u32>,

    pub buffs_received: u32,
    pub debuffs_received: u32,
    pub buffs_applied: u32,
    pub debuffs_applied: u32,

    pub starting_health: u32,
    pub starting_attack: u32,
    pub starting_defense: u32,
    pub starting_speed: u32,

    pub final_health: u32,
    pub final_health_percent: f64,
}

impl CharacterMetrics {
    fn from_roster(entry: &RosterEntry, team: Side) -> Self {
        Self {
            id: entry.id.clone(),
            team,
            archetype: entry.archetype.clone(),
            level: entry.level,
            damage_dealt: 0,
            damage_taken: 0,
            healing_received: 0,
            turns_taken: 0,
            first_turn: None,
            knocked_out: false,
            ko_turn: None,
            buffs_received: 0,
            debuffs_received: 0,
            buffs_applied: 0,
            debuffs_applied: 0,
            starting_health: entry.max_health,
            starting_attack: entry.attack,
            starting_defense: entry.defense,
            starting_speed: entry.speed,
            final_health: 0,
            final_health_percent: 0.0,
        }
    }

    fn matches(&self, character: &CharacterRef) -> bool {
        self.id == character.id && character.side.is_none_or(|side| side == self.team)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
    pub team: Side,
    pub total_damage_dealt: u32,
    pub total_damage_taken: u32,
    pub total_healing: u32,

    pub avg_attack: f64,
    pub avg_defense: f64,
    pub avg_speed: f64,
    pub avg_health: f64,

    pub character_count: usize,
    pub archetypes: Vec<String>,

    pub total_turns: u32,
    /// This team owned the first turn of the battle
    pub first_turn: bool,

    pub characters_ko: usize,
    pub characters_alive: usize,

    pub total_buffs: u32,
    pub total_debuffs_received: u32,
}

impl TeamMetrics {
    fn compute(team: Side, characters: &[CharacterMetrics]) -> Self {
        let count = characters.len();
        let avg = |f: fn(&CharacterMetrics) -> u32| {
            if count == 0 {
                0.0
            } else {
                characters.iter().map(|c| f64::from(f(c))).sum::<f64>() / count as f64
            }
        };
        let ko = characters.iter().filter(|c| c.knocked_out).count();

        Self {
            team,
            total_damage_dealt: characters.iter().map(|c| c.damage_dealt).sum(),
            total_damage_taken: characters.iter().map(|c| c.damage_taken).sum(),
            total_healing: characters.iter().map(|c| c.healing_received).sum(),
            avg_attack: avg(|c| c.starting_attack),
            avg_defense: avg(|c| c.starting_defense),
            avg_speed: avg(|c| c.starting_speed),
            avg_health: avg(|c| c.starting_health),
            character_count: count,
            archetypes: characters.iter().filter_map(|c| c.archetype.clone()).collect(),
            total_turns: characters.iter().map(|c| c.turns_taken).sum(),
            first_turn: false,
            characters_ko: ko,
            characters_alive: count - ko,
            total_buffs: characters.iter().map(|c| c.buffs_received).sum(),
            total_debuffs_received: characters.iter().map(|c| c.debuffs_received).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BattleVerdict {
    Win,
    Loss,
}

/// Which side a stat comparison favours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    Player,
    Enemy,
    Even,
}

impl Advantage {
    /// Compare team averages; within 10% either way is even
    pub fn compare(player: f64, enemy: f64) -> Self {
        let larger = player.max(enemy);
        if larger <= 0.0 {
            return Advantage::Even;
        }
        let diff = (player - enemy) / larger * 100.0;
        if diff > ADVANTAGE_THRESHOLD {
            Advantage::Player
        } else if diff < -ADVANTAGE_THRESHOLD {
            Advantage::Enemy
        } else {
            Advantage::Even
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutMoment {
    pub character: String,
    pub turn: u32,
    pub team: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiggestHit {
    pub attacker: String,
    pub target: String,
    pub damage: u32,
    pub turn: u32,
    pub skill: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrderEntry {
    pub character: String,
    pub turn: u32,
    pub team: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentKind {
    FirstKo,
    BigDamage,
    EarlyDeath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMoment {
    pub turn: u32,
    pub kind: MomentKind,
    pub description: String,
}

/// Everything computed about a finished battle, left team as the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleMetrics {
    pub result: BattleVerdict,
    pub winner_team: Option<String>,
    pub total_turns: u32,
    pub stars: u8,

    pub player_team: TeamMetrics,
    pub enemy_team: TeamMetrics,
    pub player_characters: Vec<CharacterMetrics>,
    pub enemy_characters: Vec<CharacterMetrics>,

    pub first_ko: Option<KnockoutMoment>,
    pub biggest_hit: Option<BiggestHit>,
    pub turn_order: Vec<TurnOrderEntry>,

    pub speed_advantage: Advantage,
    pub attack_advantage: Advantage,
    pub defense_advantage: Advantage,
    pub health_advantage: Advantage,

    pub key_moments: Vec<KeyMoment>,
}

impl BattleMetrics {
    pub fn character(&self, id: &str) -> Option<&CharacterMetrics> {
        self.player_characters
            .iter()
            .chain(self.enemy_characters.iter())
            .find(|c| c.id == id)
    }
}

/// Compute metrics for a parsed battle
pub fn compute(parsed: &ParsedBattle) -> BattleMetrics {
    let mut characters: Vec<CharacterMetrics> = parsed
        .left_team
        .iter()
        .map(|e| CharacterMetrics::from_roster(e, Side::Left))
        .chain(
            parsed
                .right_team
                .iter()
                .map(|e| CharacterMetrics::from_roster(e, Side::Right)),
        )
        .collect();

    fn find<'a>(chars: &'a mut [CharacterMetrics], r: &CharacterRef) -> Option<&'a mut CharacterMetrics> {
        chars.iter_mut().find(|c| c.matches(r))
    }

    for event in &parsed.damage_events {
        if let Some(c) = find(&mut characters, &event.line.attacker) {
            c.damage_dealt += event.line.total;
        }
        if let Some(c) = find(&mut characters, &event.line.target) {
            c.damage_taken += event.line.total;
        }
    }

    for event in &parsed.heal_events {
        if let Some(c) = find(&mut characters, &event.target) {
            c.healing_received += event.amount;
        }
    }

    for event in &parsed.ko_events {
        if let Some(c) = find(&mut characters, &event.character) {
            c.knocked_out = true;
            c.ko_turn = Some(event.turn);
        }
    }

    let mut turn_order = Vec::new();
    for turn in &parsed.turns {
        if let Some(c) = find(&mut characters, &turn.owner) {
            c.turns_taken += 1;
            if c.first_turn.is_none() {
                c.first_turn = Some(turn.turn);
                turn_order.push(TurnOrderEntry {
                    character: c.id.clone(),
                    turn: turn.turn,
                    team: c.team,
                });
            }
        }
    }

    for event in &parsed.status_events {
        let buff = event.is_buff();
        if let Some(c) = find(&mut characters, &event.target) {
            if buff {
                c.buffs_received += 1;
            } else {
                c.debuffs_received += 1;
            }
        }
        let Some(source) = &event.source else {
            continue;
        };
        if let Some(c) = find(&mut characters, source) {
            if buff {
                c.buffs_applied += 1;
            } else {
                c.debuffs_applied += 1;
            }
        }
    }

    for entry in &parsed.result.final_health {
        if let Some(c) = find(&mut characters, &entry.character) {
            c.final_health = entry.hp.current;
            c.final_health_percent = if entry.hp.max > 0 {
                f64::from(entry.hp.current) / f64::from(entry.hp.max) * 100.0
            } else {
                0.0
            };
        }
    }

    let (player_characters, enemy_characters): (Vec<_>, Vec<_>) =
        characters.into_iter().partition(|c| c.team == Side::Left);

    let mut player_team = TeamMetrics::compute(Side::Left, &player_characters);
    let mut enemy_team = TeamMetrics::compute(Side::Right, &enemy_characters);
    if let Some(first) = turn_order.first() {
        player_team.first_turn = first.team == Side::Left;
        enemy_team.first_turn = first.team == Side::Right;
    }

    let first_ko = parsed.ko_events.first().map(|ko| KnockoutMoment {
        character: ko.character.id.clone(),
        turn: ko.turn,
        team: ko
            .character
            .side
            .or_else(|| parsed.find_character(&ko.character).and_then(|e| e.side))
            .unwrap_or(Side::Right),
    });

    // rev() so the earliest of several equal hits wins
    let biggest_hit = parsed
        .damage_events
        .iter()
        .rev()
        .max_by_key(|d| d.line.total)
        .map(|d| BiggestHit {
            attacker: d.line.attacker.id.clone(),
            target: d.line.target.id.clone(),
            damage: d.line.total,
            turn: d.turn,
            skill: d.skill_id.clone(),
        });

    let key_moments = key_moments(parsed, first_ko.as_ref(), biggest_hit.as_ref());
    turn_order.truncate(TURN_ORDER_LEN);

    let metrics = BattleMetrics {
        result: if parsed.result.winner.as_deref() == Some("Team1") {
            BattleVerdict::Win
        } else {
            BattleVerdict::Loss
        },
        winner_team: parsed.result.winner.clone(),
        total_turns: parsed.result.total_turns,
        stars: parsed.result.stars,
        speed_advantage: Advantage::compare(player_team.avg_speed, enemy_team.avg_speed),
        attack_advantage: Advantage::compare(player_team.avg_attack, enemy_team.avg_attack),
        defense_advantage: Advantage::compare(player_team.avg_defense, enemy_team.avg_defense),
        health_advantage: Advantage::compare(player_team.avg_health, enemy_team.avg_health),
        player_team,
        enemy_team,
        player_characters,
        enemy_characters,
        first_ko,
        biggest_hit,
        turn_order,
        key_moments,
    };

    tracing::debug!(
        result = ?metrics.result,
        turns = metrics.total_turns,
        moments = metrics.key_moments.len(),
        "battle metrics computed"
    );
    metrics
}

fn key_moments(
    parsed: &ParsedBattle,
    first_ko: Option<&KnockoutMoment>,
    biggest_hit: Option<&BiggestHit>,
) -> Vec<KeyMoment> {
    let mut moments = Vec::new();

    if let Some(ko) = first_ko {
        let label = if ko.team == Side::Left { "player" } else { "enemy" };
        moments.push(KeyMoment {
            turn: ko.turn,
            kind: MomentKind::FirstKo,
            description: format!("{} ({}) was knocked out on turn {}", ko.character, label, ko.turn),
        });
    }

    if let Some(hit) = biggest_hit.filter(|h| h.damage > BIG_HIT) {
        moments.push(KeyMoment {
            turn: hit.turn,
            kind: MomentKind::BigDamage,
            description: format!(
                "{} dealt {} damage to {} using {}",
                hit.attacker,
                hit.damage,
                hit.target,
                hit.skill.as_deref().unwrap_or("an unknown skill")
            ),
        });
    }

    for ko in parsed.ko_events.iter().filter(|ko| ko.turn <= EARLY_DEATH_TURN) {
        moments.push(KeyMoment {
            turn: ko.turn,
            kind: MomentKind::EarlyDeath,
            description: format!("{} died very early on turn {}", ko.character.id, ko.turn),
        });
    }

    moments.sort_by_key(|m| m.turn);
    moments
}
