//! Immutable, owned view of a battle for advisors and displays

use std::fmt;

use crate::engine::{Battle, Outcome};
use crate::types::{Action, Character, EffectKind, SkillSlot, TargetPattern, Team};

/// How many of the latest actions a snapshot carries
pub const RECENT_ACTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSnapshot {
    pub kind: EffectKind,
    pub magnitude: u32,
    pub remaining: u32,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSnapshot {
    pub id: String,
    pub name: String,
    pub power: u32,
    pub pattern: TargetPattern,
    /// Base cooldown
    pub cooldown: u32,
    /// Owner turns left before the skill is ready
    pub remaining_cooldown: u32,
    pub passive: bool,
    /// Usable by its owner right now
    pub available: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSnapshot {
    pub id: String,
    pub name: String,
    pub team: Team,
    pub slot: usize,
    pub archetype: Option<String>,
    pub level: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub hp_percent: f64,
    pub is_alive: bool,
    /// Effective stats after modifiers
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub effects: Vec<EffectSnapshot>,
    pub skills: Vec<SkillSnapshot>,
}

impl CharacterSnapshot {
    fn capture(character: &Character) -> Self {
        Self {
            id: character.id.clone(),
            name: character.name.clone(),
            team: character.team,
            slot: character.slot,
            archetype: character.archetype.clone(),
            level: character.level,
            current_hp: character.current_hp(),
            max_hp: character.max_hp(),
            hp_percent: character.hp_percent(),
            is_alive: character.is_alive(),
            attack: character.attack(),
            defense: character.defense(),
            speed: character.speed(),
            effects: character
                .effects()
                .iter()
                .map(|e| EffectSnapshot {
                    kind: e.kind,
                    magnitude: e.magnitude,
                    remaining: e.remaining,
                    source: e.source.clone(),
                })
                .collect(),
            skills: character
                .skills()
                .iter()
                .map(|slot| skill_snapshot(character, slot))
                .collect(),
        }
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn is_taunting(&self) -> bool {
        self.is_alive && self.has_effect(EffectKind::Taunt)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillSnapshot> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn available_skills(&self) -> impl Iterator<Item = &SkillSnapshot> {
        self.skills.iter().filter(|s| s.available)
    }
}

fn skill_snapshot(owner: &Character, slot: &SkillSlot) -> SkillSnapshot {
    SkillSnapshot {
        id: slot.skill.id.clone(),
        name: slot.skill.name.clone(),
        power: slot.skill.power,
        pattern: slot.skill.pattern,
        cooldown: slot.skill.cooldown,
        remaining_cooldown: slot.cooldown,
        passive: slot.skill.passive,
        available: owner.can_use(slot),
        description: slot.skill.description.clone(),
    }
}

/// Everything an advisor may look at
///
/// Owned and detached from the battle, so it can be handed to another task
/// while the battle waits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub round: u32,
    pub perspective: Team,
    pub outcome: Outcome,
    /// Whose turn it is; `None` once the battle is over
    pub pending_actor: Option<String>,
    /// Initiative order of the current round
    pub turn_order: Vec<String>,
    /// Living characters still to act this round, pending actor first
    pub upcoming: Vec<String>,
    /// Left team first, slot order
    pub characters: Vec<CharacterSnapshot>,
    /// Latest actions, oldest first
    pub recent_actions: Vec<Action>,
}

impl BattleSnapshot {
    pub fn character(&self, id: &str) -> Option<&CharacterSnapshot> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// The character whose turn it is
    pub fn pending(&self) -> Option<&CharacterSnapshot> {
        self.pending_actor.as_deref().and_then(|id| self.character(id))
    }

    pub fn team(&self, team: Team) -> impl Iterator<Item = &CharacterSnapshot> {
        self.characters.iter().filter(move |c| c.team == team)
    }

    /// Living teammates of `id`, itself excluded
    pub fn allies_of(&self, id: &str) -> Vec<&CharacterSnapshot> {
        let Some(me) = self.character(id) else {
            return Vec::new();
        };
        self.team(me.team)
            .filter(|c| c.is_alive && c.id != id)
            .collect()
    }

    /// Living members of the team opposing `id`
    pub fn enemies_of(&self, id: &str) -> Vec<&CharacterSnapshot> {
        let Some(me) = self.character(id) else {
            return Vec::new();
        };
        self.team(me.team.opponent()).filter(|c| c.is_alive).collect()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }
}

impl fmt::Display for BattleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} ({})", self.round, self.outcome)?;
        for team in [Team::Left, Team::Right] {
            let marker = if team == self.perspective { " (you)" } else { "" };
            writeln!(f, "{team} team{marker}:")?;
            for c in self.team(team) {
                let status = if c.is_alive { "" } else { " KO" };
                write!(f, "  {} {}/{} HP{}", c.name, c.current_hp, c.max_hp, status)?;
                if !c.effects.is_empty() {
                    let effects: Vec<String> = c
                        .effects
                        .iter()
                        .map(|e| format!("{}({})", e.kind, e.remaining))
                        .collect();
                    write!(f, " [{}]", effects.join(", "))?;
                }
                writeln!(f)?;
            }
        }
        if let Some(pending) = self.pending() {
            write!(f, "Next: {}", pending.name)?;
        }
        Ok(())
    }
}

impl Battle {
    /// Capture the current state for an advisor or a display
    pub fn snapshot(&self) -> BattleSnapshot {
        let recent_start = self.transcript().len().saturating_sub(RECENT_ACTIONS);
        BattleSnapshot {
            round: self.round(),
            perspective: self.perspective(),
            outcome: self.outcome(),
            pending_actor: self.pending_actor().map(|c| c.id.clone()),
            turn_order: self.turn_order().to_vec(),
            upcoming: self.upcoming().into_iter().map(str::to_string).collect(),
            characters: self.characters().map(CharacterSnapshot::capture).collect(),
            recent_actions: self.transcript()[recent_start..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{Battle, Outcome};
    use crate::rules::BattleRules;
    use crate::types::{
        BaseStats, Character, Effect, EffectKind, EffectTemplate, Skill, TargetPattern, Team,
    };

    fn battle() -> Battle {
        let a = Character::new("bugs", "Bugs Bunny", 100, BaseStats::new(40, 0, 50))
            .with_skill(Skill::new("bugs_strike", "Strike", 100, TargetPattern::SingleEnemy))
            .with_skill(Skill::new("bugs_blast", "Blast", 100, TargetPattern::SingleEnemy).with_cooldown(2));
        let b = Character::new("wile", "Wile E. Coyote", 500, BaseStats::new(10, 0, 30))
            .with_skill(Skill::new("wile_strike", "Strike", 100, TargetPattern::SingleEnemy))
            .with_effect(Effect::from_template(&EffectTemplate::new(EffectKind::DefenseDown, 2), None));
        Battle::new(vec![a], vec![b], BattleRules::default()).unwrap()
    }

    #[test]
    fn test_snapshot_initial_state() {
        let snapshot = battle().snapshot();
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.outcome, Outcome::NotStarted);
        assert_eq!(snapshot.pending_actor.as_deref(), Some("bugs"));
        assert_eq!(snapshot.turn_order, vec!["bugs", "wile"]);
        assert_eq!(snapshot.characters.len(), 2);

        let wile = snapshot.character("wile").unwrap();
        assert_eq!(wile.hp_percent, 100.0);
        assert!(wile.has_effect(EffectKind::DefenseDown));
        assert_eq!(wile.effects[0].remaining, 2);

        assert_eq!(snapshot.enemies_of("bugs").len(), 1);
        assert!(snapshot.allies_of("bugs").is_empty());
    }

    #[test]
    fn test_snapshot_tracks_cooldowns_and_actions() {
        let mut battle = battle();
        battle.resolve("bugs", "bugs_blast", &["wile"]).unwrap();
        let snapshot = battle.snapshot();

        let bugs = snapshot.character("bugs").unwrap();
        let blast = bugs.skill("bugs_blast").unwrap();
        assert_eq!(blast.remaining_cooldown, 1);
        assert!(!blast.available);
        assert_eq!(bugs.available_skills().count(), 1);

        assert_eq!(snapshot.pending().unwrap().id, "wile");
        assert_eq!(snapshot.recent_actions.len(), 1);
        assert_eq!(snapshot.character("wile").unwrap().current_hp, 460);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut battle = battle();
        let before = battle.snapshot();
        battle.resolve("bugs", "bugs_strike", &["wile"]).unwrap();
        assert_eq!(before.character("wile").unwrap().current_hp, 500);
        assert_ne!(before, battle.snapshot());
    }

    #[test]
    fn test_recent_actions_capped() {
        let mut battle = battle();
        for _ in 0..4 {
            battle.resolve("bugs", "bugs_strike", &["wile"]).unwrap();
            battle.resolve("wile", "wile_strike", &["bugs"]).unwrap();
        }
        let snapshot = battle.snapshot();
        assert_eq!(snapshot.recent_actions.len(), super::RECENT_ACTIONS);
        assert_eq!(snapshot.recent_actions.last().unwrap().sequence, 8);
    }

    #[test]
    fn test_display_summary() {
        let text = battle().with_perspective(Team::Right).snapshot().to_string();
        assert!(text.contains("Round 1"));
        assert!(text.contains("right team (you):"));
        assert!(text.contains("Wile E. Coyote 500/500 HP [DefenseDown(2)]"));
        assert!(text.ends_with("Next: Bugs Bunny"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_json() {
        let snapshot = battle().snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["pending_actor"], "bugs");
        assert_eq!(json["characters"][1]["effects"][0]["kind"], "DefenseDown");

        let back: super::BattleSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
