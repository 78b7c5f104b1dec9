//! Battle - roster, turn pointer and terminal outcome

use std::collections::HashSet;

use crate::error::{ResolveError, SetupError};
use crate::rules::BattleRules;
use crate::types::{
    Action, BattleEvent, Character, SkipReason, Skill, Team, TeamState,
};

use super::scheduler::TurnScheduler;

/// Battle outcome from the perspective team's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    NotStarted,
    InProgress,
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Win | Outcome::Loss | Outcome::Draw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::NotStarted => "not started",
            Outcome::InProgress => "in progress",
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Draw => "draw",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    NotStarted,
    InProgress,
    /// `None` winner means a draw
    Finished { winner: Option<Team> },
}

/// A turn-based battle between two teams
///
/// [`resolve`](Battle::resolve) is the only way to change a battle once it
/// has been built; every other method is a read-only view.
#[derive(Debug, Clone)]
pub struct Battle {
    pub(crate) teams: [TeamState; 2],
    pub(crate) rules: BattleRules,
    pub(crate) scheduler: TurnScheduler,
    pub(crate) phase: Phase,
    pub(crate) transcript: Vec<Action>,
    pub(crate) events: Vec<BattleEvent>,
    perspective: Team,
    acted_this_round: bool,
    idle_rounds: u32,
}

impl Battle {
    /// Build a battle and schedule its first round
    ///
    /// Characters are placed in the order given; that order is the slot
    /// order used to break initiative ties.
    pub fn new(
        left: Vec<Character>,
        right: Vec<Character>,
        rules: BattleRules,
    ) -> Result<Self, SetupError> {
        validate_roster(&left, &right)?;

        let mut teams = [TeamState::new(Team::Left), TeamState::new(Team::Right)];
        for (team, characters) in [(Team::Left, left), (Team::Right, right)] {
            for (slot, mut character) in characters.into_iter().enumerate() {
                character.place(team, slot);
                teams[team.index()].characters.push(character);
            }
        }

        let mut battle = Self {
            teams,
            rules,
            scheduler: TurnScheduler::new(),
            phase: Phase::NotStarted,
            transcript: Vec::new(),
            events: Vec::new(),
            perspective: Team::Left,
            acted_this_round: false,
            idle_rounds: 0,
        };

        battle.start_round();
        battle.settle();
        Ok(battle)
    }

    /// Report Win/Loss relative to `team` instead of the left team
    pub fn with_perspective(mut self, team: Team) -> Self {
        self.perspective = team;
        self
    }

    pub fn set_perspective(&mut self, team: Team) {
        self.perspective = team;
    }

    pub fn perspective(&self) -> Team {
        self.perspective
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    // === State machine ===

    pub fn outcome(&self) -> Outcome {
        match self.phase {
            Phase::NotStarted => Outcome::NotStarted,
            Phase::InProgress => Outcome::InProgress,
            Phase::Finished { winner: None } => Outcome::Draw,
            Phase::Finished { winner: Some(team) } if team == self.perspective => Outcome::Win,
            Phase::Finished { winner: Some(_) } => Outcome::Loss,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    /// Winning team, if the battle ended with one
    pub fn winner(&self) -> Option<Team> {
        match self.phase {
            Phase::Finished { winner } => winner,
            _ => None,
        }
    }

    pub fn round(&self) -> u32 {
        self.scheduler.round()
    }

    /// Initiative order of the current round
    pub fn turn_order(&self) -> &[String] {
        self.scheduler.order()
    }

    /// Living characters still to act this round, the pending one first
    pub fn upcoming(&self) -> Vec<&str> {
        self.scheduler
            .remaining()
            .iter()
            .map(String::as_str)
            .filter(|id| self.character(id).is_some_and(|c| c.is_alive()))
            .collect()
    }

    pub fn transcript(&self) -> &[Action] {
        &self.transcript
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    // === Roster ===

    pub fn team(&self, team: Team) -> &TeamState {
        &self.teams[team.index()]
    }

    pub fn teams(&self) -> &[TeamState; 2] {
        &self.teams
    }

    /// All characters, left team first, in slot order
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.teams.iter().flat_map(|t| t.characters.iter())
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.teams.iter().find_map(|t| t.get(id))
    }

    pub(crate) fn character_mut(&mut self, id: &str) -> Option<&mut Character> {
        self.teams.iter_mut().find_map(|t| t.get_mut(id))
    }

    /// Living teammates of a character, itself excluded
    pub fn allies_of(&self, id: &str) -> Vec<&Character> {
        let Some(character) = self.character(id) else {
            return Vec::new();
        };
        self.team(character.team)
            .living()
            .filter(|c| c.id != id)
            .collect()
    }

    /// Living members of the opposing team
    pub fn enemies_of(&self, id: &str) -> Vec<&Character> {
        let Some(character) = self.character(id) else {
            return Vec::new();
        };
        self.team(character.team.opponent()).living().collect()
    }

    // === Commands ===

    /// The character expected to act next, if the battle is not over
    pub fn pending_actor(&self) -> Option<&Character> {
        if self.is_over() {
            return None;
        }
        self.scheduler.current().and_then(|id| self.character(id))
    }

    /// Skills `actor_id` could use right now
    pub fn available_skills(&self, actor_id: &str) -> Result<Vec<&Skill>, ResolveError> {
        let character = self
            .character(actor_id)
            .ok_or_else(|| ResolveError::UnknownCharacter(actor_id.to_string()))?;
        Ok(character.available_skills().collect())
    }

    // === Turn flow ===

    fn start_round(&mut self) {
        let order = self.scheduler.start_round(&self.teams).to_vec();
        tracing::debug!(round = self.scheduler.round(), order = ?order, "round started");
        self.events.push(BattleEvent::RoundStarted {
            round: self.scheduler.round(),
            order,
        });
    }

    fn close_round(&mut self) {
        if self.acted_this_round {
            self.idle_rounds = 0;
        } else {
            self.idle_rounds += 1;
        }
        self.acted_this_round = false;
    }

    pub(crate) fn mark_acted(&mut self) {
        self.acted_this_round = true;
    }

    /// Move the turn pointer to the next character able to act
    ///
    /// Knocked out characters are passed over. Characters that cannot act
    /// lose their turn but still tick cooldowns and effects. The terminal
    /// check runs before every step, so no caller observes a finished
    /// battle with a pending actor.
    pub(crate) fn settle(&mut self) {
        loop {
            if self.check_terminal() {
                return;
            }

            let Some(id) = self.scheduler.current().map(str::to_string) else {
                self.close_round();
                if self.idle_rounds >= self.rules.max_idle_rounds.max(1) {
                    tracing::info!(idle_rounds = self.idle_rounds, "no character can act, battle drawn");
                    self.finish(None);
                    return;
                }
                self.start_round();
                continue;
            };

            let Some(character) = self.character(&id) else {
                self.scheduler.advance();
                continue;
            };

            if !character.is_alive() {
                self.scheduler.advance();
                continue;
            }

            if character.can_act() {
                return;
            }

            let reason = if character.is_stunned() {
                SkipReason::Stunned
            } else {
                SkipReason::NoUsableSkill
            };
            tracing::debug!(character = %id, ?reason, "turn skipped");
            self.events.push(BattleEvent::TurnSkipped {
                character: id.clone(),
                reason,
            });
            self.end_turn(&id);
            self.scheduler.advance();
        }
    }

    /// End-of-turn bookkeeping for the character whose turn just finished
    pub(crate) fn end_turn(&mut self, id: &str) {
        let Some(character) = self.character_mut(id) else {
            return;
        };
        let report = character.end_turn();

        if report.healed > 0 {
            self.events.push(BattleEvent::PeriodicHeal {
                character: id.to_string(),
                amount: report.healed,
            });
        }
        if report.damage.dealt > 0 {
            self.events.push(BattleEvent::PeriodicDamage {
                character: id.to_string(),
                amount: report.damage.dealt,
            });
        }
        if report.damage.revived {
            self.events.push(BattleEvent::Revived {
                character: id.to_string(),
            });
        }
        if report.damage.knocked_out {
            tracing::debug!(character = %id, "knocked out by damage over time");
            self.events.push(BattleEvent::KnockedOut {
                character: id.to_string(),
            });
        }
        for kind in report.expired {
            self.events.push(BattleEvent::EffectExpired {
                character: id.to_string(),
                kind,
            });
        }
    }

    /// Finish the battle if a team has been wiped out
    fn check_terminal(&mut self) -> bool {
        if self.is_over() {
            return true;
        }

        let left_wiped = self.teams[Team::Left.index()].is_wiped();
        let right_wiped = self.teams[Team::Right.index()].is_wiped();

        let winner = match (left_wiped, right_wiped) {
            (false, false) => return false,
            (true, true) => None,
            (true, false) => Some(Team::Right),
            (false, true) => Some(Team::Left),
        };

        self.finish(winner);
        true
    }

    fn finish(&mut self, winner: Option<Team>) {
        self.phase = Phase::Finished { winner };
        self.events.push(BattleEvent::Finished { winner });
        tracing::info!(
            winner = winner.map(|t| t.as_str()).unwrap_or("none"),
            outcome = %self.outcome(),
            round = self.scheduler.round(),
            actions = self.transcript.len(),
            "battle finished"
        );
    }
}

fn validate_roster(left: &[Character], right: &[Character]) -> Result<(), SetupError> {
    let malformed = |msg: String| Err::<(), _>(SetupError::MalformedInput(msg));

    if left.is_empty() || right.is_empty() {
        return malformed("both teams need at least one character".to_string());
    }

    let mut ids = HashSet::new();
    for character in left.iter().chain(right.iter()) {
        if character.id.is_empty() {
            return malformed("character with an empty id".to_string());
        }
        if !ids.insert(character.id.as_str()) {
            return malformed(format!("duplicate character id {}", character.id));
        }
        if character.max_hp() == 0 {
            return malformed(format!("{} has zero max HP", character.id));
        }
        if character.current_hp() > character.max_hp() {
            return malformed(format!(
                "{} has {} HP but only {} max",
                character.id,
                character.current_hp(),
                character.max_hp()
            ));
        }
        if !character.skills().iter().any(|s| !s.skill.passive) {
            return malformed(format!("{} has no active skill", character.id));
        }

        let mut skill_ids = HashSet::new();
        for slot in character.skills() {
            if !skill_ids.insert(slot.skill.id.as_str()) {
                return malformed(format!("{} lists skill {} twice", character.id, slot.skill.id));
            }
        }
    }

    for (name, team) in [("left", left), ("right", right)] {
        if !team.iter().any(|c| c.is_alive()) {
            return malformed(format!("{name} team has no living character"));
        }
    }

    Ok(())
}
