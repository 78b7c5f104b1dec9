//! Driving a battle from a script or from a recorded log

use mayhem_battle::{Action, ActionChoice, Battle, Outcome, ResolveError};
use mayhem_protocol::{CharacterRef, ParsedBattle, SkillSlotKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::battle_id;

/// One step of a scripted replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub actor: String,
    pub skill_id: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

impl ScriptedAction {
    pub fn new(actor: impl Into<String>, skill_id: impl Into<String>, targets: &[&str]) -> Self {
        Self {
            actor: actor.into(),
            skill_id: skill_id.into(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn to_choice(&self) -> ActionChoice {
        ActionChoice::new(self.actor.clone(), self.skill_id.clone(), self.targets.clone())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Step {step} ({actor} {skill}) rejected: {source}")]
    Rejected {
        step: usize,
        actor: String,
        skill: String,
        #[source]
        source: ResolveError,
    },
}

/// Applies a fixed list of actions in order
///
/// The same script against the same starting battle always yields the same
/// transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedReplay {
    pub steps: Vec<ScriptedAction>,
}

impl ScriptedReplay {
    pub fn new(steps: Vec<ScriptedAction>) -> Self {
        Self { steps }
    }

    /// Run every step, stopping at the first rejection
    ///
    /// Steps already applied stay applied when a later one is rejected.
    pub fn run(&self, battle: &mut Battle) -> Result<Vec<Action>, ReplayError> {
        let mut actions = Vec::with_capacity(self.steps.len());
        for (step, scripted) in self.steps.iter().enumerate() {
            let action = battle
                .resolve_choice(&scripted.to_choice())
                .map_err(|source| ReplayError::Rejected {
                    step,
                    actor: scripted.actor.clone(),
                    skill: scripted.skill_id.clone(),
                    source,
                })?;
            actions.push(action);
        }
        Ok(actions)
    }
}

/// A logged hit whose damage the simulator did not reproduce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    pub turn: u32,
    pub actor: String,
    pub skill_id: String,
    pub target: String,
    pub logged: u32,
    /// `None` when the simulator did not hit this target at all
    pub simulated: Option<u32>,
}

/// Why a log replay stopped before the end of the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStop {
    pub turn: u32,
    pub actor: String,
    pub skill_id: String,
    pub reason: String,
}

/// Result of replaying a recorded battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Log turns resolved successfully
    pub applied: usize,
    /// Log turns with no active skill to replay
    pub skipped: usize,
    pub divergences: Vec<Divergence>,
    pub stopped: Option<ReplayStop>,
    pub outcome: Outcome,
    pub transcript: Vec<Action>,
}

impl ReplayReport {
    pub fn is_faithful(&self) -> bool {
        self.stopped.is_none() && self.divergences.is_empty()
    }
}

/// Replays a parsed log against a battle built from the same log
///
/// Each logged turn becomes one `resolve` call: the turn owner, the active
/// skill announced in that turn, and the targets of that turn's damage
/// lines. Simulated damage is compared with the logged total.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReplay;

impl LogReplay {
    pub fn run(&self, parsed: &ParsedBattle, battle: &mut Battle) -> ReplayReport {
        let mut report = ReplayReport {
            applied: 0,
            skipped: 0,
            divergences: Vec::new(),
            stopped: None,
            outcome: battle.outcome(),
            transcript: Vec::new(),
        };

        for turn in &parsed.turns {
            if battle.is_over() {
                break;
            }

            let owner_ref = &turn.owner;
            let owner = battle_id(parsed, owner_ref);
            let Some(skill_id) = parsed
                .skill_uses
                .iter()
                .find(|u| {
                    u.turn == turn.turn
                        && u.kind == SkillSlotKind::Active
                        && u.actor.as_ref().is_none_or(|a| same_character(a, owner_ref))
                })
                .map(|u| u.skill_id.as_str())
            else {
                tracing::debug!(turn = turn.turn, owner = %owner, "no active skill logged, skipping turn");
                report.skipped += 1;
                continue;
            };

            let hits: Vec<_> = parsed
                .damage_events
                .iter()
                .filter(|d| d.turn == turn.turn && same_character(&d.line.attacker, owner_ref))
                .map(|d| (battle_id(parsed, &d.line.target), d))
                .collect();

            let area = battle
                .character(&owner)
                .and_then(|c| c.skill(skill_id))
                .is_some_and(|slot| !slot.skill.pattern.is_single());

            let mut targets: Vec<String> = Vec::new();
            if !area {
                for (target, _) in &hits {
                    if !targets.contains(target) {
                        targets.push(target.clone());
                    }
                }
                if targets.is_empty() {
                    targets.extend(
                        parsed
                            .status_events
                            .iter()
                            .filter(|s| {
                                s.turn == turn.turn
                                    && s.source.as_ref().is_some_and(|src| same_character(src, owner_ref))
                            })
                            .map(|s| battle_id(parsed, &s.target))
                            .take(1),
                    );
                }
            }
            let target_ids: Vec<&str> = targets.iter().map(String::as_str).collect();

            let action = match battle.resolve(&owner, skill_id, &target_ids) {
                Ok(action) => action,
                Err(e) => {
                    tracing::warn!(turn = turn.turn, actor = %owner, skill = %skill_id, error = %e, "log replay stopped");
                    report.stopped = Some(ReplayStop {
                        turn: turn.turn,
                        actor: owner.clone(),
                        skill_id: skill_id.to_string(),
                        reason: e.to_string(),
                    });
                    break;
                }
            };

            for (target, hit) in &hits {
                let simulated = action.outcome_for(target).map(|o| o.damage);
                if simulated != Some(hit.line.total) {
                    tracing::warn!(
                        turn = turn.turn,
                        actor = %owner,
                        target = %target,
                        logged = hit.line.total,
                        simulated = ?simulated,
                        "damage diverges from log"
                    );
                    report.divergences.push(Divergence {
                        turn: turn.turn,
                        actor: owner.clone(),
                        skill_id: skill_id.to_string(),
                        target: target.clone(),
                        logged: hit.line.total,
                        simulated,
                    });
                }
            }

            report.applied += 1;
        }

        report.outcome = battle.outcome();
        report.transcript = battle.transcript().to_vec();
        report
    }
}

/// Same toon, and the same team when both references name one
fn same_character(a: &CharacterRef, b: &CharacterRef) -> bool {
    a.id == b.id && (a.side.is_none() || b.side.is_none() || a.side == b.side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_battle;
    use mayhem_battle::BattleRules;

    fn opening() -> ScriptedReplay {
        ScriptedReplay::new(vec![
            ScriptedAction::new("road_runner", "skill_meep_meep", &["bugs_bunny"]),
            ScriptedAction::new("lola_bunny", "skill_team_spirit", &[]),
            ScriptedAction::new("wile_e_coyote", "skill_anvil_drop", &["lola_bunny"]),
            ScriptedAction::new("bugs_bunny", "skill_explosive_surprise", &[]),
        ])
    }

    #[test]
    fn test_scripted_replay_is_deterministic() {
        let mut first = sample_battle(BattleRules::default()).unwrap();
        let mut second = sample_battle(BattleRules::default()).unwrap();

        let a = opening().run(&mut first).unwrap();
        let b = opening().run(&mut second).unwrap();

        assert_eq!(a.len(), 4);
        assert_eq!(a, b);
        assert_eq!(first.transcript(), second.transcript());
        assert_eq!(first.round(), 2);
    }

    #[test]
    fn test_scripted_replay_stops_at_rejection() {
        let mut battle = sample_battle(BattleRules::default()).unwrap();
        let script = ScriptedReplay::new(vec![
            ScriptedAction::new("road_runner", "skill_meep_meep", &["bugs_bunny"]),
            ScriptedAction::new("bugs_bunny", "skill_safe_landing", &["wile_e_coyote"]),
        ]);

        let err = script.run(&mut battle).unwrap_err();
        let ReplayError::Rejected { step, source, .. } = err;
        assert_eq!(step, 1);
        assert!(matches!(source, ResolveError::NotActorsTurn { .. }));
        assert_eq!(battle.transcript().len(), 1);
    }

    #[test]
    fn test_script_from_json() {
        let json = r#"{"steps": [{"actor": "road_runner", "skill_id": "skill_meep_meep", "targets": ["bugs_bunny"]}]}"#;
        let script: ScriptedReplay = serde_json::from_str(json).unwrap();
        assert_eq!(script.steps[0], ScriptedAction::new("road_runner", "skill_meep_meep", &["bugs_bunny"]));
    }

    #[test]
    fn test_log_replay_mirror_match() {
        let log = "\
[BattleStartFlowEvent]
<bugs_bunny> (L:30|Q:3|E:2)
Team: LEFT
Health: 111/111
Attack: 40/40
Defense: 30/30
Speed: 34/34
  * (Active) skill_befuddle
<bugs_bunny> (L:28|Q:3|E:2)
Team: RIGHT
Health: 100/100
Attack: 38/38
Defense: 28/28
Speed: 30/30
  * (Active) skill_befuddle
[StateChangePrankFlowEvent] (Setup) -> (TurnStart)
Left Team: bugs_bunny_l (111/111)
Right Team: bugs_bunny_r (100/100)
[TurnStartFlowEvent] Turn owner: bugs_bunny_l | Turn: 1
[CharacterSkillPrankFlowEvent] bugs_bunny_l (active) skill_befuddle
Damage: (bugs_bunny_l) -> (bugs_bunny_r (100/100)); Attack (Base) 40 (Current) 40; SkillPower 100%; Attack with Variance 40; Defense 28; Total Damage 1000
";
        let parsed = mayhem_protocol::parse_battle_log(log).unwrap();
        let mut battle = crate::BattleLoader::default().load(&parsed).unwrap();

        let report = LogReplay.run(&parsed, &mut battle);

        assert!(report.stopped.is_none());
        assert_eq!(report.applied, 1);
        assert_eq!(report.divergences.len(), 1);
        assert_eq!(report.divergences[0].actor, "bugs_bunny_l");
        assert_eq!(report.divergences[0].target, "bugs_bunny_r");
        assert!(report.divergences[0].simulated.is_some());
        assert_eq!(battle.character("bugs_bunny_l").unwrap().current_hp(), 111);
        assert!(battle.character("bugs_bunny_r").unwrap().current_hp() < 100);
    }
}
