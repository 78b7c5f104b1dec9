//! Action validation and resolution
//!
//! Validation runs to completion against an immutable battle before anything
//! is touched, so a rejected action never leaves partial state behind.

use std::collections::HashSet;

use crate::error::ResolveError;
use crate::types::{
    Action, ActionChoice, BattleEvent, Character, Effect, EffectRecipient, EffectTemplate, Skill,
    TargetOutcome, TargetPattern,
};

use super::battle::{Battle, Phase};

impl Battle {
    /// Apply `skill_id` from `actor_id` to `targets`
    ///
    /// This is the only way to change a battle after construction. On error
    /// the battle is left untouched. Area patterns accept an empty target
    /// list and fill in every living member of the affected team; self
    /// skills accept an empty list or the actor alone.
    pub fn resolve(
        &mut self,
        actor_id: &str,
        skill_id: &str,
        targets: &[&str],
    ) -> Result<Action, ResolveError> {
        let (skill, targets) = self.validate(actor_id, skill_id, targets)?;
        Ok(self.apply(actor_id, &skill, targets))
    }

    pub fn resolve_choice(&mut self, choice: &ActionChoice) -> Result<Action, ResolveError> {
        let targets: Vec<&str> = choice.targets.iter().map(String::as_str).collect();
        self.resolve(&choice.actor, &choice.skill_id, &targets)
    }

    /// Check an action without applying it
    ///
    /// Returns the target ids the action would hit, in slot order for area
    /// patterns.
    pub fn check(
        &self,
        actor_id: &str,
        skill_id: &str,
        targets: &[&str],
    ) -> Result<Vec<String>, ResolveError> {
        self.validate(actor_id, skill_id, targets)
            .map(|(_, targets)| targets)
    }

    fn validate(
        &self,
        actor_id: &str,
        skill_id: &str,
        targets: &[&str],
    ) -> Result<(Skill, Vec<String>), ResolveError> {
        if self.is_over() {
            return Err(ResolveError::BattleAlreadyOver(self.outcome()));
        }

        let actor = self
            .character(actor_id)
            .ok_or_else(|| ResolveError::UnknownCharacter(actor_id.to_string()))?;

        match self.scheduler.current() {
            Some(expected) if expected == actor_id => {}
            expected => {
                return Err(ResolveError::NotActorsTurn {
                    actor: actor_id.to_string(),
                    expected: expected.unwrap_or("nobody").to_string(),
                });
            }
        }

        if !actor.is_alive() {
            return Err(incapacitated(actor_id, "knocked out"));
        }
        if actor.is_stunned() {
            return Err(incapacitated(actor_id, "stunned"));
        }

        let slot = actor
            .skill(skill_id)
            .filter(|slot| !slot.skill.passive)
            .ok_or_else(|| ResolveError::UnknownSkill {
                actor: actor_id.to_string(),
                skill: skill_id.to_string(),
            })?;

        if slot.cooldown > 0 {
            return Err(ResolveError::SkillOnCooldown {
                skill: skill_id.to_string(),
                remaining: slot.cooldown,
            });
        }

        if actor.is_silenced() && slot.skill.is_offensive() {
            return Err(incapacitated(actor_id, "silenced"));
        }

        let targets = self.select_targets(actor, &slot.skill, targets)?;
        Ok((slot.skill.clone(), targets))
    }

    /// Resolve the caller's target list against the skill's pattern
    fn select_targets(
        &self,
        actor: &Character,
        skill: &Skill,
        targets: &[&str],
    ) -> Result<Vec<String>, ResolveError> {
        let invalid = |reason: String| ResolveError::InvalidTarget {
            skill: skill.id.clone(),
            reason,
        };

        let mut seen = HashSet::new();
        if let Some(dup) = targets.iter().find(|id| !seen.insert(**id)) {
            return Err(invalid(format!("{dup} listed twice")));
        }

        match skill.pattern {
            TargetPattern::SelfOnly => match targets {
                [] => Ok(vec![actor.id.clone()]),
                [only] if *only == actor.id => Ok(vec![actor.id.clone()]),
                _ => Err(invalid("self skills target only the user".to_string())),
            },

            TargetPattern::SingleEnemy | TargetPattern::SingleAlly => {
                let [target_id] = targets else {
                    return Err(invalid(format!("expected one target, got {}", targets.len())));
                };
                let target = self
                    .character(target_id)
                    .ok_or_else(|| invalid(format!("unknown character {target_id}")))?;
                if !target.is_alive() {
                    return Err(invalid(format!("{target_id} is knocked out")));
                }

                let wants_enemy = skill.pattern == TargetPattern::SingleEnemy;
                if (target.team != actor.team) != wants_enemy {
                    let side = if wants_enemy { "an enemy" } else { "an ally" };
                    return Err(invalid(format!("{target_id} is not {side}")));
                }

                if wants_enemy && !target.is_taunting() {
                    let taunting = self
                        .team(target.team)
                        .living()
                        .any(|c| c.is_taunting());
                    if taunting {
                        return Err(invalid(format!("{target_id} is not taunting")));
                    }
                }

                Ok(vec![target.id.clone()])
            }

            TargetPattern::AllEnemies | TargetPattern::AllAllies => {
                let team = if skill.pattern == TargetPattern::AllEnemies {
                    actor.team.opponent()
                } else {
                    actor.team
                };
                let living: Vec<String> = self.team(team).living().map(|c| c.id.clone()).collect();

                if targets.is_empty() {
                    return Ok(living);
                }
                if targets.len() != living.len() || !targets.iter().all(|id| living.iter().any(|l| l == id)) {
                    return Err(invalid(format!(
                        "area skills hit every living {} character",
                        team
                    )));
                }
                Ok(living)
            }
        }
    }

    fn apply(&mut self, actor_id: &str, skill: &Skill, targets: Vec<String>) -> Action {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::InProgress;
        }

        let rules = self.rules.clone();
        let attack = self.character(actor_id).map(|c| c.attack()).unwrap_or(0);

        let mut outcomes = Vec::with_capacity(targets.len());
        for target_id in &targets {
            let Some(target) = self.character_mut(target_id) else {
                continue;
            };
            let mut outcome = TargetOutcome {
                target: target_id.clone(),
                ..TargetOutcome::default()
            };

            if skill.deals_damage() {
                let amount = rules.damage(attack, skill.power, target.defense());
                let hit = target.take_damage(amount);
                outcome.damage = amount;
                outcome.knocked_out = hit.knocked_out;
                outcome.revived = hit.revived;
            } else if skill.heals() {
                outcome.healing = target.heal(rules.healing(target.max_hp(), skill.power));
            }

            // effects never land on a target knocked out by the same hit
            if target.is_alive() {
                let own_turn = target_id == actor_id;
                for template in skill
                    .effects
                    .iter()
                    .filter(|t| t.recipient == EffectRecipient::Target)
                {
                    target.add_effect(instantiate(template, actor_id, own_turn, rules.default_effect_duration));
                    outcome.effects.push(template.kind);
                }
            }

            outcomes.push(outcome);
        }

        let mut caster_effects = Vec::new();
        if let Some(actor) = self.character_mut(actor_id) {
            if actor.is_alive() {
                for template in skill
                    .effects
                    .iter()
                    .filter(|t| t.recipient == EffectRecipient::Caster)
                {
                    actor.add_effect(instantiate(template, actor_id, true, rules.default_effect_duration));
                    caster_effects.push(template.kind);
                }
            }
            actor.start_cooldown(&skill.id);
        }

        let action = Action {
            sequence: self.transcript.len() as u32 + 1,
            round: self.scheduler.round(),
            actor: actor_id.to_string(),
            skill_id: skill.id.clone(),
            targets,
            outcomes,
            caster_effects,
        };

        tracing::debug!(
            actor = %actor_id,
            skill = %skill.id,
            round = action.round,
            damage = action.total_damage(),
            healing = action.total_healing(),
            "action resolved"
        );

        self.events.push(BattleEvent::Acted {
            sequence: action.sequence,
        });
        for outcome in &action.outcomes {
            if outcome.revived {
                self.events.push(BattleEvent::Revived {
                    character: outcome.target.clone(),
                });
            }
            if outcome.knocked_out {
                self.events.push(BattleEvent::KnockedOut {
                    character: outcome.target.clone(),
                });
            }
        }
        self.transcript.push(action.clone());
        self.mark_acted();

        self.end_turn(actor_id);
        self.scheduler.advance();
        self.settle();

        action
    }
}

fn incapacitated(actor: &str, reason: &str) -> ResolveError {
    ResolveError::ActorIncapacitated {
        actor: actor.to_string(),
        reason: reason.to_string(),
    }
}

fn instantiate(template: &EffectTemplate, source: &str, own_turn: bool, default_duration: u32) -> Effect {
    let mut effect = Effect::from_template(template, Some(source.to_string()));
    if effect.remaining == 0 {
        effect.remaining = default_duration;
    }
    effect.fresh = own_turn;
    effect
}

#[cfg(test)]
mod tests {
    use crate::engine::{Battle, Outcome};
    use crate::error::{ResolveError, SetupError};
    use crate::rules::BattleRules;
    use crate::types::{
        BaseStats, BattleEvent, Character, Effect, EffectKind, EffectTemplate, SkipReason, Skill,
        TargetPattern, Team,
    };

    fn fighter(id: &str, hp: u32, attack: u32, defense: u32, speed: u32) -> Character {
        Character::new(id, id, hp, BaseStats::new(attack, defense, speed))
            .with_skill(Skill::new(format!("{id}_strike"), "Strike", 100, TargetPattern::SingleEnemy))
    }

    fn effect(kind: EffectKind, duration: u32) -> Effect {
        Effect::from_template(&EffectTemplate::new(kind, duration), None)
    }

    fn battle(left: Vec<Character>, right: Vec<Character>) -> Battle {
        Battle::new(left, right, BattleRules::default()).unwrap()
    }

    /// Pending actor strikes the first living enemy
    fn auto_step(battle: &mut Battle) {
        let actor = battle.pending_actor().unwrap();
        let actor_id = actor.id.clone();
        let skill_id = actor.available_skills().next().unwrap().id.clone();
        let target = battle.enemies_of(&actor_id)[0].id.clone();
        battle.resolve(&actor_id, &skill_id, &[target.as_str()]).unwrap();
    }

    #[test]
    fn test_reference_damage() {
        let a = fighter("a", 100, 40, 0, 50)
            .with_skill(Skill::new("a_big", "Big Hit", 145, TargetPattern::SingleEnemy));
        let b = fighter("b", 100, 10, 0, 30);
        let mut battle = battle(vec![a], vec![b]);

        assert_eq!(battle.outcome(), Outcome::NotStarted);
        assert_eq!(battle.pending_actor().unwrap().id, "a");

        let action = battle.resolve("a", "a_big", &["b"]).unwrap();
        assert_eq!(action.sequence, 1);
        assert_eq!(action.round, 1);
        assert_eq!(action.total_damage(), 58);
        assert_eq!(battle.character("b").unwrap().current_hp(), 42);
        assert_eq!(battle.outcome(), Outcome::InProgress);
        assert_eq!(battle.pending_actor().unwrap().id, "b");
    }

    #[test]
    fn test_speed_changes_apply_next_round() {
        let a = fighter("a", 500, 10, 0, 45).with_skill(
            Skill::new("a_haste", "Haste", 0, TargetPattern::SelfOnly)
                .with_effect(EffectTemplate::new(EffectKind::SpeedUp, 2).with_magnitude(100)),
        );
        let b = fighter("b", 500, 10, 0, 50);
        let c = fighter("c", 500, 10, 0, 40);
        let mut battle = battle(vec![a], vec![b, c]);

        assert_eq!(battle.turn_order(), ["b", "a", "c"]);
        battle.resolve("b", "b_strike", &["a"]).unwrap();
        battle.resolve("a", "a_haste", &[]).unwrap();

        assert_eq!(battle.character("a").unwrap().speed(), 90);
        assert_eq!(battle.turn_order(), ["b", "a", "c"]);
        assert_eq!(battle.upcoming(), ["c"]);

        battle.resolve("c", "c_strike", &["a"]).unwrap();
        assert_eq!(battle.round(), 2);
        assert_eq!(battle.turn_order(), ["a", "b", "c"]);
    }

    #[test]
    fn test_two_turn_cooldown_ready_in_round_three() {
        let a = fighter("a", 1000, 10, 0, 50).with_skill(
            Skill::new("a_blast", "Blast", 100, TargetPattern::SingleEnemy).with_cooldown(2),
        );
        let b = fighter("b", 1000, 10, 0, 30);
        let mut battle = battle(vec![a], vec![b]);

        battle.resolve("a", "a_blast", &["b"]).unwrap();
        battle.resolve("b", "b_strike", &["a"]).unwrap();

        assert_eq!(battle.round(), 2);
        let err = battle.resolve("a", "a_blast", &["b"]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::SkillOnCooldown {
                skill: "a_blast".to_string(),
                remaining: 1
            }
        );
        battle.resolve("a", "a_strike", &["b"]).unwrap();
        battle.resolve("b", "b_strike", &["a"]).unwrap();

        assert_eq!(battle.round(), 3);
        assert!(battle.resolve("a", "a_blast", &["b"]).is_ok());
    }

    #[test]
    fn test_aoe_wipe_is_win() {
        let a = fighter("a", 100, 100, 0, 50)
            .with_skill(Skill::new("a_quake", "Quake", 500, TargetPattern::AllEnemies));
        let b = fighter("b", 50, 10, 0, 30);
        let c = fighter("c", 50, 10, 0, 20);
        let mut battle = battle(vec![a], vec![b, c]);

        let action = battle.resolve("a", "a_quake", &[]).unwrap();
        assert_eq!(action.targets, vec!["b", "c"]);
        assert_eq!(action.knocked_out().collect::<Vec<_>>(), vec!["b", "c"]);

        assert_eq!(battle.outcome(), Outcome::Win);
        assert_eq!(battle.winner(), Some(Team::Left));
        assert!(battle.pending_actor().is_none());
        assert!(matches!(battle.events().last(), Some(BattleEvent::Finished { winner: Some(Team::Left) })));

        let right_view = battle.clone().with_perspective(Team::Right);
        assert_eq!(right_view.outcome(), Outcome::Loss);
    }

    #[test]
    fn test_resolve_after_terminal_changes_nothing() {
        let a = fighter("a", 100, 100, 0, 50);
        let b = fighter("b", 10, 10, 0, 30);
        let mut battle = battle(vec![a], vec![b]);
        battle.resolve("a", "a_strike", &["b"]).unwrap();
        assert!(battle.is_over());

        let events = battle.events().len();
        let err = battle.resolve("a", "a_strike", &["b"]).unwrap_err();
        assert_eq!(err, ResolveError::BattleAlreadyOver(Outcome::Win));
        assert_eq!(battle.transcript().len(), 1);
        assert_eq!(battle.events().len(), events);
    }

    #[test]
    fn test_simultaneous_wipe_is_draw() {
        let doom = Effect::from_template(
            &EffectTemplate::new(EffectKind::DamageOverTime, 3).with_magnitude(100),
            None,
        );
        let a = fighter("a", 10, 100, 0, 50).with_effect(doom);
        let b = fighter("b", 50, 10, 0, 30);
        let mut battle = battle(vec![a], vec![b]);

        battle.resolve("a", "a_strike", &["b"]).unwrap();
        assert_eq!(battle.outcome(), Outcome::Draw);
        assert_eq!(battle.winner(), None);
        assert!(!battle.character("a").unwrap().is_alive());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let build = || {
            battle(
                vec![fighter("a", 120, 30, 10, 40), fighter("b", 90, 25, 5, 60)],
                vec![fighter("c", 110, 28, 12, 40), fighter("d", 80, 35, 0, 55)],
            )
        };

        let mut first = build();
        let mut second = build();
        while !first.is_over() && first.transcript().len() < 200 {
            auto_step(&mut first);
        }
        while !second.is_over() && second.transcript().len() < 200 {
            auto_step(&mut second);
        }

        assert!(first.is_over());
        assert_eq!(first.transcript(), second.transcript());
        assert_eq!(first.events(), second.events());
        assert_eq!(first.outcome(), second.outcome());
    }

    #[test]
    fn test_knocked_out_leaves_order_and_targeting() {
        let a = fighter("a", 100, 100, 0, 50);
        let b = fighter("b", 100, 10, 0, 30);
        let c = fighter("c", 1, 10, 0, 20);
        let mut battle = battle(vec![a], vec![b, c]);

        let action = battle.resolve("a", "a_strike", &["c"]).unwrap();
        assert!(action.outcome_for("c").unwrap().knocked_out);
        assert_eq!(battle.upcoming(), ["b"]);

        battle.resolve("b", "b_strike", &["a"]).unwrap();
        assert_eq!(battle.turn_order(), ["a", "b"]);

        let err = battle.resolve("a", "a_strike", &["c"]).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTarget { .. }));
    }

    #[test]
    fn test_taunt_forces_target() {
        let a = fighter("a", 100, 10, 0, 50);
        let b = fighter("b", 100, 10, 0, 30).with_effect(effect(EffectKind::Taunt, 3));
        let c = fighter("c", 100, 10, 0, 20);
        let mut battle = battle(vec![a], vec![b, c]);

        let err = battle.resolve("a", "a_strike", &["c"]).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTarget { .. }));
        assert!(battle.resolve("a", "a_strike", &["b"]).is_ok());
    }

    #[test]
    fn test_silence_blocks_offensive_skill() {
        let a = fighter("a", 100, 10, 10, 50)
            .with_skill(
                Skill::new("a_guard", "Guard", 0, TargetPattern::SelfOnly)
                    .with_effect(EffectTemplate::new(EffectKind::DefenseUp, 2)),
            )
            .with_effect(effect(EffectKind::Silence, 2));
        let b = fighter("b", 100, 10, 0, 30);
        let mut battle = battle(vec![a], vec![b]);

        let err = battle.resolve("a", "a_strike", &["b"]).unwrap_err();
        assert!(matches!(err, ResolveError::ActorIncapacitated { .. }));
        assert!(battle.transcript().is_empty());
        assert_eq!(battle.outcome(), Outcome::NotStarted);

        let action = battle.resolve("a", "a_guard", &["a"]).unwrap();
        assert_eq!(action.outcome_for("a").unwrap().effects, vec![EffectKind::DefenseUp]);
        assert_eq!(battle.character("a").unwrap().defense(), 13);
    }

    #[test]
    fn test_stunned_actor_is_skipped() {
        let a = fighter("a", 100, 10, 0, 50).with_effect(effect(EffectKind::Stun, 1));
        let b = fighter("b", 100, 10, 0, 30);
        let mut battle = battle(vec![a], vec![b]);

        assert_eq!(battle.pending_actor().unwrap().id, "b");
        assert!(battle.events().contains(&BattleEvent::TurnSkipped {
            character: "a".to_string(),
            reason: SkipReason::Stunned,
        }));
        assert!(!battle.character("a").unwrap().is_stunned());

        let err = battle.resolve("a", "a_strike", &["b"]).unwrap_err();
        assert!(matches!(err, ResolveError::NotActorsTurn { .. }));

        battle.resolve("b", "b_strike", &["a"]).unwrap();
        assert_eq!(battle.round(), 2);
        assert_eq!(battle.pending_actor().unwrap().id, "a");
    }

    #[test]
    fn test_battle_can_finish_before_any_resolve() {
        let doom = Effect::from_template(
            &EffectTemplate::new(EffectKind::DamageOverTime, 3).with_magnitude(100),
            None,
        );
        let a = fighter("a", 10, 100, 0, 50)
            .with_effect(effect(EffectKind::Stun, 1))
            .with_effect(doom);
        let b = fighter("b", 50, 10, 0, 30);
        let battle = battle(vec![a], vec![b]);

        // a skips its opening turn and the damage over time knocks it out
        assert_eq!(battle.outcome(), Outcome::Loss);
        assert_eq!(battle.winner(), Some(Team::Right));
        assert!(battle.pending_actor().is_none());
        assert!(battle.transcript().is_empty());
    }

    #[test]
    fn test_stun_applied_with_default_duration() {
        let a = fighter("a", 100, 10, 0, 50).with_skill(
            Skill::new("a_daze", "Daze", 50, TargetPattern::SingleEnemy)
                .with_effect(EffectTemplate::new(EffectKind::Stun, 0)),
        );
        let b = fighter("b", 100, 10, 0, 30);
        let mut battle = battle(vec![a], vec![b]);

        battle.resolve("a", "a_daze", &["b"]).unwrap();
        // b loses its turn and the round rolls over to a
        assert_eq!(battle.round(), 2);
        assert_eq!(battle.pending_actor().unwrap().id, "a");
        let stun = battle
            .character("b")
            .unwrap()
            .effects()
            .iter()
            .find(|e| e.kind == EffectKind::Stun)
            .unwrap();
        assert_eq!(stun.remaining, 1);
        assert_eq!(stun.source.as_deref(), Some("a"));
    }

    #[test]
    fn test_idle_rounds_end_in_draw() {
        let rules = BattleRules {
            max_idle_rounds: 3,
            ..BattleRules::default()
        };
        let a = fighter("a", 100, 10, 0, 50).with_effect(effect(EffectKind::Silence, 100));
        let b = fighter("b", 100, 10, 0, 30).with_effect(effect(EffectKind::Silence, 100));
        let battle = Battle::new(vec![a], vec![b], rules).unwrap();

        assert_eq!(battle.outcome(), Outcome::Draw);
        assert_eq!(battle.round(), 3);
        let skipped = battle
            .events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::TurnSkipped { .. }))
            .count();
        assert_eq!(skipped, 6);
    }

    #[test]
    fn test_revive_prevents_knockout() {
        let a = fighter("a", 100, 100, 0, 50);
        let b = fighter("b", 100, 10, 0, 30).with_effect(
            Effect::from_template(&EffectTemplate::new(EffectKind::Revive, 5).with_magnitude(50), None),
        );
        let mut battle = battle(vec![a], vec![b]);

        let action = battle.resolve("a", "a_strike", &["b"]).unwrap();
        let outcome = action.outcome_for("b").unwrap();
        assert!(outcome.revived);
        assert!(!outcome.knocked_out);
        assert_eq!(battle.character("b").unwrap().current_hp(), 50);
        assert_eq!(battle.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_heal_ally() {
        let a = fighter("a", 100, 10, 0, 50)
            .with_skill(Skill::new("a_mend", "Mend", 20, TargetPattern::SingleAlly));
        let d = fighter("d", 100, 10, 0, 10).with_current_hp(50);
        let b = fighter("b", 100, 10, 0, 30);
        let mut battle = battle(vec![a, d], vec![b]);

        let err = battle.resolve("a", "a_mend", &["b"]).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTarget { .. }));

        let action = battle.resolve("a", "a_mend", &["d"]).unwrap();
        assert_eq!(action.total_healing(), 20);
        assert_eq!(battle.character("d").unwrap().current_hp(), 70);
    }

    #[test]
    fn test_target_validation() {
        let a = fighter("a", 100, 10, 0, 50)
            .with_skill(Skill::new("a_quake", "Quake", 50, TargetPattern::AllEnemies))
            .with_skill(Skill::new("a_focus", "Focus", 0, TargetPattern::SelfOnly))
            .with_skill(Skill::new("a_aura", "Aura", 0, TargetPattern::SelfOnly).passive());
        let b = fighter("b", 100, 10, 0, 30);
        let c = fighter("c", 100, 10, 0, 20);
        let battle = battle(vec![a], vec![b, c]);

        assert!(matches!(
            battle.check("a", "a_strike", &[]),
            Err(ResolveError::InvalidTarget { .. })
        ));
        assert!(matches!(
            battle.check("a", "a_strike", &["b", "c"]),
            Err(ResolveError::InvalidTarget { .. })
        ));
        assert!(matches!(
            battle.check("a", "a_strike", &["a"]),
            Err(ResolveError::InvalidTarget { .. })
        ));
        assert!(matches!(
            battle.check("a", "a_quake", &["b"]),
            Err(ResolveError::InvalidTarget { .. })
        ));
        assert_eq!(battle.check("a", "a_quake", &["c", "b"]).unwrap(), vec!["b", "c"]);
        assert!(matches!(
            battle.check("a", "a_focus", &["b"]),
            Err(ResolveError::InvalidTarget { .. })
        ));
        assert_eq!(battle.check("a", "a_focus", &[]).unwrap(), vec!["a"]);
        assert!(matches!(
            battle.check("a", "a_aura", &[]),
            Err(ResolveError::UnknownSkill { .. })
        ));
        assert!(matches!(
            battle.check("zz", "a_strike", &["b"]),
            Err(ResolveError::UnknownCharacter(_))
        ));
    }

    #[test]
    fn test_setup_validation() {
        let err = Battle::new(vec![], vec![fighter("b", 10, 1, 1, 1)], BattleRules::default()).unwrap_err();
        assert!(matches!(err, SetupError::MalformedInput(_)));

        let err = Battle::new(
            vec![fighter("a", 10, 1, 1, 1)],
            vec![fighter("a", 10, 1, 1, 1)],
            BattleRules::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SetupError::MalformedInput(_)));

        let mute = Character::new("m", "Mute", 10, BaseStats::new(1, 1, 1));
        let err = Battle::new(vec![mute], vec![fighter("b", 10, 1, 1, 1)], BattleRules::default()).unwrap_err();
        assert!(matches!(err, SetupError::MalformedInput(_)));

        let err = Battle::new(
            vec![fighter("a", 10, 1, 1, 1).with_current_hp(0)],
            vec![fighter("b", 10, 1, 1, 1)],
            BattleRules::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SetupError::MalformedInput(_)));
    }
}
