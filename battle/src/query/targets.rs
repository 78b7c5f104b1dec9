//! Targeting helpers over snapshots

use crate::advisor::Suggestion;
use crate::error::AdvisorError;
use crate::snapshot::{BattleSnapshot, CharacterSnapshot};
use crate::types::TargetPattern;

/// Living enemies of `actor_id` that are taunting
pub fn taunting_enemies<'a>(snapshot: &'a BattleSnapshot, actor_id: &str) -> Vec<&'a CharacterSnapshot> {
    snapshot
        .enemies_of(actor_id)
        .into_iter()
        .filter(|c| c.is_taunting())
        .collect()
}

/// Ids a skill may be aimed at
///
/// For single patterns each id is a valid choice on its own. For area and
/// self patterns the list is the full set the skill will hit.
pub fn valid_targets(snapshot: &BattleSnapshot, actor_id: &str, skill_id: &str) -> Vec<String> {
    let Some(actor) = snapshot.character(actor_id) else {
        return Vec::new();
    };
    let Some(skill) = actor.skill(skill_id) else {
        return Vec::new();
    };

    let ids = |chars: Vec<&CharacterSnapshot>| -> Vec<String> {
        chars.into_iter().map(|c| c.id.clone()).collect()
    };

    match skill.pattern {
        TargetPattern::SelfOnly => vec![actor.id.clone()],
        TargetPattern::SingleEnemy => {
            let taunting = taunting_enemies(snapshot, actor_id);
            if taunting.is_empty() {
                ids(snapshot.enemies_of(actor_id))
            } else {
                ids(taunting)
            }
        }
        TargetPattern::SingleAlly | TargetPattern::AllAllies => {
            snapshot
                .team(actor.team)
                .filter(|c| c.is_alive)
                .map(|c| c.id.clone())
                .collect()
        }
        TargetPattern::AllEnemies => ids(snapshot.enemies_of(actor_id)),
    }
}

/// Enemy with the lowest HP percentage that `actor_id` may single-target
///
/// Ties go to the earlier slot.
pub fn weakest_enemy<'a>(snapshot: &'a BattleSnapshot, actor_id: &str) -> Option<&'a CharacterSnapshot> {
    let taunting = taunting_enemies(snapshot, actor_id);
    let candidates = if taunting.is_empty() {
        snapshot.enemies_of(actor_id)
    } else {
        taunting
    };

    candidates
        .into_iter()
        .min_by(|a, b| a.hp_percent.total_cmp(&b.hp_percent).then(a.slot.cmp(&b.slot)))
}

/// Ally (the actor included) with the lowest HP percentage
pub fn weakest_ally<'a>(snapshot: &'a BattleSnapshot, actor_id: &str) -> Option<&'a CharacterSnapshot> {
    let actor = snapshot.character(actor_id)?;
    snapshot
        .team(actor.team)
        .filter(|c| c.is_alive)
        .min_by(|a, b| a.hp_percent.total_cmp(&b.hp_percent).then(a.slot.cmp(&b.slot)))
}

/// Reject suggestions the pending actor could not legally play
///
/// Mirrors the battle's own checks closely enough to catch stale or
/// invented suggestions before they reach `resolve`.
pub fn check_suggestion(snapshot: &BattleSnapshot, suggestion: &Suggestion) -> Result<(), AdvisorError> {
    let actor = snapshot
        .pending()
        .ok_or_else(|| AdvisorError::Rejected("no character is waiting to act".to_string()))?;

    let skill = actor
        .skill(&suggestion.skill_id)
        .filter(|s| s.available)
        .ok_or_else(|| {
            AdvisorError::Rejected(format!("{} cannot use {} now", actor.id, suggestion.skill_id))
        })?;

    let valid = valid_targets(snapshot, &actor.id, &skill.id);
    let targets = &suggestion.target_ids;

    let ok = match skill.pattern {
        TargetPattern::SingleEnemy | TargetPattern::SingleAlly => {
            targets.len() == 1 && valid.contains(&targets[0])
        }
        TargetPattern::SelfOnly | TargetPattern::AllEnemies | TargetPattern::AllAllies => {
            targets.is_empty() || (targets.len() == valid.len() && targets.iter().all(|t| valid.contains(t)))
        }
    };

    if ok {
        Ok(())
    } else {
        Err(AdvisorError::Rejected(format!(
            "invalid targets {:?} for {}",
            targets, skill.id
        )))
    }
}
