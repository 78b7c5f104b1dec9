//! Built-in advisor used for the enemy team and as a manual fallback

use async_trait::async_trait;
use mayhem_battle::query::{weakest_ally, weakest_enemy};
use mayhem_battle::{Advisor, AdvisorError, BattleSnapshot, Suggestion, TargetPattern};

/// First usable skill on the lowest-HP valid target
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAdvisor;

impl HeuristicAdvisor {
    /// Same suggestion as [`Advisor::suggest`], without the async wrapper
    pub fn pick(&self, snapshot: &BattleSnapshot) -> Result<Suggestion, AdvisorError> {
        let actor = snapshot
            .pending()
            .ok_or_else(|| AdvisorError::Failed("no character is waiting to act".to_string()))?;

        let skill = actor
            .available_skills()
            .next()
            .ok_or_else(|| AdvisorError::Failed(format!("{} has no usable skill", actor.id)))?;

        let target = match skill.pattern {
            TargetPattern::SingleEnemy => Some(
                weakest_enemy(snapshot, &actor.id)
                    .ok_or_else(|| AdvisorError::Failed("no enemy left to target".to_string()))?,
            ),
            TargetPattern::SingleAlly => weakest_ally(snapshot, &actor.id),
            TargetPattern::SelfOnly | TargetPattern::AllEnemies | TargetPattern::AllAllies => None,
        };

        let (target_ids, rationale) = match target {
            Some(t) => (
                vec![t.id.clone()],
                format!("{} on {} ({:.0}% HP)", skill.name, t.name, t.hp_percent),
            ),
            None => (Vec::new(), format!("{} ({})", skill.name, skill.pattern)),
        };

        Ok(Suggestion::new(skill.id.clone(), target_ids, rationale))
    }
}

#[async_trait]
impl Advisor for HeuristicAdvisor {
    async fn suggest(&self, snapshot: &BattleSnapshot) -> Result<Suggestion, AdvisorError> {
        self.pick(snapshot)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mayhem_battle::{BaseStats, Battle, BattleRules, Character, Skill};

    fn fighter(id: &str, hp: u32, current: u32, speed: u32) -> Character {
        Character::new(id, id, hp, BaseStats::new(20, 0, speed))
            .with_current_hp(current)
            .with_skill(Skill::new(format!("{id}_strike"), "Strike", 100, TargetPattern::SingleEnemy))
    }

    #[test]
    fn test_targets_weakest_enemy() {
        let battle = Battle::new(
            vec![fighter("bugs", 100, 100, 50)],
            vec![fighter("wile", 100, 80, 10), fighter("road", 100, 30, 10)],
            BattleRules::default(),
        )
        .unwrap();

        let suggestion = HeuristicAdvisor.pick(&battle.snapshot()).unwrap();
        assert_eq!(suggestion.skill_id, "bugs_strike");
        assert_eq!(suggestion.target_ids, vec!["road"]);
        assert!(suggestion.rationale.contains("30%"));
    }

    #[test]
    fn test_skips_skills_on_cooldown() {
        let bugs = Character::new("bugs", "Bugs", 100, BaseStats::new(20, 0, 50))
            .with_skill(Skill::new("bugs_blast", "Blast", 80, TargetPattern::AllEnemies).with_cooldown(2))
            .with_skill(Skill::new("bugs_strike", "Strike", 100, TargetPattern::SingleEnemy));
        let mut battle = Battle::new(
            vec![bugs],
            vec![fighter("wile", 500, 500, 10)],
            BattleRules::default(),
        )
        .unwrap();

        let first = HeuristicAdvisor.pick(&battle.snapshot()).unwrap();
        assert_eq!(first.skill_id, "bugs_blast");

        battle.resolve("bugs", "bugs_blast", &[]).unwrap();
        battle.resolve("wile", "wile_strike", &["bugs"]).unwrap();
        let next = HeuristicAdvisor.pick(&battle.snapshot()).unwrap();
        assert_eq!(next.skill_id, "bugs_strike");
        assert_eq!(next.target_ids, vec!["wile"]);
    }

    #[test]
    fn test_area_skill_has_no_targets() {
        let bugs = Character::new("bugs", "Bugs", 100, BaseStats::new(20, 0, 50)).with_skill(Skill::new(
            "bugs_blast",
            "Blast",
            80,
            TargetPattern::AllEnemies,
        ));
        let battle = Battle::new(
            vec![bugs],
            vec![fighter("wile", 100, 100, 10)],
            BattleRules::default(),
        )
        .unwrap();

        let suggestion = HeuristicAdvisor.pick(&battle.snapshot()).unwrap();
        assert_eq!(suggestion.skill_id, "bugs_blast");
        assert!(suggestion.target_ids.is_empty());
    }

    #[tokio::test]
    async fn test_fails_once_battle_is_over() {
        let mut battle = Battle::new(
            vec![fighter("bugs", 100, 100, 50)],
            vec![fighter("wile", 10, 10, 10)],
            BattleRules::default(),
        )
        .unwrap();
        battle.resolve("bugs", "bugs_strike", &["wile"]).unwrap();

        let err = HeuristicAdvisor.suggest(&battle.snapshot()).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Failed(_)));
    }
}
