//! Outbound port to an external move advisor
//!
//! Advisors only ever see a [`BattleSnapshot`]. They cannot reach the battle,
//! so asking one for advice never changes anything.

use async_trait::async_trait;

use crate::error::AdvisorError;
use crate::snapshot::BattleSnapshot;
use crate::types::ActionChoice;

/// A proposed action for the pending actor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    pub skill_id: String,
    pub target_ids: Vec<String>,
    /// Free-form explanation for the player
    pub rationale: String,
}

impl Suggestion {
    pub fn new(skill_id: impl Into<String>, target_ids: Vec<String>, rationale: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            target_ids,
            rationale: rationale.into(),
        }
    }

    /// Turn the suggestion into a choice for `actor`
    pub fn into_choice(self, actor: impl Into<String>) -> ActionChoice {
        ActionChoice::new(actor, self.skill_id, self.target_ids)
    }
}

/// Something that proposes actions from a snapshot
///
/// Callers bound every call with a timeout and fall back to a manual choice
/// on any error.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn suggest(&self, snapshot: &BattleSnapshot) -> Result<Suggestion, AdvisorError>;

    /// Name used in logs
    fn name(&self) -> &str {
        "advisor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_choice() {
        let suggestion = Suggestion::new("skill_strike", vec!["wile".to_string()], "lowest HP");
        let choice = suggestion.into_choice("bugs");
        assert_eq!(choice.actor, "bugs");
        assert_eq!(choice.skill_id, "skill_strike");
        assert_eq!(choice.targets, vec!["wile"]);
    }

    struct Fixed;

    #[async_trait]
    impl Advisor for Fixed {
        async fn suggest(&self, snapshot: &BattleSnapshot) -> Result<Suggestion, AdvisorError> {
            let actor = snapshot
                .pending_actor
                .clone()
                .ok_or_else(|| AdvisorError::Failed("battle over".to_string()))?;
            Ok(Suggestion::new(format!("{actor}_strike"), Vec::new(), "always strike"))
        }
    }

    #[tokio::test]
    async fn test_advisor_reads_snapshot_only() {
        use crate::engine::Battle;
        use crate::rules::BattleRules;
        use crate::types::{BaseStats, Character, Skill, TargetPattern};

        let fighter = |id: &str, speed| {
            Character::new(id, id, 100, BaseStats::new(10, 0, speed))
                .with_skill(Skill::new(format!("{id}_strike"), "Strike", 100, TargetPattern::SingleEnemy))
        };
        let battle = Battle::new(vec![fighter("bugs", 50)], vec![fighter("wile", 10)], BattleRules::default()).unwrap();

        let snapshot = battle.snapshot();
        let suggestion = Fixed.suggest(&snapshot).await.unwrap();
        assert_eq!(suggestion.skill_id, "bugs_strike");
        assert_eq!(Fixed.name(), "advisor");
        assert_eq!(battle.snapshot(), snapshot);
    }
}

