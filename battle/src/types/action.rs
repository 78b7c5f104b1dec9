//! Resolved actions and battle events

use super::effect::EffectKind;

/// What a single action did to one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: String,
    pub damage: u32,
    pub healing: u32,
    pub effects: Vec<EffectKind>,
    pub knocked_out: bool,
    pub revived: bool,
}

/// A resolved action; never modified once recorded
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    /// Position in the transcript (1-based)
    pub sequence: u32,
    pub round: u32,
    pub actor: String,
    pub skill_id: String,
    pub targets: Vec<String>,
    pub outcomes: Vec<TargetOutcome>,
    /// Effects the skill placed on its user
    pub caster_effects: Vec<EffectKind>,
}

impl Action {
    pub fn total_damage(&self) -> u32 {
        self.outcomes.iter().map(|o| o.damage).sum()
    }

    pub fn total_healing(&self) -> u32 {
        self.outcomes.iter().map(|o| o.healing).sum()
    }

    /// Ids of targets knocked out by this action
    pub fn knocked_out(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.knocked_out)
            .map(|o| o.target.as_str())
    }

    pub fn outcome_for(&self, target: &str) -> Option<&TargetOutcome> {
        self.outcomes.iter().find(|o| o.target == target)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} used {}", self.sequence, self.actor, self.skill_id)?;
        for outcome in &self.outcomes {
            write!(f, "; {}", outcome.target)?;
            if outcome.damage > 0 {
                write!(f, " -{}", outcome.damage)?;
            }
            if outcome.healing > 0 {
                write!(f, " +{}", outcome.healing)?;
            }
            if outcome.knocked_out {
                write!(f, " KO")?;
            }
        }
        Ok(())
    }
}

/// Why a scheduled character did not act
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    Stunned,
    /// Silenced, cooling down, or otherwise without a usable skill
    NoUsableSkill,
}

/// Everything that happened in a battle, in order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    RoundStarted { round: u32, order: Vec<String> },
    Acted { sequence: u32 },
    TurnSkipped { character: String, reason: SkipReason },
    PeriodicDamage { character: String, amount: u32 },
    PeriodicHeal { character: String, amount: u32 },
    EffectExpired { character: String, kind: EffectKind },
    Revived { character: String },
    KnockedOut { character: String },
    Finished { winner: Option<super::team::Team> },
}

/// A decision for the pending actor, as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionChoice {
    pub actor: String,
    pub skill_id: String,
    pub targets: Vec<String>,
}

impl ActionChoice {
    pub fn new(actor: impl Into<String>, skill_id: impl Into<String>, targets: Vec<String>) -> Self {
        Self {
            actor: actor.into(),
            skill_id: skill_id.into(),
            targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        let action = Action {
            sequence: 3,
            round: 1,
            actor: "bugs_bunny".to_string(),
            skill_id: "skill_befuddle".to_string(),
            targets: vec!["road_runner".to_string()],
            outcomes: vec![TargetOutcome {
                target: "road_runner".to_string(),
                damage: 43,
                knocked_out: true,
                ..Default::default()
            }],
            caster_effects: Vec::new(),
        };
        assert_eq!(action.to_string(), "#3 bugs_bunny used skill_befuddle; road_runner -43 KO");
        assert_eq!(action.knocked_out().collect::<Vec<_>>(), vec!["road_runner"]);
    }
}
