//! Skill definitions

use super::effect::{EffectKind, EffectTemplate};

/// Which characters a skill may be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPattern {
    SelfOnly,
    SingleEnemy,
    SingleAlly,
    AllEnemies,
    AllAllies,
}

impl TargetPattern {
    /// Parse from "self", "single-enemy", "single_ally", "aoe", ...
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "self" => Some(TargetPattern::SelfOnly),
            "single-enemy" | "single-target" | "enemy" => Some(TargetPattern::SingleEnemy),
            "single-ally" | "ally" => Some(TargetPattern::SingleAlly),
            "all-enemies" | "aoe" => Some(TargetPattern::AllEnemies),
            "all-allies" => Some(TargetPattern::AllAllies),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPattern::SelfOnly => "self",
            TargetPattern::SingleEnemy => "single-enemy",
            TargetPattern::SingleAlly => "single-ally",
            TargetPattern::AllEnemies => "all-enemies",
            TargetPattern::AllAllies => "all-allies",
        }
    }

    /// Whether the skill is aimed at the opposing team
    pub fn is_offensive(&self) -> bool {
        matches!(self, TargetPattern::SingleEnemy | TargetPattern::AllEnemies)
    }

    /// Whether the caller must name exactly one target
    pub fn is_single(&self) -> bool {
        matches!(self, TargetPattern::SingleEnemy | TargetPattern::SingleAlly)
    }
}

impl std::fmt::Display for TargetPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static skill definition
///
/// Offensive skills deal `power`% of the user's attack to each target.
/// Supportive skills with non-zero power heal `power`% of each target's max HP.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Percentage multiplier (145 = 145%)
    pub power: u32,
    pub pattern: TargetPattern,
    /// Owner turns before the skill can be used again (0 = none)
    pub cooldown: u32,
    pub effects: Vec<EffectTemplate>,
    /// Passive skills are listed but can never be chosen
    pub passive: bool,
    pub description: String,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, power: u32, pattern: TargetPattern) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            power,
            pattern,
            cooldown: 0,
            effects: Vec::new(),
            passive: false,
            description: String::new(),
        }
    }

    /// A 100% single-enemy attack
    pub fn basic_attack(owner_id: &str) -> Self {
        Self::new(
            format!("{owner_id}_basic"),
            "Basic Attack",
            100,
            TargetPattern::SingleEnemy,
        )
        .with_description("Deal 100% damage to target enemy.")
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    pub fn is_offensive(&self) -> bool {
        self.pattern.is_offensive()
    }

    pub fn deals_damage(&self) -> bool {
        self.is_offensive() && self.power > 0
    }

    pub fn heals(&self) -> bool {
        !self.is_offensive() && self.power > 0
    }

    pub fn applies(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }
}
