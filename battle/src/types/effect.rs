//! Timed effects (buffs, debuffs, control) and their stacking rules

use super::stats::{Stat, StatModifiers};

/// Kind of effect a skill can attach to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    DamageOverTime,
    HealOverTime,
    AttackUp,
    AttackDown,
    DefenseUp,
    DefenseDown,
    SpeedUp,
    SpeedDown,
    Stun,
    Silence,
    Taunt,
    Revive,
}

/// How a new effect combines with an existing one of the same kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingRule {
    /// The new effect replaces the old one
    Replace,
    /// One instance is kept; its duration becomes the longer of the two
    Refresh,
    /// Every application is tracked independently
    Stack,
}

impl EffectKind {
    pub const ALL: [EffectKind; 12] = [
        EffectKind::DamageOverTime,
        EffectKind::HealOverTime,
        EffectKind::AttackUp,
        EffectKind::AttackDown,
        EffectKind::DefenseUp,
        EffectKind::DefenseDown,
        EffectKind::SpeedUp,
        EffectKind::SpeedDown,
        EffectKind::Stun,
        EffectKind::Silence,
        EffectKind::Taunt,
        EffectKind::Revive,
    ];

    /// Parse a loose keyword ("attack_up", "Attack Up", "AttackUp", "dot")
    pub fn from_keyword(s: &str) -> Option<Self> {
        let normalized = s.to_lowercase().replace([' ', '_', '-'], "");

        match normalized.as_str() {
            "dot" | "damageovertime" | "poison" | "burn" | "bleed" => Some(EffectKind::DamageOverTime),
            "hot" | "healovertime" | "regen" | "regeneration" => Some(EffectKind::HealOverTime),
            "attackup" => Some(EffectKind::AttackUp),
            "attackdown" => Some(EffectKind::AttackDown),
            "defenseup" => Some(EffectKind::DefenseUp),
            "defensedown" => Some(EffectKind::DefenseDown),
            "speedup" => Some(EffectKind::SpeedUp),
            "speeddown" => Some(EffectKind::SpeedDown),
            "stun" | "stunned" => Some(EffectKind::Stun),
            "silence" | "silenced" => Some(EffectKind::Silence),
            "taunt" => Some(EffectKind::Taunt),
            "revive" => Some(EffectKind::Revive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::DamageOverTime => "DamageOverTime",
            EffectKind::HealOverTime => "HealOverTime",
            EffectKind::AttackUp => "AttackUp",
            EffectKind::AttackDown => "AttackDown",
            EffectKind::DefenseUp => "DefenseUp",
            EffectKind::DefenseDown => "DefenseDown",
            EffectKind::SpeedUp => "SpeedUp",
            EffectKind::SpeedDown => "SpeedDown",
            EffectKind::Stun => "Stun",
            EffectKind::Silence => "Silence",
            EffectKind::Taunt => "Taunt",
            EffectKind::Revive => "Revive",
        }
    }

    pub fn stacking(&self) -> StackingRule {
        match self {
            EffectKind::DamageOverTime | EffectKind::HealOverTime => StackingRule::Stack,
            EffectKind::Stun | EffectKind::Silence | EffectKind::Taunt => StackingRule::Refresh,
            _ => StackingRule::Replace,
        }
    }

    /// Whether the effect helps its holder
    pub fn is_buff(&self) -> bool {
        matches!(
            self,
            EffectKind::HealOverTime
                | EffectKind::AttackUp
                | EffectKind::DefenseUp
                | EffectKind::SpeedUp
                | EffectKind::Taunt
                | EffectKind::Revive
        )
    }

    pub fn is_control(&self) -> bool {
        matches!(self, EffectKind::Stun | EffectKind::Silence | EffectKind::Taunt)
    }

    /// Signed stat modifier direction for stat effects
    pub fn stat_modifier(&self) -> Option<(Stat, i32)> {
        match self {
            EffectKind::AttackUp => Some((Stat::Attack, 1)),
            EffectKind::AttackDown => Some((Stat::Attack, -1)),
            EffectKind::DefenseUp => Some((Stat::Defense, 1)),
            EffectKind::DefenseDown => Some((Stat::Defense, -1)),
            EffectKind::SpeedUp => Some((Stat::Speed, 1)),
            EffectKind::SpeedDown => Some((Stat::Speed, -1)),
            _ => None,
        }
    }

    /// Magnitude used when a skill does not state one (percent)
    pub fn default_magnitude(&self) -> u32 {
        match self {
            EffectKind::DamageOverTime | EffectKind::HealOverTime => 10,
            EffectKind::Revive => 30,
            EffectKind::Stun | EffectKind::Silence | EffectKind::Taunt => 0,
            _ => 30,
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a skill's effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectRecipient {
    /// Each affected target of the skill
    #[default]
    Target,
    /// The character using the skill
    Caster,
}

/// An effect as declared by a skill, before it is applied
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub kind: EffectKind,
    /// Percentage; meaning depends on the kind
    pub magnitude: u32,
    /// Duration in the holder's own turns
    pub duration: u32,
    pub recipient: EffectRecipient,
}

impl EffectTemplate {
    pub fn new(kind: EffectKind, duration: u32) -> Self {
        Self {
            kind,
            magnitude: kind.default_magnitude(),
            duration,
            recipient: EffectRecipient::Target,
        }
    }

    pub fn with_magnitude(mut self, magnitude: u32) -> Self {
        self.magnitude = magnitude;
        self
    }

    pub fn on_caster(mut self) -> Self {
        self.recipient = EffectRecipient::Caster;
        self
    }
}

/// An effect attached to a character
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    pub magnitude: u32,
    /// Turns left; the effect is removed when this reaches 0
    pub remaining: u32,
    /// Character that applied the effect
    pub source: Option<String>,
    /// Applied during the holder's own turn; skips that turn's tick
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) fresh: bool,
}

impl Effect {
    pub fn from_template(template: &EffectTemplate, source: Option<String>) -> Self {
        Self {
            kind: template.kind,
            magnitude: template.magnitude,
            remaining: template.duration,
            source,
            fresh: false,
        }
    }
}

/// Result of ticking a character's effects at the end of its turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectTick {
    /// Total percent of max HP lost to damage-over-time
    pub damage_percent: u32,
    /// Total percent of max HP restored by heal-over-time
    pub heal_percent: u32,
    pub expired: Vec<EffectKind>,
}

/// The set of effects attached to one character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    effects: Vec<Effect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an effect, honouring the stacking rule of its kind
    pub fn apply(&mut self, effect: Effect) {
        if effect.remaining == 0 {
            return;
        }

        match effect.kind.stacking() {
            StackingRule::Stack => self.effects.push(effect),
            StackingRule::Replace => {
                self.effects.retain(|e| e.kind != effect.kind);
                self.effects.push(effect);
            }
            StackingRule::Refresh => {
                if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
                    existing.remaining = existing.remaining.max(effect.remaining);
                    existing.magnitude = existing.magnitude.max(effect.magnitude);
                    existing.fresh |= effect.fresh;
                    existing.source = effect.source;
                } else {
                    self.effects.push(effect);
                }
            }
        }
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Remove and return the first effect of a kind
    pub fn take(&mut self, kind: EffectKind) -> Option<Effect> {
        let idx = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Net stat modifiers from all stat effects
    pub fn modifiers(&self) -> StatModifiers {
        let mut mods = StatModifiers::new();
        for effect in &self.effects {
            if let Some((stat, sign)) = effect.kind.stat_modifier() {
                let magnitude = i32::try_from(effect.magnitude).unwrap_or(i32::MAX);
                mods.add(stat, sign.saturating_mul(magnitude));
            }
        }
        mods
    }

    /// Apply periodic effects, decrement durations and drop expired effects
    pub fn tick(&mut self) -> EffectTick {
        let mut report = EffectTick::default();

        for effect in &mut self.effects {
            match effect.kind {
                EffectKind::DamageOverTime => report.damage_percent = report.damage_percent.saturating_add(effect.magnitude),
                EffectKind::HealOverTime => report.heal_percent = report.heal_percent.saturating_add(effect.magnitude),
                _ => {}
            }

            if effect.fresh {
                effect.fresh = false;
            } else {
                effect.remaining = effect.remaining.saturating_sub(1);
            }
        }

        self.effects.retain(|e| {
            if e.remaining == 0 {
                report.expired.push(e.kind);
                false
            } else {
                true
            }
        });

        report
    }
}
