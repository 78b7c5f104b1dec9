//! Per-combatant state

use super::effect::{ActiveEffects, Effect, EffectKind};
use super::skill::Skill;
use super::stats::{BaseStats, Stat};
use super::team::Team;

/// A skill owned by a character together with its remaining cooldown
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSlot {
    pub skill: Skill,
    /// Owner turns left before the skill is usable again
    pub cooldown: u32,
}

impl SkillSlot {
    pub fn new(skill: Skill) -> Self {
        Self { skill, cooldown: 0 }
    }

    /// Off cooldown and not passive
    pub fn is_ready(&self) -> bool {
        !self.skill.passive && self.cooldown == 0
    }
}

/// Outcome of applying damage to a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageTaken {
    /// HP actually removed
    pub dealt: u32,
    pub knocked_out: bool,
    /// A revive effect was consumed instead of a knock-out
    pub revived: bool,
}

/// End-of-turn bookkeeping for one character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnEnd {
    pub damage: DamageTaken,
    pub healed: u32,
    pub expired: Vec<EffectKind>,
}

/// A combatant and its mutable battle state
#[derive(Debug, Clone)]
pub struct Character {
    /// Unique id within the battle
    pub id: String,
    /// Display name
    pub name: String,
    pub team: Team,
    /// Position within the team, assigned when the battle is built
    pub slot: usize,
    pub archetype: Option<String>,
    pub level: u32,
    pub base: BaseStats,

    max_hp: u32,
    current_hp: u32,
    skills: Vec<SkillSlot>,
    effects: ActiveEffects,
}

impl Character {
    /// Create a character at full HP with no skills
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_hp: u32, base: BaseStats) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            team: Team::Left,
            slot: 0,
            archetype: None,
            level: 1,
            base,
            max_hp,
            current_hp: max_hp,
            skills: Vec::new(),
            effects: ActiveEffects::new(),
        }
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(SkillSlot::new(skill));
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = Skill>) -> Self {
        self.skills.extend(skills.into_iter().map(SkillSlot::new));
        self
    }

    /// Start below full HP (not clamped; battle construction validates it)
    pub fn with_current_hp(mut self, hp: u32) -> Self {
        self.current_hp = hp;
        self
    }

    pub fn with_archetype(mut self, archetype: impl Into<String>) -> Self {
        self.archetype = Some(archetype.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Attach an effect before the battle starts
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.apply(effect);
        self
    }

    // === HP ===

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// HP as a percentage (0.0-100.0)
    pub fn hp_percent(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.current_hp) * 100.0 / f64::from(self.max_hp)
    }

    // === Stats ===

    /// Stat value after active modifiers
    pub fn stat(&self, stat: Stat) -> u32 {
        self.effects.modifiers().apply(stat, self.base.get(stat))
    }

    pub fn attack(&self) -> u32 {
        self.stat(Stat::Attack)
    }

    pub fn defense(&self) -> u32 {
        self.stat(Stat::Defense)
    }

    pub fn speed(&self) -> u32 {
        self.stat(Stat::Speed)
    }

    // === Effects ===

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.has(kind)
    }

    pub fn is_stunned(&self) -> bool {
        self.effects.has(EffectKind::Stun)
    }

    pub fn is_silenced(&self) -> bool {
        self.effects.has(EffectKind::Silence)
    }

    pub fn is_taunting(&self) -> bool {
        self.is_alive() && self.effects.has(EffectKind::Taunt)
    }

    // === Skills ===

    pub fn skills(&self) -> &[SkillSlot] {
        &self.skills
    }

    pub fn skill(&self, id: &str) -> Option<&SkillSlot> {
        self.skills.iter().find(|s| s.skill.id == id)
    }

    /// Whether a slot could be used right now by this character
    pub fn can_use(&self, slot: &SkillSlot) -> bool {
        self.is_alive()
            && !self.is_stunned()
            && slot.is_ready()
            && !(self.is_silenced() && slot.skill.is_offensive())
    }

    /// Skills usable this turn, in owned order
    pub fn available_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills
            .iter()
            .filter(move |slot| self.can_use(slot))
            .map(|slot| &slot.skill)
    }

    /// Alive, not stunned and holding at least one usable skill
    pub fn can_act(&self) -> bool {
        self.available_skills().next().is_some()
    }

    // === Mutation (driven by the battle) ===

    pub(crate) fn take_damage(&mut self, amount: u32) -> DamageTaken {
        if !self.is_alive() || amount == 0 {
            return DamageTaken::default();
        }

        if amount < self.current_hp {
            self.current_hp -= amount;
            return DamageTaken {
                dealt: amount,
                ..DamageTaken::default()
            };
        }

        let dealt = self.current_hp;
        if let Some(revive) = self.effects.take(EffectKind::Revive) {
            let restored = (u64::from(self.max_hp) * u64::from(revive.magnitude) / 100) as u32;
            self.current_hp = restored.clamp(1, self.max_hp);
            return DamageTaken {
                dealt,
                knocked_out: false,
                revived: true,
            };
        }

        self.current_hp = 0;
        DamageTaken {
            dealt,
            knocked_out: true,
            revived: false,
        }
    }

    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp - before
    }

    pub(crate) fn add_effect(&mut self, effect: Effect) {
        self.effects.apply(effect);
    }

    pub(crate) fn start_cooldown(&mut self, skill_id: &str) {
        if let Some(slot) = self.skills.iter_mut().find(|s| s.skill.id == skill_id) {
            slot.cooldown = slot.skill.cooldown;
        }
    }

    /// Tick cooldowns and effects at the end of this character's turn
    pub(crate) fn end_turn(&mut self) -> TurnEnd {
        for slot in &mut self.skills {
            slot.cooldown = slot.cooldown.saturating_sub(1);
        }

        let tick = self.effects.tick();
        let mut report = TurnEnd {
            expired: tick.expired,
            ..TurnEnd::default()
        };

        if tick.heal_percent > 0 {
            report.healed = self.heal(self.percent_of_max(tick.heal_percent));
        }
        if tick.damage_percent > 0 {
            report.damage = self.take_damage(self.percent_of_max(tick.damage_percent));
        }

        report
    }

    /// `percent`% of max HP, at least 1
    fn percent_of_max(&self, percent: u32) -> u32 {
        let amount = (f64::from(self.max_hp) * f64::from(percent) / 100.0).round() as u32;
        amount.max(1)
    }

    pub(crate) fn place(&mut self, team: Team, slot: usize) {
        self.team = team;
        self.slot = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EffectTemplate, TargetPattern};

    fn bugs() -> Character {
        Character::new("bugs_bunny", "Bugs Bunny", 100, BaseStats::new(40, 30, 34))
            .with_skill(Skill::new("skill_strike", "Strike", 100, TargetPattern::SingleEnemy))
            .with_skill(
                Skill::new("skill_guard", "Guard", 0, TargetPattern::SelfOnly)
                    .with_cooldown(2)
                    .with_effect(EffectTemplate::new(EffectKind::DefenseUp, 2)),
            )
            .with_skill(Skill::new("skill_aura", "Aura", 0, TargetPattern::SelfOnly).passive())
    }

    fn effect(kind: EffectKind, duration: u32) -> Effect {
        Effect::from_template(&EffectTemplate::new(kind, duration), None)
    }

    #[test]
    fn test_new_character() {
        let c = bugs();
        assert!(c.is_alive());
        assert_eq!(c.current_hp(), 100);
        assert_eq!(c.hp_percent(), 100.0);
        assert_eq!(c.skills().len(), 3);
        assert!(c.can_act());
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut c = bugs();
        let hit = c.take_damage(30);
        assert_eq!(hit.dealt, 30);
        assert!(!hit.knocked_out);

        let hit = c.take_damage(500);
        assert_eq!(hit.dealt, 70);
        assert!(hit.knocked_out);
        assert_eq!(c.current_hp(), 0);
        assert!(!c.is_alive());

        assert_eq!(c.take_damage(10), DamageTaken::default());
    }

    #[test]
    fn test_revive_consumed_before_knockout() {
        let mut c = bugs().with_effect(effect(EffectKind::Revive, 3));
        let hit = c.take_damage(150);

        assert!(hit.revived);
        assert!(!hit.knocked_out);
        assert_eq!(c.current_hp(), 30);
        assert!(!c.has_effect(EffectKind::Revive));

        let hit = c.take_damage(150);
        assert!(hit.knocked_out);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut c = bugs().with_current_hp(90);
        assert_eq!(c.heal(25), 10);
        assert_eq!(c.current_hp(), 100);
    }

    #[test]
    fn test_dead_character_cannot_be_healed() {
        let mut c = bugs().with_current_hp(0);
        assert_eq!(c.heal(25), 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn test_cooldown_ticks_at_turn_end() {
        let mut c = bugs();
        c.start_cooldown("skill_guard");
        assert_eq!(c.skill("skill_guard").unwrap().cooldown, 2);
        assert!(!c.can_use(c.skill("skill_guard").unwrap()));

        c.end_turn();
        assert_eq!(c.skill("skill_guard").unwrap().cooldown, 1);
        c.end_turn();
        assert_eq!(c.skill("skill_guard").unwrap().cooldown, 0);
        c.end_turn();
        assert_eq!(c.skill("skill_guard").unwrap().cooldown, 0);
    }

    #[test]
    fn test_passive_never_available() {
        let c = bugs();
        let ids: Vec<_> = c.available_skills().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["skill_strike", "skill_guard"]);
    }

    #[test]
    fn test_stun_blocks_everything() {
        let c = bugs().with_effect(effect(EffectKind::Stun, 1));
        assert!(c.is_stunned());
        assert_eq!(c.available_skills().count(), 0);
        assert!(!c.can_act());
    }

    #[test]
    fn test_silence_blocks_offensive_only() {
        let c = bugs().with_effect(effect(EffectKind::Silence, 1));
        let ids: Vec<_> = c.available_skills().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["skill_guard"]);
        assert!(c.can_act());
    }

    #[test]
    fn test_effective_stats() {
        let c = bugs()
            .with_effect(effect(EffectKind::AttackUp, 2))
            .with_effect(effect(EffectKind::SpeedDown, 2));
        assert_eq!(c.attack(), 52);
        assert_eq!(c.defense(), 30);
        assert_eq!(c.speed(), 24);
    }

    #[test]
    fn test_damage_over_time_at_turn_end() {
        let mut c = bugs()
            .with_effect(effect(EffectKind::DamageOverTime, 1))
            .with_effect(effect(EffectKind::HealOverTime, 2));
        c.take_damage(50);

        let end = c.end_turn();
        assert_eq!(end.healed, 10);
        assert_eq!(end.damage.dealt, 10);
        assert_eq!(end.expired, vec![EffectKind::DamageOverTime]);
        assert_eq!(c.current_hp(), 50);
    }

    #[test]
    fn test_damage_over_time_can_knock_out() {
        let mut c = bugs()
            .with_current_hp(5)
            .with_effect(effect(EffectKind::DamageOverTime, 2));
        let end = c.end_turn();
        assert!(end.damage.knocked_out);
        assert!(!c.is_alive());
    }
}
