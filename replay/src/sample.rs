//! Synthetic 2v2 battle for demos and tests

use mayhem_battle::{
    BaseStats, Battle, BattleRules, Character, EffectKind, EffectTemplate, Skill, TargetPattern,
};

use crate::LoadError;

/// Bugs Bunny and Lola Bunny against Wile E. Coyote and Road Runner
pub fn sample_battle(rules: BattleRules) -> Result<Battle, LoadError> {
    Ok(Battle::new(sample_left(), sample_right(), rules)?)
}

pub fn sample_left() -> Vec<Character> {
    let bugs = Character::new("bugs_bunny", "Bugs Bunny", 156, BaseStats::new(57, 51, 34))
        .with_level(30)
        .with_archetype("Attacker")
        .with_skill(
            Skill::new("skill_safe_landing", "Safe Landing", 100, TargetPattern::SingleEnemy)
                .with_description("Deal 100% damage to target enemy, gaining Attack Up for 2 turns.")
                .with_effect(EffectTemplate::new(EffectKind::AttackUp, 2).on_caster()),
        )
        .with_skill(
            Skill::new("skill_befuddle", "Befuddle", 130, TargetPattern::SingleEnemy)
                .with_cooldown(2)
                .with_description("Deal 130% damage to target enemy, inflicting 3 Defense Down and Silence.")
                .with_effect(EffectTemplate::new(EffectKind::DefenseDown, 3))
                .with_effect(EffectTemplate::new(EffectKind::Silence, 1)),
        )
        .with_skill(
            Skill::new("skill_explosive_surprise", "Explosive Surprise", 90, TargetPattern::AllEnemies)
                .with_cooldown(3)
                .with_description("Deal 90% damage to all enemies, inflicting 3 Defense Down to each.")
                .with_effect(EffectTemplate::new(EffectKind::DefenseDown, 3)),
        );

    let lola = Character::new("lola_bunny", "Lola Bunny", 120, BaseStats::new(62, 38, 42))
        .with_level(28)
        .with_archetype("Attacker")
        .with_skill(
            Skill::new("skill_basketball_toss", "Basketball Toss", 110, TargetPattern::SingleEnemy)
                .with_description("Deal 110% damage to target enemy."),
        )
        .with_skill(
            Skill::new("skill_team_spirit", "Team Spirit", 20, TargetPattern::AllAllies)
                .with_cooldown(2)
                .with_description("Heal all allies for 20% and grant Attack Up and Speed Up for 2 turns.")
                .with_effect(EffectTemplate::new(EffectKind::AttackUp, 2))
                .with_effect(EffectTemplate::new(EffectKind::SpeedUp, 2)),
        );

    vec![bugs, lola]
}

pub fn sample_right() -> Vec<Character> {
    let wile = Character::new("wile_e_coyote", "Wile E. Coyote", 140, BaseStats::new(70, 45, 38))
        .with_level(32)
        .with_archetype("Attacker")
        .with_skill(
            Skill::new("skill_anvil_drop", "Anvil Drop", 120, TargetPattern::SingleEnemy)
                .with_description("Deal 120% damage to target enemy."),
        );

    let road_runner = Character::new("road_runner", "Road Runner", 100, BaseStats::new(55, 35, 65))
        .with_level(30)
        .with_archetype("Support")
        .with_skill(
            Skill::new("skill_meep_meep", "Meep Meep", 80, TargetPattern::SingleEnemy)
                .with_description("Deal 80% damage and gain Speed Up.")
                .with_effect(EffectTemplate::new(EffectKind::SpeedUp, 2).on_caster()),
        );

    vec![wile, road_runner]
}
