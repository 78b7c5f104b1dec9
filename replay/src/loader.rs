//! Building a battle from a parsed log
//!
//! Skill kits come from the roster lines; power, targeting, effects and
//! cooldowns are read out of catalogue descriptions when the catalogue knows
//! the skill.

use std::collections::HashMap;

use mayhem_battle::{
    BaseStats, Battle, BattleRules, Character, EffectKind, EffectTemplate, Skill, TargetPattern,
};
use mayhem_protocol::{
    CharacterRef, ParsedBattle, RosterEntry, RosterSkill, Side, SkillSlotKind, StatChangeMode,
};

use crate::LoadError;
use crate::catalogue::{Catalogue, SharedCatalogue, SkillInfo};

/// Most skills a loaded character keeps
pub const MAX_SKILLS: usize = 5;

/// Description keywords and the effect each one grants
const EFFECT_KEYWORDS: [(&str, EffectKind); 11] = [
    ("stun", EffectKind::Stun),
    ("silence", EffectKind::Silence),
    ("attack up", EffectKind::AttackUp),
    ("attack down", EffectKind::AttackDown),
    ("defense up", EffectKind::DefenseUp),
    ("defense down", EffectKind::DefenseDown),
    ("speed up", EffectKind::SpeedUp),
    ("speed down", EffectKind::SpeedDown),
    ("taunt", EffectKind::Taunt),
    ("damage over time", EffectKind::DamageOverTime),
    ("heal over time", EffectKind::HealOverTime),
];

/// Turns a [`ParsedBattle`] into a ready-to-play [`Battle`]
#[derive(Debug, Clone)]
pub struct BattleLoader {
    catalogue: SharedCatalogue,
    rules: BattleRules,
}

impl Default for BattleLoader {
    fn default() -> Self {
        Self::new(Catalogue::new().shared())
    }
}

impl BattleLoader {
    pub fn new(catalogue: SharedCatalogue) -> Self {
        Self {
            catalogue,
            rules: BattleRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: BattleRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn load(&self, parsed: &ParsedBattle) -> Result<Battle, LoadError> {
        let left = self.team(parsed, Side::Left)?;
        let right = self.team(parsed, Side::Right)?;

        tracing::info!(
            seed = parsed.seed,
            left = left.len(),
            right = right.len(),
            "loaded battle from log"
        );

        Ok(Battle::new(left, right, self.rules.clone())?)
    }

    fn team(&self, parsed: &ParsedBattle, side: Side) -> Result<Vec<Character>, LoadError> {
        let roster = parsed.team(side);
        if roster.is_empty() {
            return Err(LoadError::MalformedInput(format!(
                "no characters on the {} team",
                side.as_str()
            )));
        }

        let overrides = stat_overrides(parsed, side);
        Ok(roster
            .iter()
            .map(|entry| {
                let id = battle_id(parsed, &CharacterRef::new(entry.id.clone(), side));
                self.character(id, entry, overrides.get(entry.id.as_str()))
            })
            .collect())
    }

    fn character(&self, id: String, entry: &RosterEntry, overrides: Option<&StatOverrides>) -> Character {
        let info = self.catalogue.character(&entry.id);

        let mut max_hp = entry.max_health.max(entry.health);
        let mut base = BaseStats::new(entry.attack, entry.defense, entry.speed);
        if let Some(o) = overrides {
            max_hp = o.max_hp.unwrap_or(max_hp);
            base.attack = o.attack.unwrap_or(base.attack);
            base.defense = o.defense.unwrap_or(base.defense);
            base.speed = o.speed.unwrap_or(base.speed);
        }

        let name = info
            .map(|i| i.display_name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| title_case(&entry.id));

        let archetype = entry
            .archetype
            .clone()
            .or_else(|| info.map(|i| i.archetype.clone()).filter(|a| !a.is_empty()))
            .map(|a| title_case(&a));

        let skills = self.skills(&id, &entry.skills);
        let mut character = Character::new(id, name, max_hp, base)
            .with_level(entry.level)
            .with_skills(skills);
        if let Some(archetype) = archetype {
            character = character.with_archetype(archetype);
        }
        character
    }

    /// Skill kit for a character, basic attack added when nothing is usable
    ///
    /// The kit is capped at [`MAX_SKILLS`]; an active skill listed past the
    /// cap takes the last kept slot so the character can still act.
    fn skills(&self, owner_id: &str, roster: &[RosterSkill]) -> Vec<Skill> {
        let mut skills: Vec<Skill> = Vec::new();
        for entry in roster {
            if skills.iter().any(|s| s.id == entry.id) {
                continue;
            }
            let skill = match self.catalogue.skill(&entry.id) {
                Some(info) => skill_from_info(&entry.id, info),
                None => unknown_skill(&entry.id),
            };
            let skill = if entry.kind == SkillSlotKind::Passive && !skill.passive {
                skill.passive()
            } else {
                skill
            };
            skills.push(skill);
        }

        match skills.iter().position(|s| !s.passive) {
            None => skills.insert(0, Skill::basic_attack(owner_id)),
            Some(first) if first >= MAX_SKILLS => {
                let active = skills.remove(first);
                skills[MAX_SKILLS - 1] = active;
            }
            Some(_) => {}
        }
        skills.truncate(MAX_SKILLS);
        skills
    }
}

/// Id a logged character is loaded under
///
/// Toons are keyed by their catalogue id. When the same toon fights on both
/// teams the side suffix is kept so the two stay distinct.
pub fn battle_id(parsed: &ParsedBattle, character: &CharacterRef) -> String {
    match character.side {
        Some(side) if is_mirrored(parsed, &character.id) => format!("{}{}", character.id, side.suffix()),
        _ => character.id.clone(),
    }
}

fn is_mirrored(parsed: &ParsedBattle, id: &str) -> bool {
    parsed.left_team.iter().any(|c| c.id == id) && parsed.right_team.iter().any(|c| c.id == id)
}

/// Values a roster entry is replaced with before the battle starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StatOverrides {
    max_hp: Option<u32>,
    attack: Option<u32>,
    defense: Option<u32>,
    speed: Option<u32>,
}

/// Max HP from the first TurnStart health lines and the last flat stat
/// change per stat during setup
fn stat_overrides(parsed: &ParsedBattle, side: Side) -> HashMap<&str, StatOverrides> {
    let mut overrides: HashMap<&str, StatOverrides> = HashMap::new();
    let on_side = |s: Option<Side>| s.is_none() || s == Some(side);

    for entry in &parsed.turn_start_health {
        if on_side(entry.character.side) {
            overrides.entry(entry.character.id.as_str()).or_default().max_hp = Some(entry.hp.max);
        }
    }

    for record in parsed.stat_changes.iter().filter(|r| r.turn == 0) {
        let change = &record.change;
        if change.mode != StatChangeMode::Flat || !on_side(change.target.side) {
            continue;
        }
        let Some(to) = change.to.filter(|v| *v >= 0.0) else {
            continue;
        };
        let value = Some(to as u32);

        let entry = overrides.entry(change.target.id.as_str()).or_default();
        match change.stat.to_lowercase().as_str() {
            "attack" => entry.attack = value,
            "defense" => entry.defense = value,
            "speed" => entry.speed = value,
            "maxhealth" | "health" => entry.max_hp = value,
            _ => {}
        }
    }

    overrides
}

/// Build a skill from catalogue metadata
pub fn skill_from_info(id: &str, info: &SkillInfo) -> Skill {
    let description = info.description.as_str();
    let pattern = target_pattern(description);
    let passive = info.skill_type.trim().eq_ignore_ascii_case("passive");

    let power = match skill_power(description) {
        Some(power) => power,
        None if pattern.is_offensive() || description.to_lowercase().contains("heal") => 100,
        None => 0,
    };

    let name = if info.name.is_empty() {
        skill_display_name(id)
    } else {
        info.name.clone()
    };

    let mut skill = Skill::new(id, name, power, pattern)
        .with_cooldown(active_cooldown(&info.skill_type))
        .with_description(truncate(description, 200));
    for template in skill_effects(description, pattern) {
        skill = skill.with_effect(template);
    }
    if passive {
        skill = skill.passive();
    }
    skill
}

/// Stand-in for a skill the catalogue does not know
pub fn unknown_skill(id: &str) -> Skill {
    Skill::new(id, skill_display_name(id), 100, TargetPattern::SingleEnemy)
        .with_description(format!("Skill: {id}"))
}

/// Target pattern from description wording
pub fn target_pattern(description: &str) -> TargetPattern {
    let desc = description.to_lowercase();

    if desc.contains("all enemies") || desc.contains("all team") {
        TargetPattern::AllEnemies
    } else if desc.contains("all allies") || (desc.contains("heal") && desc.contains("all")) {
        TargetPattern::AllAllies
    } else if desc.contains("heal") || desc.contains("grant") {
        if desc.contains("self") || desc.contains("this toon") {
            TargetPattern::SelfOnly
        } else {
            TargetPattern::SingleAlly
        }
    } else {
        TargetPattern::SingleEnemy
    }
}

/// First percentage in a description ("[145%]" or "145%")
pub fn skill_power(description: &str) -> Option<u32> {
    description.match_indices('%').find_map(|(idx, _)| {
        let before = &description[..idx];
        let digits_start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i)?;
        before[digits_start..].parse().ok()
    })
}

/// Effects named in a description
///
/// Buffs on an attacking skill go to the user; everything else lands on the
/// skill's targets.
pub fn skill_effects(description: &str, pattern: TargetPattern) -> Vec<EffectTemplate> {
    let desc = description.to_lowercase();
    let duration = effect_duration(&desc);

    let mut kinds: Vec<EffectKind> = Vec::new();
    for (keyword, kind) in EFFECT_KEYWORDS {
        if desc.contains(keyword) && !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    kinds
        .into_iter()
        .map(|kind| {
            let template = EffectTemplate::new(kind, duration);
            if pattern.is_offensive() && kind.is_buff() {
                template.on_caster()
            } else {
                template
            }
        })
        .collect()
}

/// Base cooldown from a skill type such as "Active 2" or "Active 3 / 1"
pub fn active_cooldown(skill_type: &str) -> u32 {
    let Some((_, rest)) = skill_type.split_once("Active") else {
        return 0;
    };
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// "for 2 turns" -> 2; 0 when no duration is given
fn effect_duration(desc: &str) -> u32 {
    desc.match_indices("for ")
        .find_map(|(idx, m)| {
            let rest = &desc[idx + m.len()..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() || !rest[digits.len()..].trim_start().starts_with("turn") {
                return None;
            }
            digits.parse().ok()
        })
        .unwrap_or(0)
}

/// "skill_anvil_drop" -> "Anvil Drop"
fn skill_display_name(id: &str) -> String {
    title_case(id.strip_prefix("skill_").unwrap_or(id))
}

/// "wile_e_coyote" -> "Wile E Coyote"
pub fn title_case(id: &str) -> String {
    id.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::CharacterInfo;
    use mayhem_battle::EffectRecipient;
    use mayhem_protocol::parse_battle_log;

    const LOG: &str = "\
Seed: 7
[BattleStartFlowEvent]
<bugs_bunny> (L:30|Q:3|E:2)
Team: LEFT
Health: 111/111
Attack: 40/40
Defense: 30/30
Speed: 34/34
  * tag_archetype_attacker: 1 - Age: 0
  * (Active) skill_befuddle
  * (Passive) skill_whats_up_doc
<wile_e_coyote> (L:32|Q:2|E:1)
Team: RIGHT
Health: 140/140
Attack: 70/70
Defense: 45/45
Speed: 38/38
  * (Passive) skill_genius
[StateChangePrankFlowEvent] (Onboarding) -> (Setup)
Change stat (flat): bugs_bunny_l - Stat: Attack - Amount: 57 (8 -> 57)
Change stat (flat): bugs_bunny_l - Stat: Defense - Amount: 51 (10 -> 51)
[StateChangePrankFlowEvent] (Setup) -> (TurnStart)
Left Team: bugs_bunny_l (156/156)
Right Team: wile_e_coyote_r (140/140)
[TurnStartFlowEvent] Turn owner: bugs_bunny_l | Turn: 1
";

    fn catalogue() -> SharedCatalogue {
        let mut catalogue = Catalogue::new();
        catalogue.insert_character(CharacterInfo {
            id: "bugs_bunny".to_string(),
            display_name: "Bugs Bunny".to_string(),
            rarity: "Epic".to_string(),
            archetype: "Attacker".to_string(),
            skills: vec![],
        });
        catalogue.insert_skill(SkillInfo {
            id: "skill_befuddle".to_string(),
            name: "Befuddle".to_string(),
            skill_type: "Active 2".to_string(),
            description: "Deal [130%] damage to target enemy, inflicting Defense Down and Silence for 3 turns."
                .to_string(),
        });
        catalogue.shared()
    }

    #[test]
    fn test_load_applies_setup_stats() {
        let parsed = parse_battle_log(LOG).unwrap();
        let battle = BattleLoader::new(catalogue()).load(&parsed).unwrap();

        let bugs = battle.character("bugs_bunny").unwrap();
        assert_eq!(bugs.name, "Bugs Bunny");
        assert_eq!(bugs.max_hp(), 156);
        assert_eq!(bugs.current_hp(), 156);
        assert_eq!(bugs.attack(), 57);
        assert_eq!(bugs.defense(), 51);
        assert_eq!(bugs.speed(), 34);
        assert_eq!(bugs.level, 30);
        assert_eq!(bugs.archetype.as_deref(), Some("Attacker"));

        let befuddle = &bugs.skill("skill_befuddle").unwrap().skill;
        assert_eq!(befuddle.power, 130);
        assert_eq!(befuddle.cooldown, 2);
        assert_eq!(befuddle.pattern, TargetPattern::SingleEnemy);
        assert!(befuddle.applies(EffectKind::DefenseDown));
        assert!(befuddle.applies(EffectKind::Silence));
        assert_eq!(befuddle.effects[0].duration, 3);

        let passive = &bugs.skill("skill_whats_up_doc").unwrap().skill;
        assert!(passive.passive);
    }

    #[test]
    fn test_all_passive_kit_gets_basic_attack() {
        let parsed = parse_battle_log(LOG).unwrap();
        let battle = BattleLoader::default().load(&parsed).unwrap();

        let wile = battle.character("wile_e_coyote").unwrap();
        assert_eq!(wile.name, "Wile E Coyote");
        assert_eq!(wile.skills()[0].skill.id, "wile_e_coyote_basic");
        assert!(wile.skills()[1].skill.passive);
    }

    #[test]
    fn test_active_skill_survives_kit_cap() {
        let log = "\
[BattleStartFlowEvent]
<bugs_bunny> (L:30|Q:3|E:2)
Team: LEFT
Health: 111/111
Attack: 40/40
Defense: 30/30
Speed: 34/34
  * (Passive) skill_p1
  * (Passive) skill_p2
  * (Passive) skill_p3
  * (Passive) skill_p4
  * (Passive) skill_p5
  * (Active) skill_strike
<wile_e_coyote> (L:32|Q:2|E:1)
Team: RIGHT
Health: 140/140
Attack: 70/70
Defense: 45/45
Speed: 38/38
  * (Active) skill_anvil_drop
";
        let parsed = parse_battle_log(log).unwrap();
        assert_eq!(parsed.left_team[0].skills.len(), 6);

        let battle = BattleLoader::default().load(&parsed).unwrap();
        let bugs = battle.character("bugs_bunny").unwrap();
        let ids: Vec<&str> = bugs.skills().iter().map(|s| s.skill.id.as_str()).collect();
        assert_eq!(ids, ["skill_p1", "skill_p2", "skill_p3", "skill_p4", "skill_strike"]);
        assert!(!bugs.skill("skill_strike").unwrap().skill.passive);
    }

    const MIRROR_LOG: &str = "\
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
[StateChangePrankFlowEvent] (Onboarding) -> (Setup)
Change stat (flat): bugs_bunny_r - Stat: Attack - Amount: 50 (8 -> 50)
[StateChangePrankFlowEvent] (Setup) -> (TurnStart)
Left Team: bugs_bunny_l (111/111)
Right Team: bugs_bunny_r (100/100)
";

    #[test]
    fn test_mirror_match_keeps_side_suffix() {
        let parsed = parse_battle_log(MIRROR_LOG).unwrap();
        let battle = BattleLoader::new(catalogue()).load(&parsed).unwrap();

        assert!(battle.character("bugs_bunny").is_none());

        let left = battle.character("bugs_bunny_l").unwrap();
        assert_eq!(left.name, "Bugs Bunny");
        assert_eq!(left.level, 30);
        assert_eq!(left.attack(), 40);

        let right = battle.character("bugs_bunny_r").unwrap();
        assert_eq!(right.level, 28);
        assert_eq!(right.attack(), 50);
        assert_eq!(right.max_hp(), 100);
        assert_eq!(right.skill("skill_befuddle").unwrap().skill.power, 130);
    }

    #[test]
    fn test_battle_id() {
        let mirror = parse_battle_log(MIRROR_LOG).unwrap();
        let plain = parse_battle_log(LOG).unwrap();
        let left = CharacterRef::parse("bugs_bunny_l").unwrap();

        assert_eq!(battle_id(&mirror, &left), "bugs_bunny_l");
        assert_eq!(battle_id(&plain, &left), "bugs_bunny");
        assert_eq!(battle_id(&mirror, &CharacterRef::parse("bugs_bunny").unwrap()), "bugs_bunny");
    }

    #[test]
    fn test_empty_team_is_malformed() {
        let mut parsed = parse_battle_log(LOG).unwrap();
        parsed.right_team.clear();
        let err = BattleLoader::default().load(&parsed).unwrap_err();
        assert!(matches!(err, LoadError::MalformedInput(_)));
    }

    #[test]
    fn test_target_pattern_keywords() {
        assert_eq!(target_pattern("Deal 90% damage to all enemies."), TargetPattern::AllEnemies);
        assert_eq!(target_pattern("Heal all allies for 20%."), TargetPattern::AllAllies);
        assert_eq!(target_pattern("Grant all allies Attack Up."), TargetPattern::AllAllies);
        assert_eq!(target_pattern("Heal this toon for 30%."), TargetPattern::SelfOnly);
        assert_eq!(target_pattern("Grant target ally Speed Up."), TargetPattern::SingleAlly);
        assert_eq!(target_pattern("Deal 120% damage."), TargetPattern::SingleEnemy);
    }

    #[test]
    fn test_skill_power() {
        assert_eq!(skill_power("Deal [145%] damage"), Some(145));
        assert_eq!(skill_power("Deal 80% damage and gain Speed Up"), Some(80));
        assert_eq!(skill_power("Crit chance up by %"), None);
        assert_eq!(skill_power(""), None);
    }

    #[test]
    fn test_skill_effects_recipients() {
        let effects = skill_effects(
            "Deal 100% damage to target enemy, gaining Attack Up for 2 turns.",
            TargetPattern::SingleEnemy,
        );
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, EffectKind::AttackUp);
        assert_eq!(effects[0].recipient, EffectRecipient::Caster);
        assert_eq!(effects[0].duration, 2);

        let effects = skill_effects("Inflict Stun and damage over time.", TargetPattern::SingleEnemy);
        assert_eq!(effects.len(), 2);
        assert!(effects.iter().all(|e| e.recipient == EffectRecipient::Target));
        assert_eq!(effects[0].duration, 0);
    }

    #[test]
    fn test_active_cooldown() {
        assert_eq!(active_cooldown("Active 2"), 2);
        assert_eq!(active_cooldown("Active 3 / 1"), 3);
        assert_eq!(active_cooldown("Active"), 0);
        assert_eq!(active_cooldown("Passive"), 0);
    }

    #[test]
    fn test_unknown_skill() {
        let skill = unknown_skill("skill_anvil_drop");
        assert_eq!(skill.name, "Anvil Drop");
        assert_eq!(skill.power, 100);
        assert_eq!(skill.pattern, TargetPattern::SingleEnemy);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("wile_e_coyote"), "Wile E Coyote");
        assert_eq!(title_case("attacker"), "Attacker");
    }
}
