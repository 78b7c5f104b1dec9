//! Read-only character and skill metadata

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::LoadError;

/// Catalogue entry for a character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub archetype: String,
    /// Skill ids in kit order
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Catalogue entry for a skill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// "Active 2", "Passive", ...
    #[serde(default)]
    pub skill_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogueFile {
    #[serde(default)]
    characters: Vec<CharacterInfo>,
    #[serde(default)]
    skills: Vec<SkillInfo>,
}

/// Character and skill lookup injected into the loader
///
/// Built once and shared behind an [`Arc`]; nothing mutates it after load.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    characters: BTreeMap<String, CharacterInfo>,
    skills: BTreeMap<String, SkillInfo>,
}

pub type SharedCatalogue = Arc<Catalogue>;

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{"characters": [...], "skills": [...]}`
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let file: CatalogueFile =
            serde_json::from_str(json).map_err(|e| LoadError::Catalogue(e.to_string()))?;

        let mut catalogue = Self::new();
        for character in file.characters {
            catalogue.insert_character(character);
        }
        for skill in file.skills {
            catalogue.insert_skill(skill);
        }

        tracing::debug!(
            characters = catalogue.characters.len(),
            skills = catalogue.skills.len(),
            "catalogue loaded"
        );
        Ok(catalogue)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LoadError::Catalogue(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn shared(self) -> SharedCatalogue {
        Arc::new(self)
    }

    pub fn insert_character(&mut self, info: CharacterInfo) {
        self.characters.insert(info.id.to_lowercase(), info);
    }

    pub fn insert_skill(&mut self, info: SkillInfo) {
        self.skills.insert(info.id.clone(), info);
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Find a character by id
    ///
    /// Tries the exact id (team suffix removed), then a variant whose id
    /// contains or is contained in it ("bugs_bunny" vs "bugs_bunny_pirate"),
    /// then the display name.
    pub fn character(&self, id: &str) -> Option<&CharacterInfo> {
        let normalized = strip_team_suffix(&id.trim().to_lowercase()).to_string();

        if let Some(info) = self.characters.get(&normalized) {
            return Some(info);
        }

        self.characters
            .iter()
            .find(|(key, _)| key.contains(&normalized) || normalized.contains(key.as_str()))
            .map(|(_, info)| info)
            .or_else(|| {
                self.characters.values().find(|info| {
                    let display = info.display_name.to_lowercase().replace(' ', "_");
                    !display.is_empty()
                        && (display.contains(&normalized) || normalized.contains(&display))
                })
            })
    }

    /// Find a skill by id, falling back to the id without a trailing level
    /// number ("skill_anvil_drop_3" -> "skill_anvil_drop")
    pub fn skill(&self, id: &str) -> Option<&SkillInfo> {
        if let Some(info) = self.skills.get(id) {
            return Some(info);
        }

        let base = strip_level_suffix(id);
        self.skills
            .iter()
            .find(|(key, _)| key.starts_with(base))
            .map(|(_, info)| info)
    }
}

fn strip_team_suffix(id: &str) -> &str {
    id.strip_suffix("_l")
        .or_else(|| id.strip_suffix("_r"))
        .unwrap_or(id)
}

fn strip_level_suffix(id: &str) -> &str {
    match id.rsplit_once('_') {
        Some((base, level)) if !level.is_empty() && level.chars().all(|c| c.is_ascii_digit()) => base,
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGUE: &str = r#"{
        "characters": [
            {"id": "bugs_bunny", "display_name": "Bugs Bunny", "rarity": "Epic", "archetype": "Attacker"},
            {"id": "wile_e_coyote_pirate", "display_name": "Pirate Wile E.", "rarity": "Rare"}
        ],
        "skills": [
            {"id": "skill_anvil_drop", "name": "Anvil Drop", "skill_type": "Active 2", "description": "Deal [120%] damage to target enemy."}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let catalogue = Catalogue::from_json(CATALOGUE).unwrap();
        assert_eq!(catalogue.character_count(), 2);
        assert_eq!(catalogue.skill_count(), 1);
        assert_eq!(catalogue.character("bugs_bunny").unwrap().rarity, "Epic");
    }

    #[test]
    fn test_character_lookup_strategies() {
        let catalogue = Catalogue::from_json(CATALOGUE).unwrap();
        assert_eq!(catalogue.character("bugs_bunny_l").unwrap().id, "bugs_bunny");
        assert_eq!(catalogue.character("wile_e_coyote").unwrap().id, "wile_e_coyote_pirate");
        assert_eq!(catalogue.character("pirate_wile_e.").unwrap().id, "wile_e_coyote_pirate");
        assert!(catalogue.character("daffy_duck").is_none());
    }

    #[test]
    fn test_skill_level_fallback() {
        let catalogue = Catalogue::from_json(CATALOGUE).unwrap();
        assert_eq!(catalogue.skill("skill_anvil_drop_3").unwrap().name, "Anvil Drop");
        assert!(catalogue.skill("skill_meep_meep").is_none());
    }

    #[test]
    fn test_invalid_json() {
        let err = Catalogue::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Catalogue(_)));
    }
}
