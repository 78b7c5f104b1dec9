//! Shared types for battle log lines

use serde::{Deserialize, Serialize};

/// Team side as written in the log (LEFT / RIGHT, `_l` / `_r` suffix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LEFT" | "Left" | "left" => Some(Side::Left),
            "RIGHT" | "Right" | "right" => Some(Side::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Side::Left => "_l",
            Side::Right => "_r",
        }
    }
}

/// Character reference such as "bugs_bunny_l"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterRef {
    /// Catalogue id with the team suffix removed
    pub id: String,
    /// Side taken from the suffix, if one was present
    pub side: Option<Side>,
}

impl CharacterRef {
    /// Parse a reference like "bugs_bunny_l" or "bugs_bunny"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_matches(|c| c == '(' || c == ')');
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }

        for side in [Side::Left, Side::Right] {
            if let Some(id) = s.strip_suffix(side.suffix()) {
                if !id.is_empty() {
                    return Some(CharacterRef {
                        id: id.to_string(),
                        side: Some(side),
                    });
                }
            }
        }

        Some(CharacterRef {
            id: s.to_string(),
            side: None,
        })
    }

    pub fn new(id: impl Into<String>, side: Side) -> Self {
        CharacterRef {
            id: id.into(),
            side: Some(side),
        }
    }
}

impl std::fmt::Display for CharacterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.side {
            Some(side) => write!(f, "{}{}", self.id, side.suffix()),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A "current/max" pair ("156/156")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpPair {
    pub current: u32,
    pub max: u32,
}

impl HpPair {
    pub fn parse(s: &str) -> Option<Self> {
        let (current, max) = s.trim().split_once('/')?;
        Some(HpPair {
            current: parse_number(current)?,
            max: parse_number(max)?,
        })
    }
}

/// One entry of a "Left Team:" / "Right Team:" health line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub character: CharacterRef,
    pub hp: HpPair,
}

impl HealthEntry {
    /// Parse "bugs_bunny_l (156/156)"
    pub fn parse(s: &str) -> Option<Self> {
        let (name, rest) = s.trim().split_once('(')?;
        let hp = rest.trim().strip_suffix(')')?;

        Some(HealthEntry {
            character: CharacterRef::parse(name)?,
            hp: HpPair::parse(hp)?,
        })
    }

    /// Parse a pipe separated list of entries, skipping anything unreadable
    pub fn parse_list(s: &str) -> Vec<Self> {
        s.split('|').filter_map(HealthEntry::parse).collect()
    }
}

/// Parse an integer that the log sometimes writes with a fractional part ("40.0")
pub(crate) fn parse_number(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let f: f64 = s.parse().ok()?;
    (f >= 0.0).then(|| f.round() as u32)
}
