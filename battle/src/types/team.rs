//! Teams and per-team roster state

use super::character::Character;

/// One of the two sides in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Left,
    Right,
}

impl Team {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "player" | "team1" => Some(Team::Left),
            "right" | "enemy" | "team2" => Some(Team::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Left => "left",
            Team::Right => "right",
        }
    }

    pub fn opponent(&self) -> Team {
        match self {
            Team::Left => Team::Right,
            Team::Right => Team::Left,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Team::Left => 0,
            Team::Right => 1,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One team's characters in slot order
#[derive(Debug, Clone)]
pub struct TeamState {
    pub team: Team,
    pub characters: Vec<Character>,
}

impl TeamState {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            characters: Vec::new(),
        }
    }

    /// Count living characters
    pub fn alive_count(&self) -> usize {
        self.characters.iter().filter(|c| c.is_alive()).count()
    }

    /// Whether every character has been knocked out
    pub fn is_wiped(&self) -> bool {
        self.alive_count() == 0
    }

    /// Iterate over living characters in slot order
    pub fn living(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(|c| c.is_alive())
    }

    /// Find a character's slot by id
    pub fn find(&self, id: &str) -> Option<usize> {
        self.characters.iter().position(|c| c.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }
}
