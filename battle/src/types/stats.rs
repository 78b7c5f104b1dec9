//! Base stats and percentage modifiers

/// Stats that effects can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    Attack,
    Defense,
    Speed,
}

impl Stat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::Speed => "Speed",
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unmodified combat stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl BaseStats {
    pub fn new(attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            attack,
            defense,
            speed,
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::Speed => self.speed,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Attack => self.attack = value,
            Stat::Defense => self.defense = value,
            Stat::Speed => self.speed = value,
        }
    }
}

/// Net percentage modifiers per stat (-90% to +300%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatModifiers {
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl StatModifiers {
    pub const MIN: i32 = -90;
    pub const MAX: i32 = 300;

    pub fn new() -> Self {
        Self::default()
    }

    /// Get the clamped modifier for a stat
    pub fn get(&self, stat: Stat) -> i32 {
        let raw = match stat {
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::Speed => self.speed,
        };
        raw.clamp(Self::MIN, Self::MAX)
    }

    /// Add a percentage to a stat
    pub fn add(&mut self, stat: Stat, percent: i32) {
        match stat {
            Stat::Attack => self.attack = self.attack.saturating_add(percent),
            Stat::Defense => self.defense = self.defense.saturating_add(percent),
            Stat::Speed => self.speed = self.speed.saturating_add(percent),
        }
    }

    /// Apply the modifier for `stat` to a base value, rounding to nearest
    pub fn apply(&self, stat: Stat, base: u32) -> u32 {
        let factor = f64::from(100 + self.get(stat)) / 100.0;
        (f64::from(base) * factor).round() as u32
    }

    pub fn is_neutral(&self) -> bool {
        self.attack == 0 && self.defense == 0 && self.speed == 0
    }
}
