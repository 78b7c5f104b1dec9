//! Tunable combat constants

/// Numbers the resolver and scheduler consult
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRules {
    /// Mitigation is `defense / (defense + defense_scale)`
    pub defense_scale: f64,
    /// Lower bound on the post-mitigation damage multiplier
    pub min_damage_multiplier: f64,
    /// Duration given to effects that do not state one
    pub default_effect_duration: u32,
    /// Consecutive rounds without any action before the battle is a draw
    pub max_idle_rounds: u32,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            defense_scale: 100.0,
            min_damage_multiplier: 0.2,
            default_effect_duration: 2,
            max_idle_rounds: 10,
        }
    }
}

impl BattleRules {
    /// Damage multiplier left after the defender's mitigation
    pub fn damage_multiplier(&self, defense: u32) -> f64 {
        let defense = f64::from(defense);
        let mitigation = if defense <= 0.0 {
            0.0
        } else {
            defense / (defense + self.defense_scale.max(f64::EPSILON))
        };
        (1.0 - mitigation).max(self.min_damage_multiplier)
    }

    /// Damage for `power`% of `attack` against `defense`, rounded to nearest
    ///
    /// Never below 1 when `power` is non-zero.
    pub fn damage(&self, attack: u32, power: u32, defense: u32) -> u32 {
        if power == 0 {
            return 0;
        }
        let base = f64::from(attack) * f64::from(power) / 100.0;
        let damage = (base * self.damage_multiplier(defense)).round() as u32;
        damage.max(1)
    }

    /// Healing for `power`% of `max_hp`, at least 1 when `power` is non-zero
    pub fn healing(&self, max_hp: u32, power: u32) -> u32 {
        if power == 0 {
            return 0;
        }
        let amount = (f64::from(max_hp) * f64::from(power) / 100.0).round() as u32;
        amount.max(1)
    }
}
