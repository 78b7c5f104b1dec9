//! Session configuration loaded from the environment

use std::env;
use std::time::Duration;

use mayhem_battle::{BattleRules, Team};

/// Settings for one interactive session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Upper bound on a single advisor call
    pub advisor_timeout: Duration,
    /// Team the controller plays; outcomes are reported from its side
    pub perspective: Team,
    /// Let the heuristic advisor play the other team
    pub auto_enemy: bool,
    /// Turn attempts before the session gives up
    pub max_turns: u32,
    pub rules: BattleRules,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advisor_timeout: Duration::from_millis(5000),
            perspective: Team::Left,
            auto_enemy: true,
            max_turns: 500,
            rules: BattleRules::default(),
        }
    }
}

impl SessionConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MAYHEM_ADVISOR_TIMEOUT_MS` - Advisor timeout (default: 5000)
    /// - `MAYHEM_PERSPECTIVE` - `left` or `right` (default: left)
    /// - `MAYHEM_AUTO_ENEMY` - Auto-play the other team (default: true)
    /// - `MAYHEM_MAX_TURNS` - Turn attempts before stopping (default: 500)
    /// - `MAYHEM_DEFENSE_SCALE` - Mitigation scale (default: 100)
    /// - `MAYHEM_MIN_DAMAGE_MULTIPLIER` - Damage floor after mitigation (default: 0.2)
    /// - `MAYHEM_MAX_IDLE_ROUNDS` - Idle rounds before a draw (default: 10)
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("MAYHEM_ADVISOR_TIMEOUT_MS") {
            config.advisor_timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(team) = env::var("MAYHEM_PERSPECTIVE").ok().and_then(|v| Team::parse(v.trim())) {
            config.perspective = team;
        }
        if let Some(auto) = read_env_bool("MAYHEM_AUTO_ENEMY") {
            config.auto_enemy = auto;
        }
        if let Some(turns) = read_env::<u32>("MAYHEM_MAX_TURNS") {
            config.max_turns = turns.max(1);
        }

        if let Some(scale) = read_env::<f64>("MAYHEM_DEFENSE_SCALE").filter(|v| *v > 0.0) {
            config.rules.defense_scale = scale;
        }
        if let Some(floor) = read_env::<f64>("MAYHEM_MIN_DAMAGE_MULTIPLIER") {
            config.rules.min_damage_multiplier = floor.clamp(0.0, 1.0);
        }
        if let Some(rounds) = read_env::<u32>("MAYHEM_MAX_IDLE_ROUNDS") {
            config.rules.max_idle_rounds = rounds.max(1);
        }

        config
    }

    pub fn with_perspective(mut self, team: Team) -> Self {
        self.perspective = team;
        self
    }

    pub fn with_advisor_timeout(mut self, timeout: Duration) -> Self {
        self.advisor_timeout = timeout;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_auto_enemy(mut self, auto_enemy: bool) -> Self {
        self.auto_enemy = auto_enemy;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
