//! Loading, replaying and measuring Mayhem battles.
//!
//! This crate connects the log format in `mayhem-protocol` to the simulator in
//! `mayhem-battle`:
//!
//! - [`Catalogue`] - Character and skill metadata, loaded once and shared
//! - [`BattleLoader`] - Builds a [`Battle`](mayhem_battle::Battle) from a [`ParsedBattle`]
//! - [`ScriptedReplay`] - Applies a fixed list of actions
//! - [`LogReplay`] - Replays a recorded log and reports damage divergences
//! - [`metrics::compute`] - Post-hoc statistics for a finished log
//!
//! # Example Usage
//!
//! ```ignore
//! use mayhem_replay::{BattleLoader, Catalogue, LogReplay};
//!
//! let parsed = mayhem_protocol::parse_battle_log(&log)?;
//! let loader = BattleLoader::new(Catalogue::load("catalogue.json")?.shared());
//! let mut battle = loader.load(&parsed)?;
//!
//! let report = LogReplay.run(&parsed, &mut battle);
//! println!("{} turns replayed, {} divergences", report.applied, report.divergences.len());
//! ```

use std::path::Path;

use anyhow::Context;
use mayhem_battle::{Battle, SetupError};
use mayhem_protocol::ParsedBattle;
use thiserror::Error;

pub mod catalogue;
pub mod loader;
pub mod metrics;
pub mod replay;
pub mod sample;

pub use catalogue::{Catalogue, CharacterInfo, SharedCatalogue, SkillInfo};
pub use loader::{BattleLoader, MAX_SKILLS, battle_id};
pub use metrics::{BattleMetrics, CharacterMetrics, TeamMetrics, compute};
pub use replay::{
    Divergence, LogReplay, ReplayError, ReplayReport, ReplayStop, ScriptedAction, ScriptedReplay,
};
pub use sample::sample_battle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Malformed battle input: {0}")]
    MalformedInput(String),

    #[error("Catalogue error: {0}")]
    Catalogue(String),
}

impl From<SetupError> for LoadError {
    fn from(err: SetupError) -> Self {
        match err {
            SetupError::MalformedInput(reason) => LoadError::MalformedInput(reason),
        }
    }
}

/// Read and parse a log file, then build its battle
pub fn load_log_file(
    path: impl AsRef<Path>,
    loader: &BattleLoader,
) -> anyhow::Result<(ParsedBattle, Battle)> {
    let path = path.as_ref();
    let log = std::fs::read_to_string(path)
        .with_context(|| format!("reading battle log {}", path.display()))?;
    let parsed = mayhem_protocol::parse_battle_log(&log)
        .with_context(|| format!("parsing battle log {}", path.display()))?;
    let battle = loader.load(&parsed)?;
    Ok((parsed, battle))
}
