//! Battle state machine, turn scheduling and action resolution

mod battle;
mod resolver;
mod scheduler;

pub use battle::{Battle, Outcome};
pub use scheduler::{TurnScheduler, initiative_order};
