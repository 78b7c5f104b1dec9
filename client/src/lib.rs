//! Async session layer for Mayhem battles.
//!
//! Wraps a [`Battle`](mayhem_battle::Battle) in a loop that asks an
//! [`Advisor`] for a move before each player turn. Advisor calls are bounded
//! by a timeout and fall back to a manual choice; the enemy team can be
//! auto-played by the built-in [`HeuristicAdvisor`].
//!
//! # Example
//!
//! ```ignore
//! use mayhem_session::{Session, SessionConfig};
//!
//! mayhem_session::telemetry::init();
//!
//! let config = SessionConfig::from_env();
//! let battle = mayhem_replay::sample_battle(config.rules.clone())?;
//! let mut session = Session::new(battle, config);
//!
//! let summary = session.run(&mut my_controller).await?;
//! println!("{}", summary.outcome);
//! ```

pub mod advisor;
pub mod config;
pub mod heuristic;
pub mod session;
pub mod telemetry;

pub use advisor::{Consultation, consult};
pub use config::SessionConfig;
pub use heuristic::HeuristicAdvisor;
pub use session::{Controller, Session, SessionError, SessionSummary, StopReason};

pub use mayhem_battle::{Advisor, AdvisorError, BattleSnapshot, Suggestion};
