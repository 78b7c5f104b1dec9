//! Sample Battle Example
//!
//! Auto-plays the synthetic 2v2 battle. The player's team follows the
//! heuristic advisor; the snapshot is printed before every player turn.
//!
//! Configure with the `MAYHEM_*` environment variables and `RUST_LOG`.

use anyhow::Result;
use async_trait::async_trait;
use mayhem_battle::{Action, ActionChoice};
use mayhem_session::{BattleSnapshot, Consultation, Controller, HeuristicAdvisor, Session, SessionConfig};

struct Narrator;

#[async_trait]
impl Controller for Narrator {
    async fn manual(&mut self, snapshot: &BattleSnapshot) -> Option<ActionChoice> {
        let actor = snapshot.pending_actor.clone()?;
        HeuristicAdvisor.pick(snapshot).ok().map(|s| s.into_choice(actor))
    }

    async fn decide(&mut self, snapshot: &BattleSnapshot, consultation: Consultation) -> Option<ActionChoice> {
        println!("{}", snapshot);
        match consultation {
            Consultation::Suggested(suggestion) => {
                println!("Advisor: {}", suggestion.rationale);
                let actor = snapshot.pending_actor.clone()?;
                Some(suggestion.into_choice(actor))
            }
            Consultation::Manual { reason } => {
                println!("Advisor unavailable ({}), choosing manually", reason);
                self.manual(snapshot).await
            }
        }
    }

    async fn on_action(&mut self, action: &Action) {
        println!("  {}", action);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    mayhem_session::telemetry::init();

    let config = SessionConfig::from_env();
    let battle = mayhem_replay::sample_battle(config.rules.clone())?;
    let mut session = Session::new(battle, config);

    let summary = session.run(&mut Narrator).await?;

    println!();
    println!("{}", session.snapshot());
    println!(
        "Result: {} after {} actions ({:?})",
        summary.outcome, summary.actions, summary.stop
    );

    Ok(())
}
