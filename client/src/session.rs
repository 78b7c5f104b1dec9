//! Interactive battle loop
//!
//! The battle itself never waits on anything. A [`Session`] takes a snapshot
//! between turns, asks an advisor with a timeout, lets a [`Controller`] decide,
//! and only then calls `resolve`.

use std::sync::Arc;

use async_trait::async_trait;
use mayhem_battle::{
    Action, ActionChoice, Advisor, AdvisorError, Battle, BattleSnapshot, Character, Outcome,
    ResolveError,
};
use thiserror::Error;

use crate::advisor::{Consultation, consult};
use crate::config::SessionConfig;
use crate::heuristic::HeuristicAdvisor;

/// Decides actions for the player's team
///
/// Only [`Controller::manual`] is required. The default
/// [`Controller::decide`] plays the advisor's suggestion when there is one.
///
/// # Example
///
/// ```ignore
/// struct Autopilot;
///
/// #[async_trait]
/// impl Controller for Autopilot {
///     async fn manual(&mut self, _snapshot: &BattleSnapshot) -> Option<ActionChoice> {
///         None
///     }
/// }
/// ```
#[async_trait]
pub trait Controller: Send {
    /// Choose without advice. `None` ends the session.
    async fn manual(&mut self, snapshot: &BattleSnapshot) -> Option<ActionChoice>;

    /// Choose given the advisor's answer
    async fn decide(
        &mut self,
        snapshot: &BattleSnapshot,
        consultation: Consultation,
    ) -> Option<ActionChoice> {
        match (consultation, snapshot.pending_actor.as_deref()) {
            (Consultation::Suggested(suggestion), Some(actor)) => Some(suggestion.into_choice(actor)),
            _ => self.manual(snapshot).await,
        }
    }

    /// Called after every resolved action, either team's
    async fn on_action(&mut self, action: &Action) {
        let _ = action;
    }

    /// Called when the battle rejects a choice this controller made
    async fn on_rejected(&mut self, choice: &ActionChoice, error: &ResolveError) {
        let _ = (choice, error);
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No move for auto-played {actor}: {reason}")]
    NoEnemyMove {
        actor: String,
        #[source]
        reason: AdvisorError,
    },
}

/// Why [`Session::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The battle reached a terminal outcome
    Finished,
    /// `max_turns` attempts were used up
    TurnLimit,
    /// The controller returned no choice
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub outcome: Outcome,
    pub stop: StopReason,
    /// Actions resolved during this run
    pub actions: usize,
    /// Choices the battle rejected
    pub rejected: usize,
}

/// A battle plus everything needed to drive it
pub struct Session {
    battle: Battle,
    config: SessionConfig,
    advisor: Arc<dyn Advisor>,
    enemy: HeuristicAdvisor,
    attempts: u32,
}

impl Session {
    /// Wrap a battle; the heuristic advisor is used until one is supplied
    pub fn new(mut battle: Battle, config: SessionConfig) -> Self {
        battle.set_perspective(config.perspective);
        Self {
            battle,
            config,
            advisor: Arc::new(HeuristicAdvisor),
            enemy: HeuristicAdvisor,
            attempts: 0,
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn into_battle(self) -> Battle {
        self.battle
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        self.battle.snapshot()
    }

    pub fn outcome(&self) -> Outcome {
        self.battle.outcome()
    }

    /// Character whose turn it is, `None` once the battle is over
    pub fn pending(&self) -> Option<&Character> {
        self.battle.pending_actor()
    }

    /// Whether the pending actor belongs to the controller's team
    pub fn is_player_turn(&self) -> bool {
        self.pending()
            .is_some_and(|c| c.team == self.config.perspective)
    }

    /// Ask the configured advisor about the current state
    pub async fn advise(&self) -> Consultation {
        let snapshot = self.battle.snapshot();
        consult(self.advisor.as_ref(), &snapshot, self.config.advisor_timeout).await
    }

    /// Resolve one choice against the battle
    pub fn play(&mut self, choice: &ActionChoice) -> Result<Action, ResolveError> {
        self.battle.resolve_choice(choice)
    }

    /// Drive the battle until it ends, the controller stops, or the turn cap
    pub async fn run<C>(&mut self, controller: &mut C) -> Result<SessionSummary, SessionError>
    where
        C: Controller + ?Sized,
    {
        let mut actions = 0;
        let mut rejected = 0;

        let stop = loop {
            if self.battle.is_over() {
                break StopReason::Finished;
            }
            if self.attempts >= self.config.max_turns {
                tracing::warn!(max_turns = self.config.max_turns, "session turn limit reached");
                break StopReason::TurnLimit;
            }
            self.attempts += 1;

            let snapshot = self.battle.snapshot();
            let Some(actor) = snapshot.pending_actor.clone() else {
                break StopReason::Finished;
            };

            let controlled = self.is_player_turn() || !self.config.auto_enemy;
            let choice = if controlled {
                let consultation =
                    consult(self.advisor.as_ref(), &snapshot, self.config.advisor_timeout).await;
                match controller.decide(&snapshot, consultation).await {
                    Some(choice) => choice,
                    None => {
                        tracing::info!(actor = %actor, "controller ended the session");
                        break StopReason::Abandoned;
                    }
                }
            } else {
                match self.enemy.pick(&snapshot) {
                    Ok(suggestion) => suggestion.into_choice(actor),
                    Err(reason) => return Err(SessionError::NoEnemyMove { actor, reason }),
                }
            };

            match self.play(&choice) {
                Ok(action) => {
                    actions += 1;
                    controller.on_action(&action).await;
                }
                Err(e) => {
                    tracing::warn!(actor = %choice.actor, skill = %choice.skill_id, error = %e, "choice rejected");
                    rejected += 1;
                    controller.on_rejected(&choice, &e).await;
                }
            }
        };

        let summary = SessionSummary {
            outcome: self.battle.outcome(),
            stop,
            actions,
            rejected,
        };
        tracing::info!(
            outcome = %summary.outcome,
            stop = ?summary.stop,
            actions = summary.actions,
            rejected = summary.rejected,
            "session finished"
        );
        Ok(summary)
    }
}
