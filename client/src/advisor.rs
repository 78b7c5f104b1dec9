//! Timeout-bounded advisor calls

use std::time::Duration;

use mayhem_battle::query::check_suggestion;
use mayhem_battle::{Advisor, AdvisorError, BattleSnapshot, Suggestion};

/// What came back from asking an advisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consultation {
    /// A suggestion the pending actor can legally play
    Suggested(Suggestion),
    /// No usable suggestion; the caller has to choose
    Manual { reason: AdvisorError },
}

impl Consultation {
    pub fn suggestion(&self) -> Option<&Suggestion> {
        match self {
            Consultation::Suggested(s) => Some(s),
            Consultation::Manual { .. } => None,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Consultation::Manual { .. })
    }
}

/// Ask `advisor` about `snapshot`, giving up after `timeout`
///
/// Timeouts, advisor errors and suggestions the pending actor could not play
/// all degrade to [`Consultation::Manual`]. The snapshot is owned by the
/// caller, so a slow advisor never holds up the battle itself.
pub async fn consult<A>(advisor: &A, snapshot: &BattleSnapshot, timeout: Duration) -> Consultation
where
    A: Advisor + ?Sized,
{
    let result = match tokio::time::timeout(timeout, advisor.suggest(snapshot)).await {
        Ok(result) => result,
        Err(_) => Err(AdvisorError::Timeout(timeout)),
    };

    let checked = result.and_then(|suggestion| {
        check_suggestion(snapshot, &suggestion)?;
        Ok(suggestion)
    });

    match checked {
        Ok(suggestion) => {
            tracing::debug!(
                advisor = advisor.name(),
                skill = %suggestion.skill_id,
                targets = ?suggestion.target_ids,
                "advisor suggestion accepted"
            );
            Consultation::Suggested(suggestion)
        }
        Err(reason) => {
            tracing::warn!(
                advisor = advisor.name(),
                actor = ?snapshot.pending_actor,
                error = %reason,
                "advisor unavailable, falling back to manual choice"
            );
            Consultation::Manual { reason }
        }
    }
}
