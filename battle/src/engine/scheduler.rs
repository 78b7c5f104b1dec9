//! Initiative order within and across rounds

use crate::types::{Character, TeamState};

/// Initiative order for a new round
///
/// Living characters sorted by effective speed, fastest first. Ties keep
/// team order (left before right) and then slot order.
pub fn initiative_order(teams: &[TeamState]) -> Vec<String> {
    let mut living: Vec<&Character> = teams.iter().flat_map(|t| t.living()).collect();
    // sort_by is stable, so equal speeds stay in team-then-slot order
    living.sort_by(|a, b| b.speed().cmp(&a.speed()));
    living.into_iter().map(|c| c.id.clone()).collect()
}

/// Tracks the current round's order and whose turn it is
///
/// The order is fixed when a round starts; speed changes during the round
/// only show up in the next one.
#[derive(Debug, Clone, Default)]
pub struct TurnScheduler {
    round: u32,
    order: Vec<String>,
    cursor: usize,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current round (0 before the first round starts)
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Full order of the current round
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Characters yet to act this round, the current one included
    pub fn remaining(&self) -> &[String] {
        self.order.get(self.cursor..).unwrap_or(&[])
    }

    /// Character the cursor points at
    pub fn current(&self) -> Option<&str> {
        self.order.get(self.cursor).map(String::as_str)
    }

    pub fn is_round_over(&self) -> bool {
        self.cursor >= self.order.len()
    }

    pub(crate) fn advance(&mut self) {
        if self.cursor < self.order.len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn start_round(&mut self, teams: &[TeamState]) -> &[String] {
        self.round += 1;
        self.order = initiative_order(teams);
        self.cursor = 0;
        &self.order
    }
}
