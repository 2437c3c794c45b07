//! Agent state for the grid environment.

use crate::types::{Action, Position};
use crate::AgentId;

/// State of a single agent.
///
/// Agents are created once from the configured start list and reused across
/// episodes. `start` and `target` never change; `position` is reset at the
/// beginning of every episode and written only by the commit of a resolved
/// step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    /// Index of this agent in the pool.
    pub id: AgentId,
    /// Cell the agent returns to on reset.
    pub start: Position,
    /// Cell the agent must reach.
    pub target: Position,
    /// Current cell.
    pub position: Position,
}

impl AgentState {
    /// Creates a new agent standing on its start cell.
    pub fn new(id: AgentId, start: Position, target: Position) -> Self {
        Self {
            id,
            start,
            target,
            position: start,
        }
    }

    /// Puts the agent back on its start cell.
    pub fn reset(&mut self) {
        self.position = self.start;
    }

    /// Returns true once the agent stands on its target.
    pub fn is_finished(&self) -> bool {
        self.position == self.target
    }

    /// Cell the agent would occupy after `action`. May lie off the grid.
    pub fn propose(&self, action: Action) -> Position {
        self.position.offset(action)
    }

    pub fn apply_move(&mut self, to: Position) {
        self.position = to;
    }
}
