//! Per-agent reward assignment for resolved moves.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::resolver::MoveOutcome;

/// Reward constants.
///
/// `invalid` is normally the most negative value and `step` a small negative
/// cost that pushes agents toward short paths.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardConfig {
    /// Reward for a valid move onto the agent's own target.
    pub goal: f64,
    /// Reward for any other valid move.
    pub step: f64,
    /// Reward for an invalidated move (boundary, obstacle, collision, blocked).
    pub invalid: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            goal: 10.0,
            step: -1.0,
            invalid: -10.0,
        }
    }
}

/// Maps move outcomes to rewards.
pub struct RewardComputer;

impl RewardComputer {
    /// Reward earned by a single agent for one resolved step.
    ///
    /// Returns `None` for agents that did not move (finished or idle): they
    /// earn nothing and their value table must not be touched.
    pub fn compute(outcome: &MoveOutcome, config: &RewardConfig) -> Option<f64> {
        match outcome {
            MoveOutcome::Finished | MoveOutcome::Idle => None,
            MoveOutcome::Invalid { .. } => Some(config.invalid),
            MoveOutcome::Moved {
                reached_target: true,
                ..
            } => Some(config.goal),
            MoveOutcome::Moved { .. } => Some(config.step),
        }
    }
}
