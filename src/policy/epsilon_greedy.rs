//! Epsilon-greedy exploration.

use rand::rngs::StdRng;
use rand::Rng;

use super::trait_::Policy;
use crate::types::{Action, Position};
use crate::value_table::ValueTable;

/// With probability ε picks a uniformly random action, otherwise the greedy
/// action of the agent's value table.
///
/// ε stays fixed for the whole run; there is no decay schedule.
pub struct EpsilonGreedyPolicy {
    epsilon: f64,
}

impl EpsilonGreedyPolicy {
    /// Creates a new policy with exploration rate `epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Policy for EpsilonGreedyPolicy {
    fn choose_action(&mut self, table: &ValueTable, state: Position, rng: &mut StdRng) -> Action {
        if rng.gen::<f64>() < self.epsilon {
            Action::ALL[rng.gen_range(0..Action::COUNT)]
        } else {
            table.best_action(state)
        }
    }

    fn name(&self) -> &str {
        "epsilon_greedy"
    }
}
