//! Pure exploitation, used for evaluation rollouts.

use rand::rngs::StdRng;

use super::trait_::Policy;
use crate::types::{Action, Position};
use crate::value_table::ValueTable;

/// Always takes the greedy action. Never consumes randomness.
#[derive(Debug, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn choose_action(&mut self, table: &ValueTable, state: Position, _rng: &mut StdRng) -> Action {
        table.best_action(state)
    }

    fn name(&self) -> &str {
        "greedy"
    }
}
