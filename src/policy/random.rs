//! Random policy for testing and baselines.

use rand::rngs::StdRng;
use rand::Rng;

use super::trait_::Policy;
use crate::types::{Action, Position};
use crate::value_table::ValueTable;

/// Uniformly random action selection, ignoring the value table.
///
/// Used for sanity checks and as a lower-bound baseline.
#[derive(Debug, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn choose_action(&mut self, _table: &ValueTable, _state: Position, rng: &mut StdRng) -> Action {
        Action::ALL[rng.gen_range(0..Action::COUNT)]
    }

    fn name(&self) -> &str {
        "random"
    }
}
