//! Policy trait for the grid environment.

use rand::rngs::StdRng;

use crate::types::{Action, Position};
use crate::value_table::ValueTable;

/// Chooses one action for one agent from that agent's own value table.
///
/// The runner calls this once per unfinished agent per step, always from the
/// pre-step state, so no agent sees another agent's choice. Any randomness
/// must come from `rng`, the simulation's single shared source, which keeps a
/// seeded run reproducible.
pub trait Policy: Send + Sync {
    /// Selects an action for an agent standing on `state`.
    fn choose_action(&mut self, table: &ValueTable, state: Position, rng: &mut StdRng) -> Action;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
