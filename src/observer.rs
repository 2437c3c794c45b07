//! Observer port for training events.
//!
//! Rendering, plotting and spreadsheet export live outside this crate. They
//! subscribe to the training loop through [`TrainingObserver`] and receive only
//! the data the core produces: resolved steps, per-agent episode rewards and
//! the final value tables.

use crate::environment::StepResult;
use crate::export::ValueTableExport;
use crate::metrics::EpisodeRecord;
use crate::value_table::ValueTable;
use crate::AgentId;

/// Receives training events.
///
/// # Event Sequence
///
/// 1. `on_training_start(n_episodes)` - once
/// 2. For each episode:
///    - `on_step(episode, result)` - for each step
///    - `on_episode_end(record)`
/// 3. `on_training_end(tables)` - once
///
/// Every method defaults to doing nothing.
pub trait TrainingObserver {
    fn on_training_start(&mut self, _n_episodes: u32) {}

    fn on_step(&mut self, _episode: u32, _result: &StepResult) {}

    fn on_episode_end(&mut self, _record: &EpisodeRecord) {}

    /// Final tables, indexed by agent id.
    fn on_training_end(&mut self, _tables: &[ValueTable]) {}
}

/// Ignores every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl TrainingObserver for NoopObserver {}

/// Collects `(episode, agent, reward)` triples and the final table exports.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub rewards: Vec<(u32, AgentId, f64)>,
    pub steps_seen: u64,
    pub exports: Vec<ValueTableExport>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrainingObserver for RecordingObserver {
    fn on_step(&mut self, _episode: u32, _result: &StepResult) {
        self.steps_seen += 1;
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) {
        for (agent, &reward) in record.rewards.iter().enumerate() {
            self.rewards.push((record.episode, agent, reward));
        }
    }

    fn on_training_end(&mut self, tables: &[ValueTable]) {
        self.exports = tables
            .iter()
            .enumerate()
            .map(|(agent, table)| ValueTableExport::from_table(agent, table))
            .collect();
    }
}
