//! Episode orchestration: policy, resolution, learning and bookkeeping.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::environment::{GridEnvironment, StepResult};
use crate::error::ConfigError;
use crate::export::ValueTableExport;
use crate::metrics::{EpisodeOutcome, EpisodeRecord, TrainingHistory};
use crate::observer::TrainingObserver;
use crate::policy::{EpsilonGreedyPolicy, GreedyPolicy, Policy};
use crate::types::{Action, Position};
use crate::value_table::ValueTable;
use crate::world::GridWorld;

/// Everything a simulation mutates, owned in one place.
///
/// Holds the environment (world plus agent pool), one value table per agent
/// and the single shared random source.
#[derive(Debug)]
pub struct SimulationContext {
    pub config: SimulationConfig,
    pub env: GridEnvironment,
    /// Value tables, indexed by agent id.
    pub tables: Vec<ValueTable>,
    rng: StdRng,
}

impl SimulationContext {
    /// Validates `config` and builds the context.
    ///
    /// Fails before any episode can run if the configuration is inconsistent.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = GridWorld::from_config(&config)?;
        let env = GridEnvironment::new(world, config.rewards);
        let tables = (0..env.n_agents())
            .map(|_| ValueTable::from_config(config.grid_size, &config.learning))
            .collect();
        debug!(
            grid_size = config.grid_size,
            agents = env.n_agents(),
            obstacles = config.obstacles.len(),
            seed = config.seed,
            "simulation context created"
        );
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            env,
            tables,
        })
    }

    /// Runs one step: every unfinished agent picks an action from the
    /// pre-step snapshot, the environment resolves and commits, and, when
    /// `learn` is set, each agent that moved or was rejected updates its own
    /// table.
    pub fn advance(&mut self, policy: &mut dyn Policy, learn: bool) -> StepResult {
        let mut actions: Vec<Option<Action>> = Vec::with_capacity(self.env.n_agents());
        for (agent, table) in self.env.agents.iter().zip(&self.tables) {
            if agent.is_finished() {
                actions.push(None);
            } else {
                actions.push(Some(policy.choose_action(
                    table,
                    agent.position,
                    &mut self.rng,
                )));
            }
        }

        let result = self.env.step(&actions);

        if learn {
            for r in &result.resolutions {
                if let (Some(action), Some(reward)) = (r.action, r.reward) {
                    self.tables[r.agent].update(r.from, action, reward, r.next_position());
                }
            }
        }

        result
    }

    /// Value tables in the export layout, one per agent.
    pub fn export_tables(&self) -> Vec<ValueTableExport> {
        self.tables
            .iter()
            .enumerate()
            .map(|(agent, table)| ValueTableExport::from_table(agent, table))
            .collect()
    }
}

/// Where the runner is within the current episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Agents stand on their start cells and no step of the episode has been
    /// played yet.
    Resetting,
    /// Steps are being played.
    Stepping,
    /// The episode ended and has been recorded.
    Done,
}

/// Drives episodes to completion or to the step cap and records them.
pub struct EpisodeRunner<P: Policy> {
    ctx: SimulationContext,
    policy: P,
    phase: EpisodePhase,
    episode: u32,
    steps: u32,
    episode_rewards: Vec<f64>,
    history: TrainingHistory,
}

impl EpisodeRunner<EpsilonGreedyPolicy> {
    /// Builds a runner with the ε-greedy policy described by `config`.
    pub fn from_config(config: SimulationConfig) -> Result<Self, ConfigError> {
        let policy = EpsilonGreedyPolicy::new(config.learning.epsilon);
        Ok(Self::new(SimulationContext::new(config)?, policy))
    }
}

impl<P: Policy> EpisodeRunner<P> {
    pub fn new(ctx: SimulationContext, policy: P) -> Self {
        let n_agents = ctx.env.n_agents();
        Self {
            ctx,
            policy,
            phase: EpisodePhase::Resetting,
            episode: 0,
            steps: 0,
            episode_rewards: vec![0.0; n_agents],
            history: TrainingHistory::new(),
        }
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    pub fn tables(&self) -> &[ValueTable] {
        &self.ctx.tables
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Index of the next episode to run.
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Steps taken so far in the current episode.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Reward accumulated so far in the current episode, per agent.
    pub fn episode_rewards(&self) -> &[f64] {
        &self.episode_rewards
    }

    /// Consumes the runner, returning the final context and history.
    pub fn into_parts(self) -> (SimulationContext, TrainingHistory) {
        (self.ctx, self.history)
    }

    /// Puts every agent on its start cell and clears the episode counters.
    ///
    /// The runner stays in [`EpisodePhase::Resetting`] until the first step.
    pub fn reset(&mut self) {
        self.ctx.env.reset();
        self.steps = 0;
        self.episode_rewards.iter_mut().for_each(|r| *r = 0.0);
        self.phase = EpisodePhase::Resetting;
    }

    /// Plays one learning step of the current episode.
    ///
    /// Called after an episode is done, it starts a fresh one first.
    pub fn step(&mut self) -> StepResult {
        if self.phase == EpisodePhase::Done {
            self.reset();
        }
        self.phase = EpisodePhase::Stepping;
        let result = self.ctx.advance(&mut self.policy, true);
        self.steps += 1;
        for r in &result.resolutions {
            if let Some(reward) = r.reward {
                self.episode_rewards[r.agent] += reward;
            }
        }
        result
    }

    /// Runs one full training episode and records it.
    pub fn run_episode(&mut self, observer: &mut dyn TrainingObserver) -> EpisodeRecord {
        self.reset();
        let cap = self.ctx.config.max_steps_per_episode;

        let outcome = loop {
            if self.ctx.env.all_finished() {
                break EpisodeOutcome::Completed;
            }
            if self.steps >= cap {
                break EpisodeOutcome::Truncated;
            }
            let result = self.step();
            observer.on_step(self.episode, &result);
        };

        let record = EpisodeRecord {
            episode: self.episode,
            steps: self.steps,
            rewards: self.episode_rewards.clone(),
            outcome,
        };
        match outcome {
            EpisodeOutcome::Completed => info!(
                episode = record.episode,
                steps = record.steps,
                rewards = ?record.rewards,
                "episode completed"
            ),
            EpisodeOutcome::Truncated => warn!(
                episode = record.episode,
                steps = record.steps,
                "episode truncated at step cap"
            ),
        }

        self.phase = EpisodePhase::Done;
        self.history.push(record.clone());
        observer.on_episode_end(&record);
        self.episode += 1;
        record
    }

    /// Runs the configured number of training episodes.
    pub fn train(&mut self, observer: &mut dyn TrainingObserver) -> &TrainingHistory {
        let episodes = self.ctx.config.episodes;
        self.train_for(episodes, observer)
    }

    /// Runs `episodes` training episodes.
    pub fn train_for(
        &mut self,
        episodes: u32,
        observer: &mut dyn TrainingObserver,
    ) -> &TrainingHistory {
        observer.on_training_start(episodes);
        for _ in 0..episodes {
            self.run_episode(observer);
        }
        observer.on_training_end(&self.ctx.tables);
        &self.history
    }

    /// Plays one greedy episode without learning.
    ///
    /// The rollout is not added to the history and does not advance the
    /// episode counter. Returns the record together with the cells each agent
    /// visited, start cell first.
    pub fn evaluate(&mut self) -> (EpisodeRecord, Vec<Vec<Position>>) {
        self.reset();
        let cap = self.ctx.config.max_steps_per_episode;
        let mut paths: Vec<Vec<Position>> = self
            .ctx
            .env
            .positions()
            .into_iter()
            .map(|p| vec![p])
            .collect();
        let mut greedy = GreedyPolicy;

        let outcome = loop {
            if self.ctx.env.all_finished() {
                break EpisodeOutcome::Completed;
            }
            if self.steps >= cap {
                break EpisodeOutcome::Truncated;
            }
            self.phase = EpisodePhase::Stepping;
            let result = self.ctx.advance(&mut greedy, false);
            self.steps += 1;
            for r in &result.resolutions {
                if let Some(reward) = r.reward {
                    self.episode_rewards[r.agent] += reward;
                    paths[r.agent].push(r.next_position());
                }
            }
        };

        self.phase = EpisodePhase::Done;
        let record = EpisodeRecord {
            episode: self.episode,
            steps: self.steps,
            rewards: self.episode_rewards.clone(),
            outcome,
        };
        (record, paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LearningConfig;
    use crate::observer::{NoopObserver, RecordingObserver};

    fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            grid_size: 3,
            obstacles: vec![],
            starts: vec![p(0, 0)],
            targets: vec![p(2, 2)],
            episodes: 5,
            max_steps_per_episode: 500,
            seed: 1,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn mismatched_config_aborts_construction() {
        let config = SimulationConfig {
            targets: vec![p(2, 2), p(2, 1)],
            ..small_config()
        };
        assert!(matches!(
            EpisodeRunner::from_config(config),
            Err(ConfigError::AgentCountMismatch { .. })
        ));
    }

    #[test]
    fn phases_follow_episode_lifecycle() {
        let mut runner = EpisodeRunner::from_config(small_config()).unwrap();
        assert_eq!(runner.phase(), EpisodePhase::Resetting);
        runner.reset();
        assert_eq!(runner.phase(), EpisodePhase::Resetting);
        runner.step();
        assert_eq!(runner.phase(), EpisodePhase::Stepping);
        runner.run_episode(&mut NoopObserver);
        assert_eq!(runner.phase(), EpisodePhase::Done);
        assert_eq!(runner.episode(), 1);

        // Done holds until the next reset.
        assert_eq!(runner.phase(), EpisodePhase::Done);
        runner.reset();
        assert_eq!(runner.phase(), EpisodePhase::Resetting);
        assert_eq!(runner.steps(), 0);
        assert_eq!(runner.context().env.positions(), vec![p(0, 0)]);
    }

    #[test]
    fn step_after_done_starts_a_fresh_episode() {
        let mut runner = EpisodeRunner::from_config(small_config()).unwrap();
        runner.run_episode(&mut NoopObserver);
        assert_eq!(runner.phase(), EpisodePhase::Done);

        let result = runner.step();
        assert_eq!(runner.phase(), EpisodePhase::Stepping);
        assert_eq!(runner.steps(), 1);
        assert_eq!(result.resolutions[0].from, p(0, 0));
    }

    #[test]
    fn train_records_every_episode() {
        let mut runner = EpisodeRunner::from_config(small_config()).unwrap();
        let mut obs = RecordingObserver::new();
        let history = runner.train(&mut obs);
        assert_eq!(history.len(), 5);
        assert_eq!(obs.rewards.len(), 5);
        assert_eq!(obs.exports.len(), 1);
        let total_steps: u64 = history.step_series().iter().map(|&s| s as u64).sum();
        assert_eq!(obs.steps_seen, total_steps);
        for record in history.episodes() {
            assert_eq!(record.outcome, EpisodeOutcome::Completed);
        }
    }

    #[test]
    fn episode_reward_is_sum_of_step_rewards() {
        let mut runner = EpisodeRunner::from_config(small_config()).unwrap();
        let record = runner.run_episode(&mut NoopObserver);
        // The last move pays the goal reward, every other step earns step or invalid.
        let rewards = runner.context().config.rewards;
        let non_goal = record.rewards[0] - rewards.goal;
        assert!(non_goal <= rewards.step * (record.steps - 1) as f64 + 1e-10);
        assert!(non_goal >= rewards.invalid * (record.steps - 1) as f64 - 1e-10);
    }

    #[test]
    fn unreachable_target_is_truncated() {
        let config = SimulationConfig {
            obstacles: vec![p(1, 1), p(1, 2), p(2, 1)],
            max_steps_per_episode: 25,
            ..small_config()
        };
        let mut runner = EpisodeRunner::from_config(config).unwrap();
        let record = runner.run_episode(&mut NoopObserver);
        assert_eq!(record.outcome, EpisodeOutcome::Truncated);
        assert_eq!(record.steps, 25);
        assert_eq!(runner.history().n_truncated(), 1);
    }

    #[test]
    fn already_finished_everyone_completes_in_zero_steps() {
        let config = SimulationConfig {
            starts: vec![p(2, 2)],
            ..small_config()
        };
        let mut runner = EpisodeRunner::from_config(config).unwrap();
        let record = runner.run_episode(&mut NoopObserver);
        assert_eq!(record.steps, 0);
        assert_eq!(record.rewards, vec![0.0]);
        assert!(runner.tables()[0].is_untouched());
    }

    #[test]
    fn greedy_path_after_training() {
        let config = SimulationConfig {
            learning: LearningConfig {
                epsilon: 1.0,
                alpha: 0.5,
                gamma: 0.9,
            },
            episodes: 500,
            ..small_config()
        };
        let mut runner = EpisodeRunner::from_config(config).unwrap();
        runner.train(&mut NoopObserver);

        let (record, paths) = runner.evaluate();
        assert_eq!(record.outcome, EpisodeOutcome::Completed);
        assert_eq!(record.steps, 2);
        assert_eq!(paths[0], vec![p(0, 0), p(1, 1), p(2, 2)]);
        assert!((record.rewards[0] - 9.0).abs() < 1e-10);
        // Evaluation leaves the history alone.
        assert_eq!(runner.history().len(), 500);
    }
}
