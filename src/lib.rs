//! gridmarl - independent tabular Q-learners on a shared grid
//!
//! N agents, each with its own action-value table, learn to walk from a fixed
//! start cell to a fixed target cell. Every step all unfinished agents propose
//! a move simultaneously and a resolution protocol turns the full proposal set
//! into one consistent next world-state plus per-agent rewards.

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod export;
pub mod metrics;
pub mod observer;
pub mod policy;
pub mod resolver;
pub mod reward;
pub mod runner;
pub mod types;
pub mod value_table;
pub mod world;

pub use agent::AgentState;
pub use config::{LearningConfig, SimulationConfig};
pub use environment::{GridEnvironment, StepResult};
pub use error::ConfigError;
pub use export::ValueTableExport;
pub use metrics::{EpisodeOutcome, EpisodeRecord, TrainingHistory};
pub use observer::{NoopObserver, RecordingObserver, TrainingObserver};
pub use policy::{EpsilonGreedyPolicy, GreedyPolicy, Policy, RandomPolicy};
pub use resolver::{InvalidReason, MoveOutcome, Proposal, Resolution, StepResolver};
pub use reward::{RewardComputer, RewardConfig};
pub use runner::{EpisodePhase, EpisodeRunner, SimulationContext};
pub use types::{Action, Position};
pub use value_table::ValueTable;
pub use world::GridWorld;

/// Index of an agent in the pool (`0..n_agents`).
pub type AgentId = usize;
