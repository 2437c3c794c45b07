//! Configuration for the grid, the agents and the learning rule.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reward::RewardConfig;
use crate::types::Position;

/// Temporal-difference and exploration parameters shared by all agents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LearningConfig {
    /// Exploration rate ε. Fixed for the whole run.
    pub epsilon: f64,
    /// Learning rate α.
    pub alpha: f64,
    /// Discount factor γ.
    pub gamma: f64,
}

impl LearningConfig {
    /// Checks that ε, α and γ all lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("epsilon", self.epsilon),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            alpha: 0.1,
            gamma: 0.9,
        }
    }
}

/// Full configuration of a training run, loaded once at startup.
///
/// The default reproduces the reference setup: a 10×10 grid with ten agents
/// starting on the bottom row and ten targets packed around the centre.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    // --- Environment geometry ---
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Static obstacle cells.
    pub obstacles: Vec<Position>,

    // --- Agents ---
    /// Start cell per agent, indexed by agent id.
    pub starts: Vec<Position>,
    /// Target cell per agent, indexed by agent id.
    pub targets: Vec<Position>,

    // --- Reward shaping ---
    pub rewards: RewardConfig,

    // --- Learning ---
    pub learning: LearningConfig,

    // --- Run length ---
    /// Number of training episodes.
    pub episodes: u32,
    /// Maximum steps per episode before it is reported as truncated.
    pub max_steps_per_episode: u32,
    /// Seed for the shared random source.
    pub seed: u64,
}

impl SimulationConfig {
    /// Number of agents described by this configuration.
    pub fn n_agents(&self) -> usize {
        self.starts.len()
    }

    /// Validates the scalar parameters.
    ///
    /// Layout checks (bounds, obstacles, duplicates) are performed by
    /// [`crate::world::GridWorld::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.max_steps_per_episode == 0 {
            return Err(ConfigError::ZeroStepCap);
        }
        self.learning.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let starts = (0..10).map(|col| Position::new(9, col)).collect();
        let targets = [
            (4, 4),
            (4, 5),
            (5, 4),
            (5, 5),
            (4, 3),
            (4, 6),
            (5, 3),
            (5, 6),
            (3, 4),
            (6, 5),
        ]
        .into_iter()
        .map(Position::from)
        .collect();

        Self {
            grid_size: 10,
            obstacles: Vec::new(),
            starts,
            targets,
            rewards: RewardConfig::default(),
            learning: LearningConfig::default(),
            episodes: 1000,
            max_steps_per_episode: 10_000,
            seed: 42,
        }
    }
}
