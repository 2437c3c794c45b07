//! Static description of the environment.

use std::collections::HashSet;

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::types::Position;
use crate::AgentId;

/// Grid bounds, obstacle cells and the fixed start/target pairing per agent.
///
/// Read-only after construction. Construction enforces the layout invariants
/// the resolution protocol relies on: one target per agent, every cell in
/// bounds and off obstacles, and no two agents sharing a start or a target.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: usize,
    obstacles: HashSet<Position>,
    starts: Vec<Position>,
    targets: Vec<Position>,
}

impl GridWorld {
    /// Builds and validates a world.
    pub fn new(
        size: usize,
        obstacles: impl IntoIterator<Item = Position>,
        starts: Vec<Position>,
        targets: Vec<Position>,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if starts.len() != targets.len() {
            return Err(ConfigError::AgentCountMismatch {
                starts: starts.len(),
                targets: targets.len(),
            });
        }
        if starts.is_empty() {
            return Err(ConfigError::NoAgents);
        }

        let world = Self {
            size,
            obstacles: obstacles.into_iter().collect(),
            starts,
            targets,
        };

        for &position in &world.obstacles {
            if !world.contains(position) {
                return Err(ConfigError::OutOfBounds {
                    what: "obstacle",
                    position,
                });
            }
        }
        world.check_cells("start", &world.starts, ConfigError::DuplicateStart)?;
        world.check_cells("target", &world.targets, ConfigError::DuplicateTarget)?;

        Ok(world)
    }

    /// Builds the world described by a configuration.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.grid_size,
            config.obstacles.iter().copied(),
            config.starts.clone(),
            config.targets.clone(),
        )
    }

    fn check_cells(
        &self,
        what: &'static str,
        cells: &[Position],
        duplicate: fn(Position) -> ConfigError,
    ) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(cells.len());
        for &position in cells {
            if !self.contains(position) {
                return Err(ConfigError::OutOfBounds { what, position });
            }
            if self.is_obstacle(position) {
                return Err(ConfigError::OnObstacle { what, position });
            }
            if !seen.insert(position) {
                return Err(duplicate(position));
            }
        }
        Ok(())
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if `position` lies in `[0, size)` on both axes.
    pub fn contains(&self, position: Position) -> bool {
        let in_range = |v: i32| v >= 0 && (v as usize) < self.size;
        in_range(position.row) && in_range(position.col)
    }

    /// Returns true if `position` is a static obstacle.
    pub fn is_obstacle(&self, position: Position) -> bool {
        self.obstacles.contains(&position)
    }

    /// Number of agents.
    pub fn n_agents(&self) -> usize {
        self.starts.len()
    }

    /// Start cell of an agent.
    pub fn start(&self, agent: AgentId) -> Position {
        self.starts[agent]
    }

    /// Target cell of an agent.
    pub fn target(&self, agent: AgentId) -> Position {
        self.targets[agent]
    }

    /// `(start, target)` pairs in agent order.
    pub fn assignments(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.starts.iter().copied().zip(self.targets.iter().copied())
    }
}
