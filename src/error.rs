use thiserror::Error;

use crate::types::Position;

/// Errors raised while validating a [`crate::config::SimulationConfig`].
///
/// These are the only errors in the crate: once a simulation context has been
/// built, boundary hits and collisions are ordinary move outcomes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Need one target per agent: {starts} start cells but {targets} targets")]
    AgentCountMismatch { starts: usize, targets: usize },

    #[error("At least one agent is required")]
    NoAgents,

    #[error("Grid size must be positive")]
    EmptyGrid,

    #[error("{what} {position} lies outside the grid")]
    OutOfBounds {
        what: &'static str,
        position: Position,
    },

    #[error("{what} {position} is an obstacle cell")]
    OnObstacle {
        what: &'static str,
        position: Position,
    },

    #[error("Two agents share the start cell {0}")]
    DuplicateStart(Position),

    #[error("Two agents share the target cell {0}")]
    DuplicateTarget(Position),

    #[error("Parameter {name} must lie in [0, 1], got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Step cap must be at least 1")]
    ZeroStepCap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_count_mismatch_display() {
        let e = ConfigError::AgentCountMismatch {
            starts: 3,
            targets: 2,
        };
        assert_eq!(
            e.to_string(),
            "Need one target per agent: 3 start cells but 2 targets"
        );
    }

    #[test]
    fn out_of_bounds_display() {
        let e = ConfigError::OutOfBounds {
            what: "obstacle",
            position: Position::new(10, 3),
        };
        assert_eq!(e.to_string(), "obstacle (10, 3) lies outside the grid");
    }

    #[test]
    fn invalid_parameter_display() {
        let e = ConfigError::InvalidParameter {
            name: "epsilon",
            value: 1.5,
        };
        assert!(e.to_string().contains("epsilon"));
    }

    #[test]
    fn error_equality() {
        assert_eq!(ConfigError::NoAgents, ConfigError::NoAgents);
        assert_ne!(ConfigError::NoAgents, ConfigError::EmptyGrid);
    }
}
