//! Simultaneous move resolution.
//!
//! Every unfinished agent proposes a move from the same pre-step snapshot.
//! [`StepResolver::resolve`] maps the whole proposal set to one outcome per
//! agent without mutating anything; committing the outcomes is a separate
//! phase owned by [`crate::environment::GridEnvironment`]. Because every
//! check reads only the snapshot and the step-level tallies, the result does
//! not depend on the order in which agents are listed.

use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::reward::{RewardComputer, RewardConfig};
use crate::types::{Action, Position};
use crate::world::GridWorld;
use crate::AgentId;

/// One agent's intent for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proposal {
    pub agent: AgentId,
    /// Cell the agent stands on before the step.
    pub state: Position,
    /// `None` when the agent does not move this step.
    pub action: Option<Action>,
    /// Cell the agent wants to enter; equals `state` for finished agents.
    pub proposed: Position,
}

impl Proposal {
    /// A move proposal from `state` along `action`.
    pub fn moving(agent: AgentId, state: Position, action: Action) -> Self {
        Self {
            agent,
            state,
            action: Some(action),
            proposed: state.offset(action),
        }
    }

    /// Marker for an agent holding its target.
    pub fn finished(agent: AgentId, state: Position) -> Self {
        Self {
            agent,
            state,
            action: None,
            proposed: state,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.action.is_some()
    }
}

/// Why a proposed move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InvalidReason {
    /// Proposed cell lies outside the grid.
    OutOfBounds,
    /// Proposed cell is a static obstacle.
    Obstacle,
    /// Another moving agent proposed the same cell.
    Collision,
    /// Proposed cell is held by an agent that already finished.
    BlockedByFinished,
}

/// Result of resolving one agent's proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Agent was already on its target; no move, no reward, no update.
    Finished,
    /// Agent proposed no move without standing on its target; it stays put,
    /// earns nothing and does not block anyone.
    Idle,
    /// Move rejected; agent stays where it was.
    Invalid { reason: InvalidReason },
    /// Move accepted.
    Moved { to: Position, reached_target: bool },
}

/// Outcome and reward of one agent for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub agent: AgentId,
    /// Cell before the step.
    pub from: Position,
    pub action: Option<Action>,
    pub outcome: MoveOutcome,
    /// `None` exactly when `outcome` is [`MoveOutcome::Finished`] or
    /// [`MoveOutcome::Idle`].
    pub reward: Option<f64>,
}

impl Resolution {
    /// Cell the agent occupies after the step is committed.
    pub fn next_position(&self) -> Position {
        match self.outcome {
            MoveOutcome::Moved { to, .. } => to,
            MoveOutcome::Finished | MoveOutcome::Idle | MoveOutcome::Invalid { .. } => self.from,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Invalid { .. })
    }
}

/// The move-resolution protocol for one step.
pub struct StepResolver;

impl StepResolver {
    /// Number of moving agents proposing each cell.
    pub fn occupancy_tally(proposals: &[Proposal]) -> HashMap<Position, u32> {
        let mut counts = HashMap::new();
        for p in proposals.iter().filter(|p| p.is_moving()) {
            *counts.entry(p.proposed).or_insert(0) += 1;
        }
        counts
    }

    /// Cells held by agents that have already finished.
    ///
    /// Only agents standing on their own target count; a non-moving agent
    /// anywhere else does not block its cell.
    pub fn finished_cells(world: &GridWorld, proposals: &[Proposal]) -> HashSet<Position> {
        proposals
            .iter()
            .filter(|p| !p.is_moving() && p.state == world.target(p.agent))
            .map(|p| p.state)
            .collect()
    }

    /// Checks a single moving proposal against the step-level tallies.
    ///
    /// Checks run in the order bounds, obstacle, collision, finished
    /// occupancy; the first failure is reported.
    pub fn check(
        world: &GridWorld,
        proposal: &Proposal,
        tally: &HashMap<Position, u32>,
        finished: &HashSet<Position>,
    ) -> Option<InvalidReason> {
        let cell = proposal.proposed;
        if !world.contains(cell) {
            Some(InvalidReason::OutOfBounds)
        } else if world.is_obstacle(cell) {
            Some(InvalidReason::Obstacle)
        } else if tally.get(&cell).copied().unwrap_or(0) > 1 {
            Some(InvalidReason::Collision)
        } else if finished.contains(&cell) {
            Some(InvalidReason::BlockedByFinished)
        } else {
            None
        }
    }

    /// Resolves a full proposal set into one [`Resolution`] per proposal, in
    /// the same order.
    ///
    /// Pure: reads only `world`, `proposals` and `rewards`.
    pub fn resolve(
        world: &GridWorld,
        proposals: &[Proposal],
        rewards: &RewardConfig,
    ) -> Vec<Resolution> {
        let tally = Self::occupancy_tally(proposals);
        let finished = Self::finished_cells(world, proposals);

        proposals
            .iter()
            .map(|p| {
                let outcome = match p.action {
                    None if finished.contains(&p.state) => MoveOutcome::Finished,
                    None => MoveOutcome::Idle,
                    Some(_) => match Self::check(world, p, &tally, &finished) {
                        Some(reason) => MoveOutcome::Invalid { reason },
                        None => MoveOutcome::Moved {
                            to: p.proposed,
                            reached_target: p.proposed == world.target(p.agent),
                        },
                    },
                };
                Resolution {
                    agent: p.agent,
                    from: p.state,
                    action: p.action,
                    outcome,
                    reward: RewardComputer::compute(&outcome, rewards),
                }
            })
            .collect()
    }
}
