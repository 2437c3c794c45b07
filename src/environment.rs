//! Multi-agent grid environment.
//!
//! Each step runs in two phases: resolve (pure, from the pre-step snapshot)
//! then commit (write every agent's next position).

use tracing::trace;

use crate::agent::AgentState;
use crate::resolver::{Proposal, Resolution, StepResolver};
use crate::reward::RewardConfig;
use crate::types::{Action, Position};
use crate::world::GridWorld;
use crate::AgentId;

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// One resolution per agent, in agent order.
    pub resolutions: Vec<Resolution>,
    /// Whether every agent now stands on its target.
    pub done: bool,
    /// Step counter after this step.
    pub time_step: u32,
}

impl StepResult {
    /// Reward per agent; `None` for agents that were already finished.
    pub fn rewards(&self) -> Vec<Option<f64>> {
        self.resolutions.iter().map(|r| r.reward).collect()
    }

    /// Number of moves rejected this step.
    pub fn n_invalid(&self) -> usize {
        self.resolutions.iter().filter(|r| r.is_invalid()).count()
    }
}

/// The shared grid plus the pool of agents walking on it.
///
/// # Lifecycle
///
/// 1. Call [`GridEnvironment::new`] with a validated world.
/// 2. Call [`GridEnvironment::reset`] to put every agent on its start cell.
/// 3. Repeatedly call [`GridEnvironment::step`] with one action per
///    unfinished agent until `done`.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    world: GridWorld,
    /// Agent states, indexed by agent id.
    pub agents: Vec<AgentState>,
    rewards: RewardConfig,
    /// Current time step.
    pub t: u32,
}

impl GridEnvironment {
    /// Creates the environment and its agent pool.
    pub fn new(world: GridWorld, rewards: RewardConfig) -> Self {
        let agents = world
            .assignments()
            .enumerate()
            .map(|(id, (start, target))| AgentState::new(id, start, target))
            .collect();
        Self {
            world,
            agents,
            rewards,
            t: 0,
        }
    }

    /// Resets the environment for a new episode.
    pub fn reset(&mut self) {
        self.t = 0;
        for agent in &mut self.agents {
            agent.reset();
        }
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn reward_config(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Returns the number of agents.
    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }

    /// Current cell of every agent.
    pub fn positions(&self) -> Vec<Position> {
        self.agents.iter().map(|a| a.position).collect()
    }

    /// Ids of agents that still have to reach their target.
    pub fn pending_agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents
            .iter()
            .filter(|a| !a.is_finished())
            .map(|a| a.id)
    }

    /// Returns true if every agent stands on its target.
    pub fn all_finished(&self) -> bool {
        self.agents.iter().all(AgentState::is_finished)
    }

    /// Builds the proposal set from the current snapshot.
    ///
    /// Finished agents always yield a no-move marker; their entry in
    /// `actions` is ignored.
    ///
    /// # Panics
    ///
    /// Panics if an agent that has not reached its target is given `None`.
    pub fn proposals(&self, actions: &[Option<Action>]) -> Vec<Proposal> {
        self.agents
            .iter()
            .zip(actions)
            .map(|(agent, action)| {
                if agent.is_finished() {
                    return Proposal::finished(agent.id, agent.position);
                }
                match action {
                    Some(a) => Proposal::moving(agent.id, agent.position, *a),
                    None => panic!("Agent {} has not reached its target and must move", agent.id),
                }
            })
            .collect()
    }

    /// Executes one step.
    ///
    /// # Arguments
    ///
    /// * `actions` - One entry per agent; `None` for finished agents.
    pub fn step(&mut self, actions: &[Option<Action>]) -> StepResult {
        assert_eq!(
            actions.len(),
            self.agents.len(),
            "Number of actions must match number of agents"
        );

        let proposals = self.proposals(actions);
        let resolutions = StepResolver::resolve(&self.world, &proposals, &self.rewards);
        self.commit(&resolutions);

        self.t += 1;
        trace!(
            step = self.t,
            invalid = resolutions.iter().filter(|r| r.is_invalid()).count(),
            "step resolved"
        );

        StepResult {
            resolutions,
            done: self.all_finished(),
            time_step: self.t,
        }
    }

    fn commit(&mut self, resolutions: &[Resolution]) {
        for r in resolutions {
            self.agents[r.agent].apply_move(r.next_position());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{InvalidReason, MoveOutcome};

    fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    fn make_env() -> GridEnvironment {
        let world = GridWorld::new(3, [], vec![p(0, 0), p(0, 2)], vec![p(0, 2), p(0, 0)]).unwrap();
        GridEnvironment::new(world, RewardConfig::default())
    }

    #[test]
    fn agents_initialized_at_start() {
        let env = make_env();
        assert_eq!(env.positions(), vec![p(0, 0), p(0, 2)]);
        assert_eq!(env.pending_agents().count(), 2);
        assert!(!env.all_finished());
    }

    #[test]
    fn step_commits_valid_moves() {
        let mut env = make_env();
        let result = env.step(&[Some(Action::Down), Some(Action::Down)]);
        assert_eq!(result.time_step, 1);
        assert_eq!(env.positions(), vec![p(1, 0), p(1, 2)]);
        assert_eq!(result.rewards(), vec![Some(-1.0), Some(-1.0)]);
        assert!(!result.done);
    }

    #[test]
    fn colliding_agents_stay_and_retry() {
        let mut env = make_env();
        let result = env.step(&[Some(Action::Right), Some(Action::Left)]);
        assert_eq!(result.n_invalid(), 2);
        assert_eq!(env.positions(), vec![p(0, 0), p(0, 2)]);

        // Next step they route around each other.
        let result = env.step(&[Some(Action::DownRight), Some(Action::Left)]);
        assert_eq!(result.n_invalid(), 0);
        assert_eq!(env.positions(), vec![p(1, 1), p(0, 1)]);
    }

    #[test]
    fn finished_agent_ignores_its_action() {
        let world = GridWorld::new(3, [], vec![p(1, 1), p(2, 2)], vec![p(1, 1), p(0, 0)]).unwrap();
        let mut env = GridEnvironment::new(world, RewardConfig::default());
        let result = env.step(&[Some(Action::Up), Some(Action::UpLeft)]);
        assert_eq!(result.resolutions[0].outcome, MoveOutcome::Finished);
        assert_eq!(result.resolutions[0].reward, None);
        assert_eq!(
            result.resolutions[1].outcome,
            MoveOutcome::Invalid {
                reason: InvalidReason::BlockedByFinished
            }
        );
        assert_eq!(env.positions(), vec![p(1, 1), p(2, 2)]);
    }

    #[test]
    #[should_panic(expected = "Agent 0 has not reached its target")]
    fn pending_agent_without_action_is_rejected() {
        let world = GridWorld::new(3, [], vec![p(0, 0), p(0, 1)], vec![p(2, 2), p(2, 1)]).unwrap();
        let mut env = GridEnvironment::new(world, RewardConfig::default());
        env.step(&[None, Some(Action::Left)]);
    }

    #[test]
    fn done_when_everyone_arrives() {
        let world = GridWorld::new(3, [], vec![p(0, 0)], vec![p(1, 1)]).unwrap();
        let mut env = GridEnvironment::new(world, RewardConfig::default());
        let result = env.step(&[Some(Action::DownRight)]);
        assert!(result.done);
        assert_eq!(result.rewards(), vec![Some(10.0)]);
    }

    #[test]
    fn reset_restores_starts_and_clock() {
        let mut env = make_env();
        env.step(&[Some(Action::Down), Some(Action::Down)]);
        env.reset();
        assert_eq!(env.t, 0);
        assert_eq!(env.positions(), vec![p(0, 0), p(0, 2)]);
    }
}
