//! Per-episode records and training history.
//!
//! The history is append-only and is what plotting collaborators consume:
//! one cumulative reward per agent per episode.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::AgentId;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EpisodeOutcome {
    /// Every agent reached its target.
    Completed,
    /// The step cap was hit first.
    Truncated,
}

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpisodeRecord {
    /// Episode index (0-based).
    pub episode: u32,
    /// Steps taken.
    pub steps: u32,
    /// Cumulative reward per agent.
    pub rewards: Vec<f64>,
    pub outcome: EpisodeOutcome,
}

impl EpisodeRecord {
    pub fn is_truncated(&self) -> bool {
        self.outcome == EpisodeOutcome::Truncated
    }

    /// Sum of all agents' rewards.
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }
}

impl fmt::Display for EpisodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {}: steps={}, rewards={:?}",
            self.episode, self.steps, self.rewards
        )?;
        if self.is_truncated() {
            write!(f, " (truncated)")?;
        }
        Ok(())
    }
}

/// All episode records of a training run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainingHistory {
    episodes: Vec<EpisodeRecord>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: EpisodeRecord) {
        self.episodes.push(record);
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn episodes(&self) -> &[EpisodeRecord] {
        &self.episodes
    }

    pub fn last(&self) -> Option<&EpisodeRecord> {
        self.episodes.last()
    }

    /// Cumulative reward of one agent in every episode, in order.
    pub fn reward_series(&self, agent: AgentId) -> Vec<f64> {
        self.episodes
            .iter()
            .filter_map(|e| e.rewards.get(agent).copied())
            .collect()
    }

    /// Step count of every episode, in order.
    pub fn step_series(&self) -> Vec<u32> {
        self.episodes.iter().map(|e| e.steps).collect()
    }

    /// Mean step count over the last `window` episodes.
    pub fn mean_steps(&self, window: usize) -> Option<f64> {
        let n = window.min(self.episodes.len());
        if n == 0 {
            return None;
        }
        let total: u64 = self.episodes[self.episodes.len() - n..]
            .iter()
            .map(|e| e.steps as u64)
            .sum();
        Some(total as f64 / n as f64)
    }

    /// Mean step count over the first `window` episodes.
    pub fn mean_steps_head(&self, window: usize) -> Option<f64> {
        let n = window.min(self.episodes.len());
        if n == 0 {
            return None;
        }
        let total: u64 = self.episodes[..n].iter().map(|e| e.steps as u64).sum();
        Some(total as f64 / n as f64)
    }

    pub fn n_truncated(&self) -> usize {
        self.episodes.iter().filter(|e| e.is_truncated()).count()
    }
}

impl fmt::Display for TrainingHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Training History ({} episodes) ===", self.len())?;
        if let Some(last) = self.last() {
            writeln!(f, "  Last episode steps:      {}", last.steps)?;
            writeln!(f, "  Last episode reward:     {:.2}", last.total_reward())?;
        }
        if let Some(mean) = self.mean_steps(100) {
            writeln!(f, "  Mean steps (last 100):   {:.1}", mean)?;
        }
        write!(f, "  Truncated episodes:      {}", self.n_truncated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(episode: u32, steps: u32, rewards: Vec<f64>) -> EpisodeRecord {
        EpisodeRecord {
            episode,
            steps,
            rewards,
            outcome: EpisodeOutcome::Completed,
        }
    }

    #[test]
    fn reward_series_per_agent() {
        let mut h = TrainingHistory::new();
        h.push(record(0, 5, vec![1.0, -3.0]));
        h.push(record(1, 3, vec![6.0, 7.0]));
        assert_eq!(h.reward_series(0), vec![1.0, 6.0]);
        assert_eq!(h.reward_series(1), vec![-3.0, 7.0]);
        assert_eq!(h.step_series(), vec![5, 3]);
    }

    #[test]
    fn mean_steps_windows() {
        let mut h = TrainingHistory::new();
        assert_eq!(h.mean_steps(10), None);
        for (i, steps) in [10, 8, 4, 2].into_iter().enumerate() {
            h.push(record(i as u32, steps, vec![0.0]));
        }
        assert_eq!(h.mean_steps(2), Some(3.0));
        assert_eq!(h.mean_steps_head(2), Some(9.0));
        assert_eq!(h.mean_steps(100), Some(6.0));
    }

    #[test]
    fn summary_display_matches_progress_line() {
        let s = record(3, 12, vec![1.0, -2.0]);
        assert_eq!(s.to_string(), "Episode 3: steps=12, rewards=[1.0, -2.0]");

        let truncated = EpisodeRecord {
            outcome: EpisodeOutcome::Truncated,
            ..s
        };
        assert!(truncated.to_string().ends_with("(truncated)"));
    }

    #[test]
    fn counts_truncated() {
        let mut h = TrainingHistory::new();
        h.push(record(0, 4, vec![0.0]));
        h.push(EpisodeRecord {
            outcome: EpisodeOutcome::Truncated,
            ..record(1, 50, vec![-50.0])
        });
        assert_eq!(h.n_truncated(), 1);
        assert!(h.to_string().contains("Truncated episodes:      1"));
    }
}
