//! Tabular action-value function.

use crate::config::LearningConfig;
use crate::types::{Action, Position};

/// Q-table mapping `(cell, action)` to an estimated discounted return.
///
/// Stored densely as `[row][col][action]`, all entries starting at 0. Each
/// agent owns exactly one table and is its only writer.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    grid_size: usize,
    values: Vec<f64>,
    /// Learning rate α
    alpha: f64,
    /// Discount factor γ
    gamma: f64,
}

impl ValueTable {
    /// Creates a zeroed table for a `grid_size × grid_size` grid.
    pub fn new(grid_size: usize, alpha: f64, gamma: f64) -> Self {
        Self {
            grid_size,
            values: vec![0.0; grid_size * grid_size * Action::COUNT],
            alpha,
            gamma,
        }
    }

    pub fn from_config(grid_size: usize, learning: &LearningConfig) -> Self {
        Self::new(grid_size, learning.alpha, learning.gamma)
    }

    fn cell_offset(&self, state: Position) -> Option<usize> {
        let size = self.grid_size as i32;
        if state.row < 0 || state.col < 0 || state.row >= size || state.col >= size {
            return None;
        }
        Some((state.row as usize * self.grid_size + state.col as usize) * Action::COUNT)
    }

    /// The 8 action values at `state` in canonical order; zeros off the grid.
    pub fn values_at(&self, state: Position) -> [f64; Action::COUNT] {
        let mut out = [0.0; Action::COUNT];
        if let Some(base) = self.cell_offset(state) {
            out.copy_from_slice(&self.values[base..base + Action::COUNT]);
        }
        out
    }

    /// Current estimate of `Q(state, action)`.
    pub fn value_of(&self, state: Position, action: Action) -> f64 {
        self.cell_offset(state)
            .map(|base| self.values[base + action.index()])
            .unwrap_or(0.0)
    }

    /// Overwrites `Q(state, action)`. Ignored off the grid.
    pub fn set(&mut self, state: Position, action: Action, value: f64) {
        if let Some(base) = self.cell_offset(state) {
            self.values[base + action.index()] = value;
        }
    }

    /// Greedy action at `state`.
    ///
    /// Ties go to the action that comes first in canonical order.
    pub fn best_action(&self, state: Position) -> Action {
        let values = self.values_at(state);
        let mut best = 0;
        for (i, &v) in values.iter().enumerate().skip(1) {
            if v > values[best] {
                best = i;
            }
        }
        Action::ALL[best]
    }

    /// `max_a Q(state, a)`.
    pub fn best_value(&self, state: Position) -> f64 {
        self.values_at(state)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Q-learning update
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn update(&mut self, state: Position, action: Action, reward: f64, next_state: Position) {
        let current = self.value_of(state, action);
        let td_target = reward + self.gamma * self.best_value(next_state);
        let new_q = current + self.alpha * (td_target - current);
        self.set(state, action, new_q);
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Dense values indexed by `(row * grid_size + col) * 8 + action`.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns true while every entry is still 0.
    pub fn is_untouched(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ValueTable {
        ValueTable::new(3, 0.5, 0.9)
    }

    #[test]
    fn starts_at_zero() {
        let t = table();
        assert_eq!(t.value_of(Position::new(1, 1), Action::Up), 0.0);
        assert_eq!(t.as_slice().len(), 3 * 3 * 8);
        assert!(t.is_untouched());
    }

    #[test]
    fn off_grid_reads_as_zero() {
        let mut t = table();
        t.set(Position::new(-1, 0), Action::Up, 5.0);
        assert_eq!(t.value_of(Position::new(-1, 0), Action::Up), 0.0);
        assert!(t.is_untouched());
    }

    #[test]
    fn ties_break_toward_canonical_order() {
        let t = table();
        assert_eq!(t.best_action(Position::new(0, 0)), Action::Up);

        let mut t = table();
        let s = Position::new(0, 0);
        t.set(s, Action::Right, 2.0);
        t.set(s, Action::DownRight, 2.0);
        assert_eq!(t.best_action(s), Action::Right);
    }

    #[test]
    fn best_value_is_max() {
        let mut t = table();
        let s = Position::new(2, 1);
        for a in Action::all() {
            t.set(s, a, -1.0);
        }
        t.set(s, Action::Left, -0.25);
        assert_eq!(t.best_value(s), -0.25);
        assert_eq!(t.best_action(s), Action::Left);
    }

    #[test]
    fn td_update() {
        let mut t = table();
        let s = Position::new(0, 0);
        let s2 = Position::new(1, 1);
        t.set(s2, Action::Down, 4.0);
        t.set(s, Action::DownRight, 1.0);
        // 1 + 0.5 * (-1 + 0.9 * 4 - 1) = 1.8
        t.update(s, Action::DownRight, -1.0, s2);
        assert!((t.value_of(s, Action::DownRight) - 1.8).abs() < 1e-10);
    }

    #[test]
    fn update_only_touches_one_entry() {
        let mut t = table();
        let s = Position::new(1, 2);
        t.update(s, Action::Left, -10.0, s);
        let touched: Vec<_> = t.as_slice().iter().filter(|&&v| v != 0.0).collect();
        assert_eq!(touched.len(), 1);
        assert!((t.value_of(s, Action::Left) + 5.0).abs() < 1e-10);
    }
}
