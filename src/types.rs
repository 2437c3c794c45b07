//! Core value types shared by the grid, the value tables and the resolver.
//!
//! Defines grid cells and the fixed 8-direction action set used by every
//! agent.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the 8 moves available to every agent.
///
/// The declaration order is the canonical order: it is the tie-break order for
/// greedy selection and the column order of exported value tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 8;

    /// All actions in canonical order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::UpLeft,
        Action::UpRight,
        Action::DownLeft,
        Action::DownRight,
    ];

    /// Column names used when exporting value tables.
    pub const NAMES: [&'static str; Action::COUNT] = [
        "Up",
        "Down",
        "Left",
        "Right",
        "Up-Left",
        "Up-Right",
        "Down-Left",
        "Down-Right",
    ];

    /// Returns all actions in canonical order.
    pub fn all() -> [Action; Action::COUNT] {
        Self::ALL
    }

    /// Returns the index of this action in canonical order.
    pub fn index(&self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
            Action::UpLeft => 4,
            Action::UpRight => 5,
            Action::DownLeft => 6,
            Action::DownRight => 7,
        }
    }

    /// Inverse of [`Action::index`].
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// `(Δrow, Δcol)` applied by this action.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::UpLeft => (-1, -1),
            Action::UpRight => (-1, 1),
            Action::DownLeft => (1, -1),
            Action::DownRight => (1, 1),
        }
    }

    /// Export column name of this action.
    pub fn name(&self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A grid cell `(row, col)`.
///
/// Coordinates are signed so that a proposal stepping off the grid is still a
/// representable value; whether it lies inside `[0, grid_size)` is a question
/// for [`crate::world::GridWorld::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a new position.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell reached by applying `action` from here. No bounds check.
    pub fn offset(&self, action: Action) -> Position {
        let (dr, dc) = action.offset();
        Position::new(self.row + dr, self.col + dc)
    }

    /// Number of king moves between two cells.
    pub fn chebyshev_distance(&self, other: &Position) -> u32 {
        let dr = (self.row - other.row).unsigned_abs();
        let dc = (self.col - other.col).unsigned_abs();
        dr.max(dc)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
