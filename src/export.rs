//! Value-table export for external collaborators.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Action, Position};
use crate::value_table::ValueTable;
use crate::AgentId;

/// One agent's value table as a `grid_size² × 8` matrix.
///
/// Rows follow row-major cell order (`row * grid_size + col`); columns follow
/// [`Action::NAMES`]. This is the layout a spreadsheet writer puts on one
/// sheet per agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValueTableExport {
    pub agent: AgentId,
    pub grid_size: usize,
    pub columns: Vec<String>,
    pub rows: Vec<[f64; Action::COUNT]>,
}

impl ValueTableExport {
    pub fn from_table(agent: AgentId, table: &ValueTable) -> Self {
        let rows = table
            .as_slice()
            .chunks_exact(Action::COUNT)
            .map(|chunk| {
                let mut row = [0.0; Action::COUNT];
                row.copy_from_slice(chunk);
                row
            })
            .collect();
        Self {
            agent,
            grid_size: table.grid_size(),
            columns: Action::NAMES.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    /// Sheet name used by spreadsheet writers.
    pub fn sheet_name(&self) -> String {
        format!("agent_{}", self.agent)
    }

    /// Row of a given cell.
    pub fn row_for(&self, cell: Position) -> Option<&[f64; Action::COUNT]> {
        if cell.row < 0 || cell.col < 0 {
            return None;
        }
        let (r, c) = (cell.row as usize, cell.col as usize);
        if r >= self.grid_size || c >= self.grid_size {
            return None;
        }
        self.rows.get(r * self.grid_size + c)
    }

    /// Comma-separated rendering with a header line.
    pub fn to_csv(&self) -> String {
        let mut out = self.columns.join(",");
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_column_order() {
        let table = ValueTable::new(3, 0.1, 0.9);
        let export = ValueTableExport::from_table(4, &table);
        assert_eq!(export.rows.len(), 9);
        assert_eq!(export.columns[0], "Up");
        assert_eq!(export.columns[7], "Down-Right");
        assert_eq!(export.sheet_name(), "agent_4");
    }

    #[test]
    fn rows_are_row_major() {
        let mut table = ValueTable::new(3, 0.1, 0.9);
        table.set(Position::new(1, 2), Action::Left, 2.5);
        let export = ValueTableExport::from_table(0, &table);
        assert_eq!(export.rows[5][Action::Left.index()], 2.5);
        assert_eq!(export.row_for(Position::new(1, 2)), Some(&export.rows[5]));
        assert_eq!(export.row_for(Position::new(3, 0)), None);
    }

    #[test]
    fn csv_has_header_and_one_line_per_cell() {
        let table = ValueTable::new(2, 0.1, 0.9);
        let csv = ValueTableExport::from_table(0, &table).to_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "Up,Down,Left,Right,Up-Left,Up-Right,Down-Left,Down-Right"
        );
        assert_eq!(lines[1], "0,0,0,0,0,0,0,0");
    }
}
