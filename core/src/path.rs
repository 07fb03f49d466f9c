//! Grid dimensions and the validated enemy path.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, CellPoint};

/// Fixed dimensions of the play field measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Defects that make a level path unusable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path has fewer than two cells.
    #[error("level path must have at least 2 cells, found {len}")]
    TooShort {
        /// Number of cells supplied.
        len: usize,
    },
    /// A path cell lies outside the grid.
    #[error("path cell out of bounds at index {index}: ({}, {})", cell.column(), cell.row())]
    OutOfBounds {
        /// Position of the offending cell within the path.
        index: usize,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A cell appears twice in the path.
    #[error("duplicate cell in path at index {index}: ({}, {})", cell.column(), cell.row())]
    Duplicate {
        /// Position of the repeated cell within the path.
        index: usize,
        /// Repeated cell.
        cell: CellCoord,
    },
    /// Two consecutive cells are not orthogonal neighbours.
    #[error(
        "non-adjacent path step at index {index}: ({}, {}) -> ({}, {})",
        from.column(), from.row(), to.column(), to.row()
    )]
    NonAdjacent {
        /// Position of the step's first cell within the path.
        index: usize,
        /// Cell the step leaves.
        from: CellCoord,
        /// Cell the step enters.
        to: CellCoord,
    },
}

/// Checks that `cells` forms a usable path on `grid`.
///
/// A path is accepted iff it has at least two cells, every cell is in bounds,
/// no cell repeats, and every consecutive pair is Manhattan-adjacent.
pub fn validate_path(grid: GridSize, cells: &[CellCoord]) -> Result<(), PathError> {
    if cells.len() < 2 {
        return Err(PathError::TooShort { len: cells.len() });
    }

    let mut seen = HashSet::with_capacity(cells.len());
    for (index, &cell) in cells.iter().enumerate() {
        if !grid.contains(cell) {
            return Err(PathError::OutOfBounds { index, cell });
        }

        if !seen.insert(cell) {
            return Err(PathError::Duplicate { index, cell });
        }

        if index > 0 {
            let from = cells[index - 1];
            if from.manhattan_distance(cell) != 1 {
                return Err(PathError::NonAdjacent {
                    index: index - 1,
                    from,
                    to: cell,
                });
            }
        }
    }

    Ok(())
}

/// Ordered, validated sequence of cells that enemies traverse.
///
/// The path is immutable once built and keeps a set of its cells so occupancy
/// checks run in constant time whatever the grid size.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    cells: Vec<CellCoord>,
    members: HashSet<CellCoord>,
}

impl Path {
    /// Validates `cells` against `grid` and builds the path.
    pub fn new(grid: GridSize, cells: Vec<CellCoord>) -> Result<Self, PathError> {
        validate_path(grid, &cells)?;

        let members = cells.iter().copied().collect();
        Ok(Self { cells, members })
    }

    /// Ordered cells composing the path.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the path has no cells. Validated paths never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Progress value at which an enemy reaches the final cell.
    #[must_use]
    pub fn max_progress(&self) -> f32 {
        self.cells.len().saturating_sub(1) as f32
    }

    /// Reports whether the cell belongs to the path.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.members.contains(&cell)
    }

    /// Continuous position for a fractional progress value.
    ///
    /// The integer part of `progress` indexes the path and the fractional part
    /// interpolates toward the next cell's centre. Values outside
    /// `[0, max_progress]` are clamped.
    #[must_use]
    pub fn position_at(&self, progress: f32) -> CellPoint {
        let Some(last) = self.cells.len().checked_sub(1) else {
            return CellPoint::default();
        };

        let clamped = progress.clamp(0.0, last as f32);
        let index = (clamped.floor() as usize).min(last);
        let t = clamped - index as f32;

        let from = CellPoint::center_of(self.cells[index]);
        let to = CellPoint::center_of(self.cells[(index + 1).min(last)]);
        from.lerp(to, t)
    }
}
