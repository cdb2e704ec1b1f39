//! Terrain grid and the passability, vision and line-of-sight queries built on it.

use skirmish_core::{CellCoord, CellKind};
use thiserror::Error;

/// Errors raised while assembling a terrain grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
    /// The board must contain at least one cell.
    #[error("terrain board must have a non-zero size")]
    EmptyBoard,
    /// The supplied cells do not fill a square board.
    #[error("expected {expected} terrain cells, got {actual}")]
    CellCountMismatch {
        /// Cells required for the declared board size.
        expected: usize,
        /// Cells actually supplied.
        actual: usize,
    },
    /// A textual row has a different width than the board.
    #[error("terrain row {row} has {width} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Width found in the row.
        width: usize,
        /// Width required by the board.
        expected: usize,
    },
    /// A textual row contains a character with no terrain meaning.
    #[error("unknown terrain glyph {glyph:?}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
    },
}

/// Square grid of terrain classifications stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    size: u32,
    cells: Vec<CellKind>,
}

impl TerrainGrid {
    /// Creates an open board of `size` by `size` empty cells.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let count = usize::try_from(size).unwrap_or(0).pow(2);
        Self {
            size,
            cells: vec![CellKind::Empty; count],
        }
    }

    /// Wraps an existing row-major cell buffer.
    pub fn from_cells(size: u32, cells: Vec<CellKind>) -> Result<Self, TerrainError> {
        if size == 0 {
            return Err(TerrainError::EmptyBoard);
        }
        let expected = usize::try_from(size).unwrap_or(usize::MAX).saturating_pow(2);
        if cells.len() != expected {
            return Err(TerrainError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Parses a square board from text rows.
    ///
    /// `.` is empty, `#` rock, `T` tree, `~` water, `A` ammo depot and `M`
    /// medical depot.
    pub fn from_rows(rows: &[&str]) -> Result<Self, TerrainError> {
        let expected = rows.len();
        let mut cells = Vec::with_capacity(expected * expected);
        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != expected {
                return Err(TerrainError::RaggedRow {
                    row,
                    width,
                    expected,
                });
            }
            for glyph in line.chars() {
                cells.push(match glyph {
                    '.' => CellKind::Empty,
                    '#' => CellKind::Rock,
                    'T' => CellKind::Tree,
                    '~' => CellKind::Water,
                    'A' => CellKind::SupplyAmmo,
                    'M' => CellKind::SupplyMed,
                    other => return Err(TerrainError::UnknownGlyph { glyph: other }),
                });
            }
        }
        let size = u32::try_from(expected).map_err(|_| TerrainError::EmptyBoard)?;
        Self::from_cells(size, cells)
    }

    /// Number of cells along each side of the board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Whether `cell` lies on the board.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.is_within(self.size)
    }

    /// Classification of `cell`, or `None` off the board.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Overwrites the classification of `cell`; off-board writes are ignored.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = kind;
        }
    }

    /// Whether an agent may occupy `cell`. Off-board cells are never passable.
    #[must_use]
    pub fn passable(&self, cell: CellCoord) -> bool {
        self.kind(cell).is_some_and(CellKind::is_passable)
    }

    /// Whether `cell` interrupts sight lines. Off-board cells never do.
    #[must_use]
    pub fn blocks_vision(&self, cell: CellCoord) -> bool {
        self.kind(cell).is_some_and(CellKind::blocks_vision)
    }

    /// Whether a cardinal neighbour of `cell` offers cover.
    #[must_use]
    pub fn has_adjacent_cover(&self, cell: CellCoord) -> bool {
        cell.cardinal_neighbors()
            .into_iter()
            .any(|neighbor| self.kind(neighbor).is_some_and(CellKind::is_cover))
    }

    /// Traces a Bresenham line from `from` to `to`.
    ///
    /// Only intermediate cells are tested, so either endpoint may itself be
    /// opaque.
    #[must_use]
    pub fn line_of_sight(&self, from: CellCoord, to: CellCoord) -> bool {
        if from == to {
            return true;
        }

        let delta_columns = (to.column() - from.column()).abs();
        let delta_rows = (to.row() - from.row()).abs();
        let step_column = if from.column() < to.column() { 1 } else { -1 };
        let step_row = if from.row() < to.row() { 1 } else { -1 };
        let mut error = delta_columns - delta_rows;
        let (mut row, mut column) = (from.row(), from.column());

        loop {
            let doubled = 2 * error;
            if doubled > -delta_rows {
                error -= delta_rows;
                column += step_column;
            }
            if doubled < delta_columns {
                error += delta_columns;
                row += step_row;
            }

            let cell = CellCoord::new(row, column);
            if cell == to {
                return true;
            }
            if self.blocks_vision(cell) {
                return false;
            }
        }
    }

    /// Iterates every cell in row-major order with its classification.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let size = i32::try_from(self.size).unwrap_or(0);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = i32::try_from(index).unwrap_or(i32::MAX);
            (CellCoord::new(index / size, index % size), *kind)
        })
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        index_of(self.size, cell)
    }
}

/// Row-major index of `cell` on a board of `size` cells per side.
pub(crate) fn index_of(size: u32, cell: CellCoord) -> Option<usize> {
    if !cell.is_within(size) {
        return None;
    }
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let width = usize::try_from(size).ok()?;
    Some(row * width + column)
}
