//! Per-agent and per-team visibility masks.

use skirmish_core::CellCoord;

use crate::terrain::{index_of, TerrainGrid};

/// Dense boolean mask marking the cells an observer can currently see.
///
/// Masks are rebuilt from scratch every tick; nothing carries over between
/// recomputations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityMask {
    size: u32,
    cells: Vec<bool>,
}

impl VisibilityMask {
    /// Creates an empty mask covering a board of `size` cells per side.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let count = usize::try_from(size).unwrap_or(0).pow(2);
        Self {
            size,
            cells: vec![false; count],
        }
    }

    /// Clears every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Marks `cell` as visible; off-board cells are ignored.
    pub fn mark(&mut self, cell: CellCoord) {
        if let Some(index) = index_of(self.size, cell) {
            self.cells[index] = true;
        }
    }

    /// Whether `cell` is currently visible.
    #[must_use]
    pub fn is_visible(&self, cell: CellCoord) -> bool {
        index_of(self.size, cell).is_some_and(|index| self.cells[index])
    }

    /// Number of visible cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|visible| **visible).count()
    }

    /// ORs another mask of the same board into this one.
    pub fn merge(&mut self, other: &VisibilityMask) {
        if other.size != self.size {
            return;
        }
        for (mine, theirs) in self.cells.iter_mut().zip(&other.cells) {
            *mine |= *theirs;
        }
    }

    /// Recomputes the mask for an observer standing on `origin`.
    ///
    /// The observer always sees its own cell. Every other cell within the
    /// Euclidean `radius` is visible when a clear line of sight reaches it.
    pub fn recompute(&mut self, terrain: &TerrainGrid, origin: CellCoord, radius: u32) {
        if self.size != terrain.size() {
            *self = Self::new(terrain.size());
        } else {
            self.clear();
        }
        self.mark(origin);

        let reach = i32::try_from(radius).unwrap_or(i32::MAX);
        let limit = radius.saturating_mul(radius);
        for rows in -reach..=reach {
            for columns in -reach..=reach {
                let cell = origin.offset(rows, columns);
                if !terrain.in_bounds(cell) || origin.distance_squared(cell) > limit {
                    continue;
                }
                if terrain.line_of_sight(origin, cell) {
                    self.mark(cell);
                }
            }
        }
    }
}
