//! Omniscient per-team threat estimate used to bias pathfinding.

use skirmish_core::CellCoord;

use crate::terrain::index_of;

/// Highest value a danger cell can hold.
pub const MAX_DANGER: u8 = 20;

/// Threat lost per cell of Manhattan distance from an enemy.
const FALLOFF_PER_CELL: u32 = 2;

/// Grid of threat scores derived from enemy positions.
///
/// Each living enemy contributes `max(0, 20 - 2 * distance)` to every cell;
/// contributions saturate at [`MAX_DANGER`]. The field is rebuilt from
/// scratch on every [`DangerField::recompute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DangerField {
    size: u32,
    values: Vec<u8>,
}

impl DangerField {
    /// Creates a zeroed field for a board of `size` cells per side.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let count = usize::try_from(size).unwrap_or(0).pow(2);
        Self {
            size,
            values: vec![0; count],
        }
    }

    /// Number of cells along each side of the field.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Rebuilds the field from the positions of living enemies.
    pub fn recompute<I>(&mut self, enemies: I)
    where
        I: IntoIterator<Item = CellCoord>,
    {
        self.values.fill(0);
        let reach = i32::from(MAX_DANGER) / 2;

        for enemy in enemies {
            for rows in -reach..=reach {
                let span = reach - rows.abs();
                for columns in -span..=span {
                    let cell = enemy.offset(rows, columns);
                    let Some(index) = index_of(self.size, cell) else {
                        continue;
                    };
                    let contribution = contribution(enemy.manhattan_distance(cell));
                    let value = &mut self.values[index];
                    *value = value.saturating_add(contribution).min(MAX_DANGER);
                }
            }
        }
    }

    /// Threat at `cell`; off-board cells report zero.
    #[must_use]
    pub fn value_at(&self, cell: CellCoord) -> u8 {
        index_of(self.size, cell).map_or(0, |index| self.values[index])
    }

    /// Raw threat values in row-major order.
    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

fn contribution(distance: u32) -> u8 {
    let falloff = distance.saturating_mul(FALLOFF_PER_CELL);
    let remaining = u32::from(MAX_DANGER).saturating_sub(falloff);
    u8::try_from(remaining).unwrap_or(MAX_DANGER)
}
