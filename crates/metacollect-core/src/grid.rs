//! Raster-position index over the capture grid.
//!
//! The grid is sparse: a missing `(col, row)` cell is an absent capture, not
//! an error. Bounds are the maximum column and row seen across all tiles.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::meta::{Direction, TileRecord};

/// Immutable lookup from raster position to tile index, with grid bounds.
#[derive(Debug, Clone)]
pub struct GridIndex {
    lookup: HashMap<(u32, u32), usize>,
    max_col: u32,
    max_row: u32,
}

impl GridIndex {
    /// Index the tile list by raster position.
    ///
    /// Two tiles sharing a position is a capture inconsistency and fails
    /// rather than letting the later tile shadow the earlier one.
    pub fn build(tiles: &[TileRecord]) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(tiles.len());
        let mut max_col = 0;
        let mut max_row = 0;

        for (idx, tile) in tiles.iter().enumerate() {
            let (col, row) = tile.raster_pos();
            if let Some(&prev) = lookup.get(&(col, row)) {
                let first: &TileRecord = &tiles[prev];
                return Err(Error::DuplicateRasterPos {
                    col,
                    row,
                    first: first.id().to_string(),
                    second: tile.id().to_string(),
                });
            }
            lookup.insert((col, row), idx);
            max_col = max_col.max(col);
            max_row = max_row.max(row);
        }

        Ok(Self {
            lookup,
            max_col,
            max_row,
        })
    }

    /// Maximum column index across all tiles.
    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    /// Maximum row index across all tiles.
    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Tile index occupying `(col, row)`, if any.
    pub fn tile_at(&self, col: u32, row: u32) -> Option<usize> {
        self.lookup.get(&(col, row)).copied()
    }

    /// Resolve the neighbor of the cell at `(col, row)` toward `direction`.
    ///
    /// Returns `Ok(None)` at a grid boundary or when the adjacent cell is
    /// unoccupied. `Invalid` and `Center` codes never resolve and are
    /// rejected outright.
    ///
    /// The RIGHT bound uses the grid-wide maximum column, not the per-row
    /// extent: a tile ending a short row still probes right and resolves to
    /// `None` on the empty cell. This mirrors the capture system's own
    /// boundary convention and is kept as-is.
    pub fn neighbor(&self, col: u32, row: u32, direction: Direction) -> Result<Option<usize>> {
        match direction {
            Direction::Left => {
                if col > 0 {
                    Ok(self.tile_at(col - 1, row))
                } else {
                    Ok(None)
                }
            }
            Direction::Right => {
                if col < self.max_col {
                    Ok(self.tile_at(col + 1, row))
                } else {
                    Ok(None)
                }
            }
            Direction::Top => {
                if row > 0 {
                    Ok(self.tile_at(col, row - 1))
                } else {
                    Ok(None)
                }
            }
            Direction::Invalid | Direction::Center => Err(Error::UnsupportedDirection {
                code: direction.into(),
            }),
        }
    }
}
