// grid.rs - Grid constants and cell coordinates

use serde::{Deserialize, Serialize};

// Fixed board size (100x100 cells, coordinates 0..GRID_SIZE on both axes)
pub const GRID_SIZE: i64 = 100;
pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// A cell coordinate. Components are signed so that out-of-range input can be
/// represented and rejected by the predicates instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
}

impl Cell {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn in_grid(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    /// Row-major position of the cell, `None` when it lies off the grid.
    pub fn index(&self) -> Option<usize> {
        self.in_grid().then(|| (self.y * GRID_SIZE + self.x) as usize)
    }

    /// Inverse of [`Cell::index`]: `x = i % 100`, `y = i / 100`.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < CELL_COUNT).then(|| {
            let i = index as i64;
            Self::new(i % GRID_SIZE, i / GRID_SIZE)
        })
    }
}

/// Every grid cell in row-major order.
pub fn all_cells() -> impl Iterator<Item = Cell> {
    (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
}
