// bounds.rs - Playable region predicates
//
// The playable region is the inclusive rectangle [min_x, max_x] x [min_y, max_y],
// clipped to the fixed grid. Inverted bounds are not validated; they simply
// produce an empty region.

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, GRID_SIZE};

/// True when `(x, y)` is on the grid and inside the inclusive bounds.
pub fn is_playable(x: i64, y: i64, min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> bool {
    if !(0..GRID_SIZE).contains(&x) || !(0..GRID_SIZE).contains(&y) {
        return false;
    }
    x >= min_x && x <= max_x && y >= min_y && y <= max_y
}

/// True when `(x, y)` is playable and sits on an edge of a region that can
/// still shrink.
pub fn is_danger(x: i64, y: i64, min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> bool {
    if !is_playable(x, y, min_x, max_x, min_y, max_y) {
        return false;
    }
    if min_x == max_x && min_y == max_y {
        return false; // last cell standing
    }
    x == min_x || x == max_x || y == min_y || y == max_y
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl Bounds {
    pub const fn new(min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    /// The whole board, as at the start of a game.
    pub const fn full() -> Self {
        Self::new(0, GRID_SIZE - 1, 0, GRID_SIZE - 1)
    }

    pub fn is_playable(&self, cell: Cell) -> bool {
        is_playable(cell.x, cell.y, self.min_x, self.max_x, self.min_y, self.max_y)
    }

    pub fn is_danger(&self, cell: Cell) -> bool {
        is_danger(cell.x, cell.y, self.min_x, self.max_x, self.min_y, self.max_y)
    }

    pub fn is_single_cell(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }

    /// Number of playable cells after clipping to the grid.
    pub fn playable_cells(&self) -> usize {
        let span = |lo: i64, hi: i64| {
            let lo = lo.max(0);
            let hi = hi.min(GRID_SIZE - 1);
            if hi < lo { 0 } else { (hi - lo + 1) as usize }
        };
        span(self.min_x, self.max_x) * span(self.min_y, self.max_y)
    }

    /// `min_x-max_x × min_y-max_y`, as shown in the stats line.
    pub fn summary(&self) -> String {
        format!("{}-{} × {}-{}", self.min_x, self.max_x, self.min_y, self.max_y)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_interior() {
        let b = Bounds::new(2, 5, 2, 5);
        assert!(b.is_playable(Cell::new(2, 3)));
        assert!(b.is_danger(Cell::new(2, 3)));
        assert!(b.is_playable(Cell::new(3, 3)));
        assert!(!b.is_danger(Cell::new(3, 3)));
        assert!(!b.is_playable(Cell::new(6, 3)));
        assert!(!b.is_danger(Cell::new(6, 3)));
    }

    #[test]
    fn negative_coordinates_are_never_playable() {
        assert!(!is_playable(-1, 0, -10, 10, -10, 10));
        assert!(!is_playable(0, -1, -10, 10, -10, 10));
        assert!(is_playable(0, 0, -10, 10, -10, 10));
    }

    #[test]
    fn bounds_beyond_the_grid_are_clipped() {
        let b = Bounds::new(90, 150, 0, 99);
        assert!(b.is_playable(Cell::new(99, 50)));
        assert!(!b.is_playable(Cell::new(100, 50)));
        // max_x lies off-grid, so column 99 is only dangerous via the y edges
        assert!(!b.is_danger(Cell::new(99, 50)));
        assert!(b.is_danger(Cell::new(99, 0)));
        assert_eq!(b.playable_cells(), 10 * 100);
    }

    #[test]
    fn inverted_bounds_are_empty() {
        let b = Bounds::new(5, 4, 0, 99);
        assert_eq!(b.playable_cells(), 0);
        assert!(!b.is_playable(Cell::new(4, 0)));
        assert!(!b.is_playable(Cell::new(5, 0)));
    }

    #[test]
    fn thin_strip_is_all_danger() {
        // one column, many rows: every cell touches min_x and max_x
        let b = Bounds::new(7, 7, 10, 20);
        assert!(!b.is_single_cell());
        assert!((10..=20).all(|y| b.is_danger(Cell::new(7, y))));
    }

    #[test]
    fn summary_format() {
        assert_eq!(Bounds::new(2, 5, 3, 9).summary(), "2-5 × 3-9");
        assert_eq!(Bounds::full().playable_cells(), 10_000);
    }
}
