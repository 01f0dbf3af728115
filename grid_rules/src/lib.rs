// lib.rs - Cell rules for the Clawstrophobia grid
//
// Everything in here is pure: bounds predicates, the game snapshot model,
// per-cell classification and the number formatting used by the viewer.

pub mod bounds;   // Playable / danger predicates
pub mod classify; // Cell styling labels
pub mod format;   // Countdown and pool formatting
pub mod grid;     // Grid constants and coordinates
pub mod state;    // Game snapshot model

pub use bounds::{Bounds, is_danger, is_playable};
pub use classify::{CellClass, CellStyle, classify, hover_text};
pub use grid::{CELL_COUNT, Cell, GRID_SIZE};
pub use state::{Address, AddressParseError, GameState, Occupancy};
