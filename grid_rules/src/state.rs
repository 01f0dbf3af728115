// state.rs - Game snapshot model

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bounds::Bounds;
use crate::grid::Cell;

/// Global game state as reported by `getGameState()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: u64,
    pub bounds: Bounds,
    pub last_advance_at: u64, // unix seconds
    pub eth_pool: u128,       // wei
    pub token_pool: u128,     // token base units (18 decimals)
    pub next_advance_at: u64, // unix seconds
}

impl GameState {
    /// Seconds left before the next edge is removed, never negative.
    pub fn seconds_until_next(&self, now_secs: u64) -> u64 {
        self.next_advance_at.saturating_sub(now_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("expected 40 hex digits, got {0}")]
    Length(usize),
    #[error("invalid hex: {0}")]
    Hex(String),
}

/// 20-byte account address, used for agents and contracts alike. The zero
/// address marks an empty cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0; 20]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// First eight characters of the `0x` form, e.g. `0xab12cd`.
    pub fn short(&self) -> String {
        let mut full = self.to_string();
        full.truncate(8);
        full
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        if digits.len() != 40 {
            return Err(AddressParseError::Length(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressParseError::Hex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

/// Which agent sits on which cell. Empty cells are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    agents: HashMap<Cell, Address>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `agent` at `cell`; the zero address clears the cell instead.
    pub fn insert(&mut self, cell: Cell, agent: Address) {
        if agent.is_zero() {
            self.agents.remove(&cell);
        } else {
            self.agents.insert(cell, agent);
        }
    }

    pub fn get(&self, cell: Cell) -> Option<&Address> {
        self.agents.get(&cell)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.agents.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl FromIterator<(Cell, Address)> for Occupancy {
    fn from_iter<T: IntoIterator<Item = (Cell, Address)>>(iter: T) -> Self {
        let mut occupancy = Self::new();
        for (cell, agent) in iter {
            occupancy.insert(cell, agent);
        }
        occupancy
    }
}
