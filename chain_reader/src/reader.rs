// reader.rs - Game state and per-cell occupancy reads

use std::future::Future;
use std::time::{Instant, SystemTime};

use grid_rules::{Address, CELL_COUNT, Cell, GameState, Occupancy};
use tracing::debug;

use crate::abi::{self, Call3};
use crate::error::{AbiError, ChainError};
use crate::rpc::CallTransport;

/// Canonical Multicall3 deployment, same address on every EVM chain.
pub const MULTICALL3_ADDRESS: Address = Address([
    0xca, 0x11, 0xbd, 0xe0, 0x59, 0x77, 0xb3, 0x63, 0x11, 0x67,
    0x02, 0x88, 0x62, 0xbe, 0x2a, 0x17, 0x39, 0x76, 0xca, 0x11,
]);

/// getAgentAt calls per aggregate3 batch
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Everything the viewer needs for one frame of the board.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: GameState,
    pub occupancy: Occupancy,
    pub fetched_at: SystemTime,
}

/// Source of complete board snapshots, polled by the background loop.
pub trait GameSource: Send + Sync {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, ChainError>> + Send;
}

pub struct GameReader<T> {
    transport: T,
    contract: Address,
    multicall: Address,
    chunk_size: usize,
}

impl<T: CallTransport> GameReader<T> {
    pub fn new(transport: T, contract: Address) -> Self {
        Self {
            transport,
            contract,
            multicall: MULTICALL3_ADDRESS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_multicall(mut self, multicall: Address) -> Self {
        self.multicall = multicall;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub async fn fetch_state(&self) -> Result<GameState, ChainError> {
        let raw = self.transport.call(&self.contract, abi::encode_get_game_state()).await?;
        Ok(abi::decode_game_state(&raw)?)
    }

    /// Reads every cell, row-major, `chunk_size` cells per aggregate3 batch.
    /// One failed sub-call fails the whole read.
    pub async fn fetch_occupancy(&self) -> Result<Occupancy, ChainError> {
        let calls: Vec<Call3> = (0..CELL_COUNT)
            .filter_map(Cell::from_index)
            .map(|cell| Call3 {
                target: self.contract,
                allow_failure: false,
                call_data: abi::encode_get_agent_at(cell.x as u64, cell.y as u64),
            })
            .collect();

        let mut occupancy = Occupancy::new();
        for (batch, chunk) in calls.chunks(self.chunk_size).enumerate() {
            let offset = batch * self.chunk_size;
            let raw = self.transport.call(&self.multicall, abi::encode_aggregate3(chunk)).await?;
            let results = abi::decode_aggregate3(&raw)?;
            if results.len() != chunk.len() {
                return Err(AbiError::Count { expected: chunk.len(), got: results.len() }.into());
            }

            for (i, result) in results.into_iter().enumerate() {
                let index = offset + i;
                if !result.success {
                    return Err(ChainError::CallFailed { index });
                }
                let agent = abi::decode_address(&result.return_data)?;
                if let Some(cell) = Cell::from_index(index) {
                    occupancy.insert(cell, agent);
                }
            }
            debug!(batch, cells = chunk.len(), "occupancy batch read");
        }
        Ok(occupancy)
    }
}

impl<T: CallTransport> GameSource for GameReader<T> {
    async fn fetch_snapshot(&self) -> Result<Snapshot, ChainError> {
        let started = Instant::now();
        let state = self.fetch_state().await?;
        let occupancy = self.fetch_occupancy().await?;
        debug!(
            game_id = state.game_id,
            agents = occupancy.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot fetched"
        );
        Ok(Snapshot { state, occupancy, fetched_at: SystemTime::now() })
    }
}
