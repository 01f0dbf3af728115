// lib.rs - Read-only access to the Clawstrophobia game contract

pub mod abi;    // Solidity ABI codec for the calls we make
pub mod error;  // ChainError
pub mod poller; // Background refresh loop
pub mod reader; // Game state + batched occupancy fetch
pub mod rpc;    // JSON-RPC eth_call transport

pub use error::{AbiError, ChainError};
pub use poller::{PollCommand, PollStatus, PollerHandle, Snapshot, spawn_poller};
pub use reader::{DEFAULT_CHUNK_SIZE, GameReader, GameSource, MULTICALL3_ADDRESS};
pub use rpc::RpcClient;
