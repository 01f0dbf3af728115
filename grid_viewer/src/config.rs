// config.rs - Command line / environment configuration

use std::time::Duration;

use chain_reader::{DEFAULT_CHUNK_SIZE, MULTICALL3_ADDRESS};
use clap::Parser;
use grid_rules::{Address, AddressParseError, CELL_COUNT};
use thiserror::Error;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "clawstrophobia",
    version,
    about = "Read-only viewer for the Clawstrophobia grid game"
)]
pub struct Args {
    /// Game contract address. Without it the viewer only shows setup instructions.
    #[arg(long, env = "GAME_ADDRESS")]
    pub game_address: Option<String>,

    /// JSON-RPC endpoint of the chain the game is deployed on.
    #[arg(long, env = "RPC_URL", default_value = "https://mainnet.base.org")]
    pub rpc_url: String,

    /// Multicall3 contract used to batch the per-cell reads.
    #[arg(long, env = "MULTICALL_ADDRESS")]
    pub multicall_address: Option<String>,

    /// Seconds between automatic refreshes.
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 15)]
    pub poll_interval_secs: u64,

    /// Cells read per multicall batch.
    #[arg(long, env = "CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Fetch once and print the board instead of opening a window.
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {source}")]
    Address {
        field: &'static str,
        #[source]
        source: AddressParseError,
    },
    #[error("poll interval must be at least one second")]
    PollInterval,
    #[error("chunk size must be between 1 and 10000, got {0}")]
    ChunkSize(usize),
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub game_address: Option<Address>,
    pub rpc_url: String,
    pub multicall_address: Address,
    pub poll_interval: Duration,
    pub chunk_size: usize,
    pub headless: bool,
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|source| ConfigError::Address { field, source })
}

impl TryFrom<Args> for ViewerConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        // An empty GAME_ADDRESS counts as unset
        let game_address = match args.game_address.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(value) => Some(parse_address("game address", value)?),
        };
        let multicall_address = match args.multicall_address.as_deref() {
            Some(value) => parse_address("multicall address", value)?,
            None => MULTICALL3_ADDRESS,
        };
        if args.poll_interval_secs == 0 {
            return Err(ConfigError::PollInterval);
        }
        if args.chunk_size == 0 || args.chunk_size > CELL_COUNT {
            return Err(ConfigError::ChunkSize(args.chunk_size));
        }

        Ok(Self {
            game_address,
            rpc_url: args.rpc_url,
            multicall_address,
            poll_interval: Duration::from_secs(args.poll_interval_secs),
            chunk_size: args.chunk_size,
            headless: args.headless,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const GAME: &str = "0x1111111111111111111111111111111111111111";

    // Built directly so GAME_ADDRESS / CHUNK_SIZE / ... in the environment can't leak in
    fn args() -> Args {
        Args {
            game_address: Some(GAME.to_string()),
            rpc_url: "http://localhost:8545".to_string(),
            multicall_address: None,
            poll_interval_secs: 15,
            chunk_size: DEFAULT_CHUNK_SIZE,
            headless: false,
        }
    }

    fn declared_default(id: &str) -> String {
        let command = Args::command();
        let arg = command.get_arguments().find(|a| a.get_id() == id).unwrap();
        arg.get_default_values().iter().map(|v| v.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn declared_defaults() {
        assert_eq!(declared_default("rpc_url"), "https://mainnet.base.org");
        assert_eq!(declared_default("poll_interval_secs"), "15");
        assert_eq!(declared_default("chunk_size"), "500");
        assert_eq!(declared_default("multicall_address"), "");
    }

    #[test]
    fn missing_multicall_falls_back_to_canonical() {
        let cfg = ViewerConfig::try_from(args()).unwrap();
        assert_eq!(cfg.game_address, Some(GAME.parse().unwrap()));
        assert_eq!(cfg.multicall_address, MULTICALL3_ADDRESS);
        assert_eq!(cfg.poll_interval, Duration::from_secs(15));
        assert_eq!(cfg.chunk_size, 500);
        assert!(!cfg.headless);
    }

    #[test]
    fn every_flag_on_the_command_line() {
        let parsed = Args::try_parse_from([
            "clawstrophobia",
            "--game-address", GAME,
            "--rpc-url", "http://localhost:8545",
            "--multicall-address", "0x2222222222222222222222222222222222222222",
            "--poll-interval-secs", "30",
            "--chunk-size", "250",
            "--headless",
        ])
        .unwrap();
        let cfg = ViewerConfig::try_from(parsed).unwrap();
        assert_eq!(cfg.rpc_url, "http://localhost:8545");
        assert_eq!(cfg.multicall_address, Address([0x22; 20]));
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.chunk_size, 250);
        assert!(cfg.headless);
    }

    #[test]
    fn blank_game_address_is_unset() {
        let cfg = ViewerConfig::try_from(Args { game_address: Some("  ".into()), ..args() }).unwrap();
        assert!(cfg.game_address.is_none());
        let cfg = ViewerConfig::try_from(Args { game_address: None, ..args() }).unwrap();
        assert!(cfg.game_address.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ViewerConfig::try_from(Args { game_address: Some("0x1234".into()), ..args() }),
            Err(ConfigError::Address { field: "game address", .. })
        ));
        assert!(matches!(
            ViewerConfig::try_from(Args { multicall_address: Some("nope".into()), ..args() }),
            Err(ConfigError::Address { field: "multicall address", .. })
        ));
        assert!(matches!(
            ViewerConfig::try_from(Args { poll_interval_secs: 0, ..args() }),
            Err(ConfigError::PollInterval)
        ));
        assert!(matches!(
            ViewerConfig::try_from(Args { chunk_size: 0, ..args() }),
            Err(ConfigError::ChunkSize(0))
        ));
        assert!(matches!(
            ViewerConfig::try_from(Args { chunk_size: 10_001, ..args() }),
            Err(ConfigError::ChunkSize(10_001))
        ));
    }
}
