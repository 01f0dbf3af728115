// app.rs - Viewer state: palette, poller handle and the runtime that drives it

use std::time::{SystemTime, UNIX_EPOCH};

use chain_reader::{ChainError, GameReader, PollStatus, PollerHandle, RpcClient, spawn_poller};
use egui::Color32;
use grid_rules::{CellClass, CellStyle};
use tracing::{info, warn};

use crate::config::ViewerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub playable: Color32,
    pub danger: Color32,
    pub agent: Color32,
    pub outside: Color32,
    pub background: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            playable: Color32::from_rgb(34, 120, 70),
            danger: Color32::from_rgb(230, 70, 50),
            agent: Color32::from_rgb(250, 210, 60),
            outside: Color32::from_rgb(40, 40, 40),
            background: Color32::BLACK,
        }
    }
}

impl Palette {
    /// Fill colour for a cell. Danger cells pulse between full and dimmed red.
    pub fn fill(&self, style: CellStyle, blink_on: bool) -> Color32 {
        if style.occupied {
            return self.agent;
        }
        match style.class {
            CellClass::Outside => self.outside,
            CellClass::Playable => self.playable,
            CellClass::Danger if blink_on => self.danger,
            CellClass::Danger => self.danger.linear_multiply(0.45),
        }
    }
}

pub struct GridViewer {
    pub palette: Palette,
    pub box_size: f32,
    pub spacing: f32,
    // Declared before the runtime so the task is aborted while the runtime still exists
    poller: Option<PollerHandle>,
    _runtime: tokio::runtime::Runtime,
}

impl GridViewer {
    pub fn new(config: &ViewerConfig, runtime: tokio::runtime::Runtime) -> Result<Self, ChainError> {
        let poller = match config.game_address {
            Some(game) => {
                let rpc = RpcClient::new(config.rpc_url.clone())?;
                let reader = GameReader::new(rpc, game)
                    .with_multicall(config.multicall_address)
                    .with_chunk_size(config.chunk_size);
                info!(%game, rpc_url = %config.rpc_url, "watching game contract");
                Some(spawn_poller(runtime.handle(), reader, config.poll_interval))
            }
            None => {
                warn!("GAME_ADDRESS is not set, nothing to poll");
                None
            }
        };

        Ok(Self {
            palette: Palette::default(),
            box_size: 8.0,
            spacing: 1.0,
            poller,
            _runtime: runtime,
        })
    }

    /// `None` when no contract is configured.
    pub fn status(&self) -> Option<PollStatus> {
        self.poller.as_ref().map(PollerHandle::status)
    }

    pub fn request_refresh(&self) {
        if let Some(poller) = &self.poller {
            if !poller.request_refresh() {
                warn!("refresh request dropped, poller is busy or stopped");
            }
        }
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
