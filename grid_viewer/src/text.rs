// text.rs - Headless rendering: one fetch, printed as text

use anyhow::{Context, Result};
use chain_reader::{GameReader, GameSource, RpcClient, Snapshot};
use grid_rules::format::{format_countdown, format_eth, format_tokens};
use grid_rules::grid::all_cells;
use grid_rules::{Address, CellClass, CellStyle, GRID_SIZE, GameState, classify};

use crate::app::unix_now;
use crate::config::ViewerConfig;

pub fn cell_glyph(style: CellStyle) -> char {
    if style.occupied {
        return '@';
    }
    match style.class {
        CellClass::Danger => '!',
        CellClass::Playable => '.',
        CellClass::Outside => ' ',
    }
}

/// Same fields as the window's stats row.
pub fn stats_line(state: &GameState, agents: usize, now_secs: u64) -> String {
    format!(
        "Game #{} | Bounds {} | Next edge {} | ETH pool {} | $CLAWSTROPHOBIA pool {} | Agents {}",
        state.game_id,
        state.bounds.summary(),
        format_countdown(state.seconds_until_next(now_secs)),
        format_eth(state.eth_pool),
        format_tokens(state.token_pool),
        agents,
    )
}

/// The board as `GRID_SIZE` lines of `GRID_SIZE` glyphs, row 0 first.
pub fn render_board(snapshot: &Snapshot) -> String {
    let mut out = String::with_capacity(((GRID_SIZE + 1) * GRID_SIZE) as usize);
    for cell in all_cells() {
        let occupied = snapshot.occupancy.is_occupied(cell);
        out.push(cell_glyph(classify(cell, Some(&snapshot.state.bounds), occupied)));
        if cell.x == GRID_SIZE - 1 {
            out.push('\n');
        }
    }
    out
}

/// Headless mode has no instructions screen to fall back on.
pub fn headless_target(config: &ViewerConfig) -> Result<Address> {
    config
        .game_address
        .context("GAME_ADDRESS is required in headless mode")
}

pub async fn run_headless(config: &ViewerConfig) -> Result<()> {
    let game = headless_target(config)?;
    let rpc = RpcClient::new(config.rpc_url.clone()).context("failed to build RPC client")?;
    let reader = GameReader::new(rpc, game)
        .with_multicall(config.multicall_address)
        .with_chunk_size(config.chunk_size);

    let snapshot = reader
        .fetch_snapshot()
        .await
        .with_context(|| format!("failed to read game {game} via {}", config.rpc_url))?;

    println!("{}", stats_line(&snapshot.state, snapshot.occupancy.len(), unix_now()));
    print!("{}", render_board(&snapshot));
    Ok(())
}
