// main.rs - Clawstrophobia grid viewer
//
// Polls the game contract in the background and paints the 100x100 board:
// playable cells, the danger ring that goes next, agents and the eliminated
// outside.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;
use tracing::info;

mod app;    // Viewer state and palette
mod config; // CLI / env configuration
mod text;   // Headless text output
mod ui;     // egui rendering

use app::GridViewer;
use config::{Args, ViewerConfig};

fn main() -> Result<()> {
    init_tracing();
    let config = ViewerConfig::try_from(Args::parse()).context("invalid configuration")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    if config.headless {
        return runtime.block_on(text::run_headless(&config));
    }

    let viewer = GridViewer::new(&config, runtime).context("failed to set up chain reader")?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 1080.0]),
        ..Default::default()
    };

    info!("opening viewer window");
    eframe::run_native(
        "Clawstrophobia",
        options,
        Box::new(|_cc| Box::new(viewer)),
    )
    .map_err(|e| anyhow!("viewer window failed: {e}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
