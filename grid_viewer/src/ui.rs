// ui.rs - egui rendering for the grid viewer

use std::time::Duration;

use chain_reader::{PollStatus, Snapshot};
use eframe::egui;
use egui::{Color32, Pos2, Rect, RichText, Stroke, Vec2};
use grid_rules::format::{format_countdown, format_eth, format_tokens};
use grid_rules::grid::all_cells;
use grid_rules::{Cell, CellClass, GRID_SIZE, classify, hover_text};

use crate::app::{GridViewer, unix_now};

const TITLE: &str = "Clawstrophobia";
// Danger fill flips on/off every half second, a full cycle per second
const BLINK_TOGGLES_PER_SEC: f64 = 2.0;

impl eframe::App for GridViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let status = self.status();

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(status) = status else {
                ui.heading(TITLE);
                ui.label("Set GAME_ADDRESS to view contract state.");
                return;
            };

            ui.heading(TITLE);
            self.stats_row(ui, &status);
            ui.separator();
            self.legend(ui);
            ui.separator();

            if status.loading {
                ui.label("Loading grid…");
            } else {
                let blink_on = blink_phase(ctx.input(|i| i.time));
                egui::ScrollArea::both().show(ui, |ui| {
                    self.draw_grid(ui, status.snapshot.as_deref(), blink_on);
                });
            }
        });

        // Countdown, blinking and poller updates all need a steady redraw
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl GridViewer {
    fn stats_row(&mut self, ui: &mut egui::Ui, status: &PollStatus) {
        ui.horizontal_wrapped(|ui| {
            if let Some(snapshot) = &status.snapshot {
                let state = &snapshot.state;
                ui.label("Game");
                ui.strong(format!("#{}", state.game_id));
                ui.separator();
                ui.label("Bounds");
                ui.strong(state.bounds.summary());
                ui.separator();
                ui.label("Next edge");
                ui.strong(format_countdown(state.seconds_until_next(unix_now())));
                ui.separator();
                ui.label("ETH pool");
                ui.strong(format_eth(state.eth_pool));
                ui.separator();
                ui.label("$CLAWSTROPHOBIA pool");
                ui.strong(format_tokens(state.token_pool));
                ui.separator();
                ui.label("Agents");
                ui.strong(snapshot.occupancy.len().to_string());
                ui.separator();
            }

            let label = if status.refreshing { "Refreshing…" } else { "Refresh" };
            if ui.add_enabled(!status.refreshing, egui::Button::new(label)).clicked() {
                self.request_refresh();
            }
        });

        if let Some(err) = &status.last_error {
            ui.label(RichText::new(format!("Last refresh failed: {err}")).color(Color32::from_rgb(220, 80, 80)));
        }
    }

    fn legend(&mut self, ui: &mut egui::Ui) {
        let entries = [
            (self.palette.danger, "Danger (blinks): move or risk elimination"),
            (self.palette.playable, "Playable"),
            (self.palette.agent, "Agent"),
            (self.palette.outside, "Outside (eliminated)"),
        ];
        ui.horizontal_wrapped(|ui| {
            for (color, text) in entries {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color);
                ui.label(text);
                ui.add_space(8.0);
            }
        });

        egui::CollapsingHeader::new("Colours").show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Playable:");
                ui.color_edit_button_srgba(&mut self.palette.playable);
                ui.label("Danger:");
                ui.color_edit_button_srgba(&mut self.palette.danger);
                ui.label("Agent:");
                ui.color_edit_button_srgba(&mut self.palette.agent);
                ui.label("Outside:");
                ui.color_edit_button_srgba(&mut self.palette.outside);
            });
        });
    }

    fn draw_grid(&self, ui: &mut egui::Ui, snapshot: Option<&Snapshot>, blink_on: bool) {
        let pitch = self.box_size + self.spacing;
        let total_size = Vec2::splat(pitch * GRID_SIZE as f32 - self.spacing);

        let (response, painter) = ui.allocate_painter(total_size, egui::Sense::hover());
        let start_pos = response.rect.min;

        // Fill background
        painter.rect_filled(response.rect, 0.0, self.palette.background);

        let bounds = snapshot.map(|s| &s.state.bounds);
        for cell in all_cells() {
            let occupied = snapshot.is_some_and(|s| s.occupancy.is_occupied(cell));
            let style = classify(cell, bounds, occupied);
            let rect = cell_rect(start_pos, cell, self.box_size, pitch);

            painter.rect_filled(rect, 1.0, self.palette.fill(style, blink_on));
            // Agents hide the danger fill, so ring them instead
            if style.occupied && style.class == CellClass::Danger && blink_on {
                painter.rect_stroke(rect, 1.0, Stroke::new(1.5, self.palette.danger));
            }
        }

        let hovered = response.hover_pos().and_then(|pos| cell_at(start_pos, pos, pitch));
        if let Some(cell) = hovered {
            let agent = snapshot.and_then(|s| s.occupancy.get(cell));
            let style = classify(cell, bounds, agent.is_some());
            if let Some(text) = hover_text(cell, style, agent) {
                response.on_hover_text_at_pointer(text);
            }
        }
    }
}

/// True during the "on" half of the danger blink.
fn blink_phase(time_secs: f64) -> bool {
    (time_secs * BLINK_TOGGLES_PER_SEC).floor() as i64 % 2 == 0
}

fn cell_rect(start_pos: Pos2, cell: Cell, box_size: f32, pitch: f32) -> Rect {
    let x = start_pos.x + cell.x as f32 * pitch;
    let y = start_pos.y + cell.y as f32 * pitch;
    Rect::from_min_size(egui::pos2(x, y), Vec2::splat(box_size))
}

/// Grid cell under `pos`; gaps between cells belong to the cell on their left/top.
fn cell_at(start_pos: Pos2, pos: Pos2, pitch: f32) -> Option<Cell> {
    let rel = pos - start_pos;
    if rel.x < 0.0 || rel.y < 0.0 {
        return None;
    }
    let cell = Cell::new((rel.x / pitch) as i64, (rel.y / pitch) as i64);
    cell.in_grid().then_some(cell)
}
