// classify.rs - Map a cell to the styling the display layer uses

use crate::bounds::Bounds;
use crate::grid::Cell;
use crate::state::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    Outside,
    Playable,
    Danger,
}

impl CellClass {
    pub fn is_playable(self) -> bool {
        !matches!(self, CellClass::Outside)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub class: CellClass,
    pub occupied: bool,
}

impl CellStyle {
    pub const EMPTY_OUTSIDE: Self = Self { class: CellClass::Outside, occupied: false };

    /// Style labels in display order: `cell`, `playable`/`outside`, then
    /// `danger` and `agent` when they apply.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = vec!["cell"];
        labels.push(if self.class.is_playable() { "playable" } else { "outside" });
        if self.class == CellClass::Danger {
            labels.push("danger");
        }
        if self.occupied {
            labels.push("agent");
        }
        labels
    }
}

/// Without a game state every cell renders as empty outside.
pub fn classify(cell: Cell, bounds: Option<&Bounds>, occupied: bool) -> CellStyle {
    let Some(bounds) = bounds else {
        return CellStyle::EMPTY_OUTSIDE;
    };
    let class = if bounds.is_danger(cell) {
        CellClass::Danger
    } else if bounds.is_playable(cell) {
        CellClass::Playable
    } else {
        CellClass::Outside
    };
    CellStyle { class, occupied }
}

/// Tooltip for a cell: the agent if any, else the coordinate of a playable cell.
pub fn hover_text(cell: Cell, style: CellStyle, agent: Option<&Address>) -> Option<String> {
    match agent {
        Some(agent) if style.occupied => Some(format!("Agent: {}...", agent.short())),
        _ if style.class.is_playable() => Some(format!("({},{})", cell.x, cell.y)),
        _ => None,
    }
}
