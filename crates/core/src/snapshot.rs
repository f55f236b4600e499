use serde::{Deserialize, Serialize};

use crate::grid::GemGrid;
use crate::playfield::Playfield;
use crate::types::{BehaviorGraphic, BoardState, Coord, GemKind, TileSlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub tile: TileSlotId,
    pub gem: GemKind,
    pub graphic: BehaviorGraphic,
}

/// Read-only view of a board for rendering or persistence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: usize,
    /// Row-major cells
    pub cells: Vec<Option<CellSnapshot>>,
    pub score: i64,
    pub state: BoardState,
    pub processing_round: u32,
    pub rounds_to_process: u32,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.cells.clear();
        self.score = 0;
        self.state = BoardState::Initializing;
        self.processing_round = 0;
        self.rounds_to_process = 0;
    }

    /// Refill this snapshot from a playfield, reusing the cell buffer
    pub fn fill_from(&mut self, field: &Playfield) {
        let size = field.size();
        self.size = size;
        self.cells.clear();
        self.cells.extend(field.board().coords().map(|at| {
            let tile = field.slot_at(at)?;
            let slot = field.slot(tile)?;
            Some(CellSnapshot {
                tile,
                gem: slot.gem,
                graphic: slot.behavior.graphic(),
            })
        }));
    }

    pub fn cell(&self, at: Coord) -> Option<&CellSnapshot> {
        if at.row >= self.size || at.column >= self.size {
            return None;
        }
        self.cells
            .get(at.row * self.size + at.column)
            .and_then(|c| c.as_ref())
    }

    /// Gem letters per row, `*` for empty cells
    pub fn rows(&self) -> Vec<String> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.size)
            .map(|row| {
                row.iter()
                    .map(|c| c.map(|c| c.gem.as_char()).unwrap_or('*'))
                    .collect()
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
