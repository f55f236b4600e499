//! Match detection - runs of identical gems along rows and columns
//!
//! Every cell that starts a run (its predecessor on the axis holds a different gem,
//! or it sits on the edge) is scanned forward with the [`GemKind::UNKNOWN`] seed,
//! which accepts the first tile's kind. The run extends while the next cell holds the
//! running kind and is accepted when it reaches the minimum match count.
//!
//! Only run starts are scanned, so one physical run yields exactly one
//! [`MatchDetails`]. Crossing runs (L and T shapes) still produce one match per axis
//! and share their corner tile.

use arrayvec::ArrayVec;

use crate::grid::GemGrid;
use crate::types::{Coord, GemKind, MatchDirection, TileSlotId, MAX_TILE_COUNT};

/// A tile captured as part of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchedTile {
    pub slot: TileSlotId,
    pub at: Coord,
    pub gem: GemKind,
}

/// Midpoint of a run in board-relative cell units. Presentation hint only.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Centroid {
    pub row: f32,
    pub column: f32,
}

/// One run of identical gems found on the board
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDetails {
    /// Tiles in scan order (left to right, or top to bottom)
    pub tiles: ArrayVec<MatchedTile, MAX_TILE_COUNT>,
    pub direction: MatchDirection,
    pub centroid: Centroid,
    /// Cascade round the match was found in (0 for the player's swap)
    pub round: u32,
}

impl MatchDetails {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn gem(&self) -> GemKind {
        self.tiles.first().map(|t| t.gem).unwrap_or(GemKind::UNKNOWN)
    }

    pub fn contains_slot(&self, slot: TileSlotId) -> bool {
        self.tiles.iter().any(|t| t.slot == slot)
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.tiles.iter().any(|t| t.at == at)
    }
}

/// Scan the whole grid for matches, tagging each with `round`
pub fn find_matches<G: GemGrid + ?Sized>(
    grid: &G,
    minimum_match_count: usize,
    round: u32,
) -> Vec<MatchDetails> {
    let mut matches = Vec::new();
    let size = grid.size();

    for row in 0..size {
        for column in 0..size {
            let at = Coord::new(row, column);
            for direction in [MatchDirection::Horizontal, MatchDirection::Vertical] {
                if !is_run_start(grid, at, direction) {
                    continue;
                }
                if let Some(found) = scan_run(grid, at, direction, minimum_match_count, round) {
                    matches.push(found);
                }
            }
        }
    }

    matches
}

/// Check whether any match exists without collecting them
pub fn has_matches<G: GemGrid + ?Sized>(grid: &G, minimum_match_count: usize) -> bool {
    let size = grid.size();
    (0..size).any(|row| {
        (0..size).any(|column| {
            let at = Coord::new(row, column);
            [MatchDirection::Horizontal, MatchDirection::Vertical]
                .into_iter()
                .any(|dir| is_run_start(grid, at, dir) && run_length(grid, at, dir) >= minimum_match_count)
        })
    })
}

fn is_run_start<G: GemGrid + ?Sized>(grid: &G, at: Coord, direction: MatchDirection) -> bool {
    let Some(gem) = grid.gem_at(at) else {
        return false;
    };
    match at.step(direction.forward().opposite(), grid.size()) {
        Some(prev) => grid.gem_at(prev) != Some(gem),
        None => true,
    }
}

fn run_length<G: GemGrid + ?Sized>(grid: &G, start: Coord, direction: MatchDirection) -> usize {
    let step = direction.forward();
    let mut running = GemKind::UNKNOWN;
    let mut length = 0;
    let mut cursor = Some(start);

    while let Some(at) = cursor {
        match grid.gem_at(at) {
            Some(gem) if running.is_unknown() || gem == running => {
                running = gem;
                length += 1;
            }
            _ => break,
        }
        cursor = at.step(step, grid.size());
    }

    length
}

fn scan_run<G: GemGrid + ?Sized>(
    grid: &G,
    start: Coord,
    direction: MatchDirection,
    minimum_match_count: usize,
    round: u32,
) -> Option<MatchDetails> {
    let length = run_length(grid, start, direction);
    if length < minimum_match_count {
        return None;
    }

    let step = direction.forward();
    let mut tiles = ArrayVec::new();
    let mut cursor = Some(start);
    for _ in 0..length {
        let at = cursor?;
        let slot = grid.slot_at(at)?;
        let gem = grid.gem_at(at)?;
        tiles.push(MatchedTile { slot, at, gem });
        cursor = at.step(step, grid.size());
    }

    let half = (length - 1) as f32 / 2.0;
    let centroid = match direction {
        MatchDirection::Horizontal => Centroid {
            row: start.row as f32,
            column: start.column as f32 + half,
        },
        MatchDirection::Vertical => Centroid {
            row: start.row as f32 + half,
            column: start.column as f32,
        },
    };

    Some(MatchDetails {
        tiles,
        direction,
        centroid,
        round,
    })
}
