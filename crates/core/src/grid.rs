//! Read-only view of a board's gems.
//!
//! Match detection, move prediction and tile behaviors only ever read the grid,
//! so they are written against this trait rather than the concrete playfield.

use crate::behavior::TileBehavior;
use crate::types::{Coord, GemKind, TileSlotId};

pub trait GemGrid {
    /// Edge length of the square grid
    fn size(&self) -> usize;

    /// Slot occupying a cell, if any
    fn slot_at(&self, at: Coord) -> Option<TileSlotId>;

    /// Gem kind shown at a cell, if occupied
    fn gem_at(&self, at: Coord) -> Option<GemKind>;

    /// Behavior carried by a slot
    fn behavior_of(&self, slot: TileSlotId) -> TileBehavior;
}
