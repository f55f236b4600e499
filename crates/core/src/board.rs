//! Board module - the grid of tile slot references
//!
//! The board is a square `size x size` grid where each cell is empty or holds the id
//! of a pooled tile slot. Uses a flat vector in row-major order for cache locality.
//! Coordinates: `(row, column)` where row 0 is the top row.
//!
//! The board only tracks cell -> slot associations. Slot contents (gem kind,
//! behavior, position mirror) live in the tile pool; [`crate::Playfield`] keeps the two
//! in sync.
//!
//! Out-of-range coordinates are a caller bug and panic.

use crate::types::{Coord, TileSlotId};

/// A cell on the game board
///
/// - `None`: Empty cell (only exists transiently while a cascade resolves)
/// - `Some(TileSlotId)`: Cell holding the given slot
pub type Cell = Option<TileSlotId>;

/// The game board - `size x size` cells using flat storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    /// Flat array of cells, row-major order (row * size + column)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Calculate flat index from a coordinate, panicking when out of range
    #[inline(always)]
    fn index(&self, at: Coord) -> usize {
        assert!(
            self.in_bounds(at),
            "coordinate {} outside {}x{} board",
            at,
            self.size,
            self.size
        );
        at.row * self.size + at.column
    }

    /// Edge length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if a coordinate is on the board
    pub fn in_bounds(&self, at: Coord) -> bool {
        at.row < self.size && at.column < self.size
    }

    /// Get the slot at a cell
    pub fn get(&self, at: Coord) -> Cell {
        self.cells[self.index(at)]
    }

    /// Set a cell, returning what it previously held
    pub fn set(&mut self, at: Coord, cell: Cell) -> Cell {
        let idx = self.index(at);
        std::mem::replace(&mut self.cells[idx], cell)
    }

    /// Empty a cell, returning what it held
    pub fn take(&mut self, at: Coord) -> Cell {
        let idx = self.index(at);
        self.cells[idx].take()
    }

    /// Swap the contents of two cells. Never validates legality.
    pub fn swap(&mut self, a: Coord, b: Coord) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
    }

    /// Find the cell holding `slot`
    pub fn position_of(&self, slot: TileSlotId) -> Option<Coord> {
        self.cells
            .iter()
            .position(|cell| *cell == Some(slot))
            .map(|idx| Coord::new(idx / self.size, idx % self.size))
    }

    /// Check if every cell is occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Number of empty cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Iterate all coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size * size).map(move |idx| Coord::new(idx / size, idx % size))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}
