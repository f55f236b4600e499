//! Playfield - the board and its tile pool, kept in sync
//!
//! Every mutation that moves a slot on or off the board goes through here so the
//! slot's `position` always mirrors the cell holding it.

use std::fmt;

use crate::behavior::TileBehavior;
use crate::board::Board;
use crate::config::default_pool_size;
use crate::error::LayoutError;
use crate::grid::GemGrid;
use crate::pool::{PullOutcome, TilePool, TileSlot};
use crate::rng::RandomSource;
use crate::types::{Coord, GemKind, TileSlotId, MAX_TILE_COUNT};

/// Parsed gem-letter layout. `A`.. are gem kinds, `.` is an empty cell.
pub type Layout = Vec<Vec<Option<GemKind>>>;

/// Parse layout rows, checking they form a square grid of known gems
pub fn parse_layout(rows: &[&str], gem_kinds: u8) -> Result<Layout, LayoutError> {
    if rows.is_empty() {
        return Err(LayoutError::Empty);
    }
    let size = rows.len();
    if size > MAX_TILE_COUNT {
        return Err(LayoutError::TooLarge {
            size,
            max: MAX_TILE_COUNT,
        });
    }

    rows.iter()
        .enumerate()
        .map(|(row, line)| {
            let cells: Vec<char> = line.trim().chars().collect();
            if cells.len() != size {
                return Err(LayoutError::Ragged {
                    row,
                    expected: size,
                    found: cells.len(),
                });
            }
            cells
                .into_iter()
                .enumerate()
                .map(|(column, c)| {
                    if c == '.' {
                        return Ok(None);
                    }
                    match GemKind::from_char(c) {
                        Some(gem) if gem.index() < gem_kinds => Ok(Some(gem)),
                        Some(_) => Err(LayoutError::GemOutOfRange {
                            row,
                            column,
                            found: c,
                            gem_kinds,
                        }),
                        None => Err(LayoutError::InvalidCell {
                            row,
                            column,
                            found: c,
                        }),
                    }
                })
                .collect()
        })
        .collect()
}

#[derive(Debug)]
pub struct Playfield {
    board: Board,
    pool: TilePool,
    gem_kinds: u8,
}

impl Playfield {
    /// Empty playfield of `size` x `size` cells. Match runs are stored inline, so
    /// sizes above [`MAX_TILE_COUNT`] are refused.
    pub fn new(size: usize, gem_kinds: u8, pool: TilePool) -> Result<Self, LayoutError> {
        if size > MAX_TILE_COUNT {
            return Err(LayoutError::TooLarge {
                size,
                max: MAX_TILE_COUNT,
            });
        }
        Ok(Self {
            board: Board::new(size),
            pool,
            gem_kinds,
        })
    }

    /// Build a playfield from gem letters with a default-sized pool
    pub fn from_layout(rows: &[&str], gem_kinds: u8) -> Result<Self, LayoutError> {
        let layout = parse_layout(rows, gem_kinds)?;
        let size = layout.len();
        let mut field = Self::new(size, gem_kinds, TilePool::new(default_pool_size(size)))?;
        field.load_layout(&layout);
        Ok(field)
    }

    /// Replace the board contents with `layout`. All placed tiles are plain.
    ///
    /// Panics if the layout size differs from the board's.
    pub fn load_layout(&mut self, layout: &Layout) {
        assert_eq!(layout.len(), self.size(), "layout does not fit the board");
        self.clear();
        for (row, cells) in layout.iter().enumerate() {
            for (column, gem) in cells.iter().enumerate() {
                if let Some(gem) = gem {
                    self.place(Coord::new(row, column), *gem, TileBehavior::Default);
                }
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pool(&self) -> &TilePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut TilePool {
        &mut self.pool
    }

    pub fn gem_kinds(&self) -> u8 {
        self.gem_kinds
    }

    pub fn slot(&self, id: TileSlotId) -> Option<&TileSlot> {
        self.pool.get(id)
    }

    /// Put a new slot carrying `gem` into an empty cell
    pub fn place(&mut self, at: Coord, gem: GemKind, behavior: TileBehavior) -> TileSlotId {
        self.vacate_and_mark(at);
        let id = self.pool.acquire_now().id;
        if let Some(slot) = self.pool.get_mut(id) {
            slot.gem = gem;
            slot.behavior = behavior;
            slot.position = Some(at);
        }
        self.board.set(at, Some(id));
        id
    }

    /// Fill an empty cell from the pool with a random gem
    pub fn pull_into<R: RandomSource + ?Sized>(&mut self, at: Coord, rng: &mut R) -> PullOutcome {
        self.vacate_and_mark(at);
        let outcome = self.pool.pull_now(rng);
        let gem = GemKind::new(rng.next_range(self.gem_kinds as u32) as u8);
        if let Some(slot) = self.pool.get_mut(outcome.id) {
            slot.gem = gem;
            slot.position = Some(at);
        }
        self.board.set(at, Some(outcome.id));
        outcome
    }

    fn vacate_and_mark(&mut self, at: Coord) {
        if let Some(old) = self.vacate(at) {
            self.pool.mark_for_recycling(old, 0);
        }
    }

    /// Swap two cells and both slots' positions
    pub fn swap(&mut self, a: Coord, b: Coord) {
        self.board.swap(a, b);
        self.sync_position(a);
        self.sync_position(b);
    }

    fn sync_position(&mut self, at: Coord) {
        if let Some(id) = self.board.get(at) {
            if let Some(slot) = self.pool.get_mut(id) {
                slot.position = Some(at);
            }
        }
    }

    /// Take a slot off the board. The slot stays live until recycled.
    pub fn vacate(&mut self, at: Coord) -> Option<TileSlotId> {
        let id = self.board.take(at)?;
        if let Some(slot) = self.pool.get_mut(id) {
            slot.position = None;
        }
        Some(id)
    }

    pub fn mark_for_recycling(&mut self, id: TileSlotId, round: u32) -> bool {
        self.pool.mark_for_recycling(id, round)
    }

    pub fn recycle_all_marked(&mut self) -> usize {
        self.pool.recycle_all_marked()
    }

    pub fn recycle_marked_through(&mut self, round: u32) -> usize {
        self.pool.recycle_marked_through(round)
    }

    /// Override the behavior of the tile at `at`
    pub fn set_behavior(&mut self, at: Coord, behavior: TileBehavior) -> Option<TileSlotId> {
        let id = self.board.get(at)?;
        self.pool.get_mut(id)?.behavior = behavior;
        Some(id)
    }

    /// Remove every tile and return all slots to the pool
    pub fn clear(&mut self) {
        let coords: Vec<Coord> = self.board.coords().collect();
        for at in coords {
            self.vacate_and_mark(at);
        }
        self.pool.recycle_all_marked();
    }

    /// Check that every slot on the board points back at its cell
    pub fn positions_consistent(&self) -> bool {
        self.board.coords().all(|at| match self.board.get(at) {
            Some(id) => self.pool.get(id).and_then(|s| s.position) == Some(at),
            None => true,
        })
    }

    /// Gem letters per row, `*` for empty cells
    pub fn rows(&self) -> Vec<String> {
        let size = self.size();
        (0..size)
            .map(|row| {
                (0..size)
                    .map(|column| {
                        self.gem_at(Coord::new(row, column))
                            .map(|g| g.as_char())
                            .unwrap_or('*')
                    })
                    .collect()
            })
            .collect()
    }
}

impl GemGrid for Playfield {
    fn size(&self) -> usize {
        self.board.size()
    }

    fn slot_at(&self, at: Coord) -> Option<TileSlotId> {
        self.board.get(at)
    }

    fn gem_at(&self, at: Coord) -> Option<GemKind> {
        self.board
            .get(at)
            .and_then(|id| self.pool.get(id))
            .map(|slot| slot.gem)
    }

    fn behavior_of(&self, slot: TileSlotId) -> TileBehavior {
        self.pool
            .get(slot)
            .map(|s| s.behavior)
            .unwrap_or_default()
    }
}

impl fmt::Display for Playfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
