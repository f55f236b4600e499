//! Move predictor - finds single swaps that would create a match
//!
//! For a tile at `origin` sliding one cell in `direction` onto `target`, the swap puts
//! the origin's gem at `target`. Two local patterns complete a run there:
//!
//! ```text
//! Linear slide (right):     Wedge slide (right):
//!
//!   x o x x                   . x
//!                             x o
//!                             . x
//! ```
//!
//! - **Linear**: a same-kind run beyond the target along the slide direction
//! - **Wedge**: same-kind tiles through the target on the perpendicular axis
//!
//! Either needs `minimum_match_count - 1` tiles besides the moving one. The target
//! must hold a different gem, otherwise the swap changes nothing.
//!
//! Only the origin's gem is checked. The displaced gem's own match is found when its
//! cell is evaluated sliding the other way, so the scan still sees every move.

use crate::grid::GemGrid;
use crate::types::{Coord, GemKind, MoveDirection, TileSlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SlidePattern {
    LinearSlide,
    WedgeSlide,
}

/// A swap that would produce at least one match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PotentialMove {
    pub slot: TileSlotId,
    pub origin: Coord,
    pub direction: MoveDirection,
    pub pattern: SlidePattern,
}

impl PotentialMove {
    /// The cell the tile slides onto
    pub fn target(&self, size: usize) -> Option<Coord> {
        self.origin.step(self.direction, size)
    }
}

/// Every cell's first qualifying move, in row-major order
pub fn find_possible_moves<G: GemGrid + ?Sized>(
    grid: &G,
    minimum_match_count: usize,
) -> Vec<PotentialMove> {
    let size = grid.size();
    let mut moves = Vec::new();
    for row in 0..size {
        for column in 0..size {
            if let Some(found) = move_from(grid, Coord::new(row, column), minimum_match_count) {
                moves.push(found);
            }
        }
    }
    moves
}

/// True if any move exists. An empty answer means deadlock.
pub fn has_possible_move<G: GemGrid + ?Sized>(grid: &G, minimum_match_count: usize) -> bool {
    let size = grid.size();
    (0..size).any(|row| {
        (0..size).any(|column| move_from(grid, Coord::new(row, column), minimum_match_count).is_some())
    })
}

fn move_from<G: GemGrid + ?Sized>(
    grid: &G,
    origin: Coord,
    minimum_match_count: usize,
) -> Option<PotentialMove> {
    let slot = grid.slot_at(origin)?;
    let gem = grid.gem_at(origin)?;
    let needed = minimum_match_count.saturating_sub(1);

    let linear = MoveDirection::ALL.into_iter().find(|&dir| {
        slide_target(grid, origin, dir, gem)
            .is_some_and(|target| run_from(grid, target, dir, gem) >= needed)
    });
    if let Some(direction) = linear {
        return Some(PotentialMove {
            slot,
            origin,
            direction,
            pattern: SlidePattern::LinearSlide,
        });
    }

    let wedge = MoveDirection::ALL.into_iter().find(|&dir| {
        slide_target(grid, origin, dir, gem).is_some_and(|target| {
            let [a, b] = dir.perpendicular();
            run_from(grid, target, a, gem) + run_from(grid, target, b, gem) >= needed
        })
    });
    wedge.map(|direction| PotentialMove {
        slot,
        origin,
        direction,
        pattern: SlidePattern::WedgeSlide,
    })
}

/// The neighbor in `direction` if it holds a different gem
fn slide_target<G: GemGrid + ?Sized>(
    grid: &G,
    origin: Coord,
    direction: MoveDirection,
    gem: GemKind,
) -> Option<Coord> {
    let target = origin.step(direction, grid.size())?;
    match grid.gem_at(target) {
        Some(other) if other != gem => Some(target),
        _ => None,
    }
}

/// Count consecutive `gem` tiles starting one step past `from`
fn run_from<G: GemGrid + ?Sized>(
    grid: &G,
    from: Coord,
    direction: MoveDirection,
    gem: GemKind,
) -> usize {
    let mut count = 0;
    let mut cursor = from.step(direction, grid.size());
    while let Some(at) = cursor {
        if grid.gem_at(at) != Some(gem) {
            break;
        }
        count += 1;
        cursor = at.step(direction, grid.size());
    }
    count
}
