//! Tile behaviors - per-tile effects triggered when a tile is matched
//!
//! Behaviors are a closed enum dispatched by pattern match. Each variant defines a
//! presentation hint ([`BehaviorGraphic`]) and a pure `trigger` that returns a score
//! delta plus board effects. The cascade resolver applies the effects; a behavior never
//! touches the board itself.
//!
//! # Variants
//!
//! | Variant | Score delta | Effect |
//! |---------|-------------|--------|
//! | `Default` | 0 | none |
//! | `DoublePoints` | `2 * points_before_behavior` | none |
//! | `RowColumnElimination` | 0 | recycles the rest of the row or column |
//!
//! Assignment odds come from a [`BehaviorTable`], a weighted registration table built
//! from [`BehaviorOdds`].

use serde::{Deserialize, Serialize};

use crate::grid::GemGrid;
use crate::matcher::MatchDetails;
use crate::rng::RandomSource;
use crate::types::{BehaviorGraphic, Coord, MatchDirection, TileSlotId};

/// Which line a [`TileBehavior::RowColumnElimination`] tile clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EliminationAxis {
    /// Row for a horizontal match, column for a vertical one
    #[default]
    FollowMatch,
    Row,
    Column,
}

impl EliminationAxis {
    fn resolve(self, matched: MatchDirection) -> MatchDirection {
        match self {
            EliminationAxis::FollowMatch => matched,
            EliminationAxis::Row => MatchDirection::Horizontal,
            EliminationAxis::Column => MatchDirection::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileBehavior {
    #[default]
    Default,
    DoublePoints,
    RowColumnElimination(EliminationAxis),
}

/// A board mutation requested by a behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardEffect {
    /// Remove the tile at `at` and return it to the pool
    Recycle { slot: TileSlotId, at: Coord },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerResult {
    pub score_delta: i64,
    pub effects: Vec<BoardEffect>,
}

impl TileBehavior {
    /// True for anything but `Default`
    pub fn is_special(&self) -> bool {
        !matches!(self, TileBehavior::Default)
    }

    pub fn graphic(&self) -> BehaviorGraphic {
        match self {
            TileBehavior::Default => BehaviorGraphic::Default,
            TileBehavior::DoublePoints => BehaviorGraphic::DoublePoints,
            TileBehavior::RowColumnElimination(EliminationAxis::Column) => {
                BehaviorGraphic::ColumnElimination
            }
            TileBehavior::RowColumnElimination(_) => BehaviorGraphic::RowElimination,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileBehavior::Default => "default",
            TileBehavior::DoublePoints => "doublePoints",
            TileBehavior::RowColumnElimination(_) => "rowColumnElimination",
        }
    }

    /// Run this behavior for a tile of `matched`.
    ///
    /// `points_before_behavior` is the base plus bonus score of the match.
    pub fn trigger<G: GemGrid + ?Sized>(
        &self,
        grid: &G,
        matched: &MatchDetails,
        points_before_behavior: i64,
    ) -> TriggerResult {
        match self {
            TileBehavior::Default => TriggerResult::default(),
            TileBehavior::DoublePoints => TriggerResult {
                score_delta: points_before_behavior * 2,
                effects: Vec::new(),
            },
            TileBehavior::RowColumnElimination(axis) => TriggerResult {
                score_delta: 0,
                effects: eliminate_line(grid, matched, axis.resolve(matched.direction)),
            },
        }
    }
}

/// Every occupied cell sharing the reference tile's line, minus the match itself.
/// The first tile of the match is the reference.
fn eliminate_line<G: GemGrid + ?Sized>(
    grid: &G,
    matched: &MatchDetails,
    line: MatchDirection,
) -> Vec<BoardEffect> {
    let Some(reference) = matched.tiles.first() else {
        return Vec::new();
    };

    (0..grid.size())
        .map(|i| match line {
            MatchDirection::Horizontal => Coord::new(reference.at.row, i),
            MatchDirection::Vertical => Coord::new(i, reference.at.column),
        })
        .filter_map(|at| grid.slot_at(at).map(|slot| (slot, at)))
        .filter(|(slot, _)| !matched.contains_slot(*slot))
        .map(|(slot, at)| BoardEffect::Recycle { slot, at })
        .collect()
}

/// Relative weights for behavior assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorOdds {
    pub default_weight: u32,
    pub double_points: u32,
    pub row_column_elimination: u32,
}

impl Default for BehaviorOdds {
    fn default() -> Self {
        Self {
            default_weight: 36,
            double_points: 3,
            row_column_elimination: 1,
        }
    }
}

impl BehaviorOdds {
    pub fn total(&self) -> u64 {
        self.default_weight as u64 + self.double_points as u64 + self.row_column_elimination as u64
    }
}

/// Weighted registration table the tile pool draws behaviors from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorTable {
    entries: Vec<(TileBehavior, u32)>,
}

impl BehaviorTable {
    /// An empty table; draws always yield `Default`
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_odds(odds: &BehaviorOdds) -> Self {
        Self::new()
            .register(TileBehavior::Default, odds.default_weight)
            .register(TileBehavior::DoublePoints, odds.double_points)
            .register(
                TileBehavior::RowColumnElimination(EliminationAxis::FollowMatch),
                odds.row_column_elimination,
            )
    }

    /// Add a behavior with the given weight. Zero weights are skipped.
    pub fn register(mut self, behavior: TileBehavior, weight: u32) -> Self {
        if weight > 0 {
            self.entries.push((behavior, weight));
        }
        self
    }

    pub fn total_weight(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, (_, w)| acc.saturating_add(*w))
    }

    pub fn entries(&self) -> &[(TileBehavior, u32)] {
        &self.entries
    }

    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> TileBehavior {
        let total = self.total_weight();
        if total == 0 {
            return TileBehavior::Default;
        }

        let mut roll = rng.next_range(total);
        for (behavior, weight) in &self.entries {
            if roll < *weight {
                return *behavior;
            }
            roll -= weight;
        }
        TileBehavior::Default
    }
}

impl Default for BehaviorTable {
    fn default() -> Self {
        Self::from_odds(&BehaviorOdds::default())
    }
}
