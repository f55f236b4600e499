//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond small conversions, making them
//! usable in any context (rules engine, presentation layer, persistence).
//!
//! # Board Dimensions
//!
//! The board is a square `tile_count x tile_count` grid:
//!
//! - **Default size**: 9 x 9
//! - **Maximum size**: 16 x 16 (match runs are stored inline, see [`MAX_TILE_COUNT`])
//! - **Coordinates**: `(row, column)`, row 0 is the top row, column 0 the left column
//!
//! # Rule Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MINIMUM_MATCH_COUNT` | 3 | Shortest run that counts as a match |
//! | `BASE_POINTS_PER_TILE` | 2 | Points per matched tile, scaled by cascade level |
//! | `BONUS_PER_ADDITIONAL_TILE` | 1 | Points per tile beyond the minimum |
//! | `MAX_SPECIALS` | 3 | Live special tiles allowed at once |
//! | `DEFAULT_GEM_KINDS` | 6 | Distinct gem kinds drawn at random |
//! | `POOL_WAIT_MS` | 100 | Wait budget before the tile pool allocates overflow |
//! | `POOL_CLEANUP_MS` | 300000 | Oversize cooldown before the pool trims |
//!
//! # Examples
//!
//! ```
//! use gem_cascade_types::{Coord, GemKind, MoveDirection};
//!
//! let gem = GemKind::from_char('c').unwrap();
//! assert_eq!(gem.index(), 2);
//! assert_eq!(gem.as_char(), 'C');
//!
//! let origin = Coord::new(0, 0);
//! assert_eq!(origin.step(MoveDirection::Right, 9), Some(Coord::new(0, 1)));
//! assert_eq!(origin.step(MoveDirection::Up, 9), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of tiles per row and column (9 x 9 board)
pub const DEFAULT_TILE_COUNT: usize = 9;

/// Largest supported board edge.
///
/// Match runs are stored inline with this capacity, so a run can never exceed it.
pub const MAX_TILE_COUNT: usize = 16;

/// Minimum number of identical gems in a row or column that form a match
pub const MINIMUM_MATCH_COUNT: usize = 3;

/// Points per matched tile before the cascade level multiplier
pub const BASE_POINTS_PER_TILE: i64 = 2;

/// Bonus points per tile matched beyond the minimum
pub const BONUS_PER_ADDITIONAL_TILE: i64 = 1;

/// Maximum number of live (unavailable) special tiles
pub const MAX_SPECIALS: usize = 3;

/// Default gem kind cardinality
pub const DEFAULT_GEM_KINDS: u8 = 6;

/// Fewest gem kinds a board may be configured with
pub const MIN_GEM_KINDS: u8 = 3;

/// Most gem kinds a board may be configured with
pub const MAX_GEM_KINDS: u8 = 16;

/// How long a pull may wait for a returned slot before allocating overflow (ms)
pub const POOL_WAIT_MS: u64 = 100;

/// How long the pool must stay oversized before it trims (ms, 5 minutes)
pub const POOL_CLEANUP_MS: u64 = 5 * 60 * 1000;

/// Attempts `generate` makes before giving up on a playable board
pub const MAX_GENERATION_ATTEMPTS: u32 = 32;

/// Upper bound on cascade rounds resolved for a single turn
pub const MAX_CASCADE_ROUNDS: u32 = 64;

/// Highest hype level reported to the presentation layer.
///
/// Cascades may run deeper; the hint is clamped so feedback stops escalating.
pub const MAX_HYPE_LEVEL: u32 = 3;

/// A gem kind drawn from a board's configured cardinality.
///
/// Kinds are plain indices (`0..gem_kinds`). The [`GemKind::UNKNOWN`] sentinel is
/// only used as the seed of a match scan ("accept the first tile's kind") and as the
/// kind of a recycled slot; it is never placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GemKind(u8);

impl GemKind {
    /// Scan seed / empty marker
    pub const UNKNOWN: GemKind = GemKind(u8::MAX);

    /// Create a gem kind from its index
    pub const fn new(index: u8) -> Self {
        GemKind(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn is_unknown(self) -> bool {
        self.0 == u8::MAX
    }

    /// Single-letter label (`A` for kind 0, `B` for kind 1, ...)
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_types::GemKind;
    ///
    /// assert_eq!(GemKind::new(0).as_char(), 'A');
    /// assert_eq!(GemKind::UNKNOWN.as_char(), '?');
    /// ```
    pub fn as_char(self) -> char {
        if self.is_unknown() || self.0 >= 26 {
            return '?';
        }
        (b'A' + self.0) as char
    }

    /// Parse a gem letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_types::GemKind;
    ///
    /// assert_eq!(GemKind::from_char('a'), Some(GemKind::new(0)));
    /// assert_eq!(GemKind::from_char('F'), Some(GemKind::new(5)));
    /// assert_eq!(GemKind::from_char('*'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(GemKind(upper as u8 - b'A'))
        } else {
            None
        }
    }
}

impl Default for GemKind {
    fn default() -> Self {
        GemKind::UNKNOWN
    }
}

impl fmt::Display for GemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Stable identity of a pooled tile slot.
///
/// The id survives moves; row and column are tracked separately and always mirror
/// the board cell currently holding the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileSlotId(pub u32);

impl fmt::Display for TileSlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// A board cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub column: usize,
}

impl Coord {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// The neighboring cell one step in `direction`, or `None` past the board edge
    pub fn step(self, direction: MoveDirection, size: usize) -> Option<Coord> {
        self.offset(direction, 1, size)
    }

    /// The cell `distance` steps in `direction`, or `None` past the board edge
    pub fn offset(self, direction: MoveDirection, distance: usize, size: usize) -> Option<Coord> {
        let (row, column) = match direction {
            MoveDirection::Left => (Some(self.row), self.column.checked_sub(distance)),
            MoveDirection::Right => (Some(self.row), self.column.checked_add(distance)),
            MoveDirection::Up => (self.row.checked_sub(distance), Some(self.column)),
            MoveDirection::Down => (self.row.checked_add(distance), Some(self.column)),
        };
        match (row, column) {
            (Some(row), Some(column)) if row < size && column < size => Some(Coord { row, column }),
            _ => None,
        }
    }

    /// True when the two cells share an edge
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.column)
    }
}

/// Axis along which a match run was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchDirection {
    Horizontal,
    Vertical,
}

impl MatchDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchDirection::Horizontal => "horizontal",
            MatchDirection::Vertical => "vertical",
        }
    }

    /// The forward scan step for this axis
    pub fn forward(&self) -> MoveDirection {
        match self {
            MatchDirection::Horizontal => MoveDirection::Right,
            MatchDirection::Vertical => MoveDirection::Down,
        }
    }
}

/// Direction a tile can be slid to complete a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    /// Evaluation order used by the move predictor
    pub const ALL: [MoveDirection; 4] = [
        MoveDirection::Left,
        MoveDirection::Right,
        MoveDirection::Up,
        MoveDirection::Down,
    ];

    pub fn opposite(&self) -> Self {
        match self {
            MoveDirection::Left => MoveDirection::Right,
            MoveDirection::Right => MoveDirection::Left,
            MoveDirection::Up => MoveDirection::Down,
            MoveDirection::Down => MoveDirection::Up,
        }
    }

    /// The axis a slide in this direction travels along
    pub fn axis(&self) -> MatchDirection {
        match self {
            MoveDirection::Left | MoveDirection::Right => MatchDirection::Horizontal,
            MoveDirection::Up | MoveDirection::Down => MatchDirection::Vertical,
        }
    }

    /// The two directions perpendicular to this one
    pub fn perpendicular(&self) -> [MoveDirection; 2] {
        match self.axis() {
            MatchDirection::Horizontal => [MoveDirection::Up, MoveDirection::Down],
            MatchDirection::Vertical => [MoveDirection::Left, MoveDirection::Right],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
            MoveDirection::Up => "up",
            MoveDirection::Down => "down",
        }
    }
}

/// How the presentation layer should play a tile request
///
/// - **Static**: place the tile above its column without animating (staging a drop)
/// - **Animated**: tween the tile to its target cell
/// - **Recycling**: play the removal effect; the slot returns to the pool afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKind {
    Static,
    Animated,
    Recycling,
}

/// Border/overlay hint for a tile's behavior. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviorGraphic {
    #[default]
    Default,
    DoublePoints,
    RowElimination,
    ColumnElimination,
}

/// Turn-level state of a game board
///
/// The cycle is `Initializing -> Playable -> ProcessingTurn -> AnimatingMoveResults -> Playable`.
/// Input is only accepted while `Playable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoardState {
    #[default]
    Initializing,
    Playable,
    ProcessingTurn,
    AnimatingMoveResults,
}

impl BoardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardState::Initializing => "initializing",
            BoardState::Playable => "playable",
            BoardState::ProcessingTurn => "processingTurn",
            BoardState::AnimatingMoveResults => "animatingMoveResults",
        }
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a score change, for on-screen feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreChange {
    Increase,
    Decrease,
}

impl ScoreChange {
    pub fn sign(&self) -> &'static str {
        match self {
            ScoreChange::Increase => "+",
            ScoreChange::Decrease => "-",
        }
    }
}
