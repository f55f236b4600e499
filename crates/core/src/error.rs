//! Error types for the rules engine.
//!
//! Expected outcomes (rejected swaps, deadlocks, pool exhaustion) are not errors and
//! never show up here. What remains are configuration mistakes and caller contract
//! breaches the integration must see.

use thiserror::Error;

use crate::request::RequestId;
use crate::types::{BoardState, Coord, TileSlotId};

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tile count {found} must be between {min} and {max}")]
    TileCount { found: usize, min: usize, max: usize },

    #[error("minimum match count {0} must be at least 3")]
    MinimumMatchCount(usize),

    #[error("gem kinds {found} must be between {min} and {max}")]
    GemKinds { found: u8, min: u8, max: u8 },

    #[error("behavior odds must have a positive total weight")]
    BehaviorOdds,

    #[error("pool size {found} is smaller than the board ({cells} cells)")]
    PoolSize { found: usize, cells: usize },

    #[error("{0} must be positive")]
    ZeroLimit(&'static str),

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: String, value: String },

    #[error("invalid config json: {0}")]
    Json(String),
}

/// A gem-letter layout that cannot become a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("layout is {size} rows, larger than the maximum of {max}")]
    TooLarge { size: usize, max: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized cell {found:?} at [{row}, {column}]")]
    InvalidCell {
        row: usize,
        column: usize,
        found: char,
    },

    #[error("gem {found:?} at [{row}, {column}] exceeds the {gem_kinds} configured kinds")]
    GemOutOfRange {
        row: usize,
        column: usize,
        found: char,
        gem_kinds: u8,
    },
}

/// Animation handshake contract breach.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("no animation in progress (board is {0})")]
    NotAnimating(BoardState),

    #[error("unknown or already acknowledged request {0}")]
    UnknownRequest(RequestId),

    #[error("request {0} acknowledged before it was dispatched")]
    NotDispatched(RequestId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CascadeError {
    #[error("cascade still producing matches after {limit} rounds")]
    RoundLimit { limit: u32 },
}

/// Errors surfaced by [`crate::GameBoard`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("board does not accept input while {0}")]
    NotPlayable(BoardState),

    #[error("no playable board after {attempts} generation attempts")]
    GenerationFailed { attempts: u32 },

    #[error("{0} is not on the board")]
    SlotNotOnBoard(TileSlotId),

    #[error("cell {0} is empty")]
    EmptyCell(Coord),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    #[error(transparent)]
    Cascade(#[from] CascadeError),
}
