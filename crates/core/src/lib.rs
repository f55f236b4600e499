//! Core rules engine - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules: the grid, match detection, move prediction,
//! cascade resolution, scoring, special tile behaviors, the tile pool and the round-based
//! animation handshake. It has **no dependencies** on rendering, audio or input:
//!
//! - **Deterministic**: randomness is injected, so a seed reproduces a session
//! - **Synchronous**: a swap resolves completely before any animation is requested
//! - **Observable**: an injected [`EventSink`] receives every observation point
//!
//! # Module Structure
//!
//! - [`board`]: square grid of tile slot references
//! - [`pool`]: reusable tile slots with bounded wait and overflow
//! - [`playfield`]: board plus pool, kept in sync; gem-letter layouts
//! - [`matcher`]: run detection along rows and columns
//! - [`predictor`]: single-swap move prediction and deadlock detection
//! - [`behavior`]: special tile behaviors and their weighted assignment table
//! - [`scoring`]: points per match, scaled by cascade level
//! - [`cascade`]: remove, compress, refill, repeat
//! - [`request`]: animation requests for the presentation layer
//! - [`sequencer`]: round-gated release and acknowledgement of requests
//! - [`game_board`]: the engine tying it all together
//!
//! # Rules
//!
//! - **Matches**: 3 or more identical gems in a row or column
//! - **Score**: `tiles * 2 * (level + 1)` plus 1 per tile beyond three, plus behaviors
//! - **Cascades**: refills that match again score at the next level
//! - **Deadlock**: a board with no move left is regenerated
//!
//! # Example
//!
//! ```
//! use gem_cascade_core::{EngineConfig, GameBoard, NoopSink, SimpleRng};
//! use gem_cascade_types::BoardState;
//!
//! let config = EngineConfig::default().with_seed(42);
//! let mut board = GameBoard::with_parts(config, SimpleRng::new(42), NoopSink).unwrap();
//! board.generate().unwrap();
//!
//! // Play the first move the predictor finds
//! let mv = board.possible_moves()[0];
//! let target = mv.target(board.config().tile_count).unwrap();
//! let outcome = board.try_swap(mv.origin, target).unwrap();
//! assert!(outcome.accepted);
//!
//! // Acknowledge every animation request headlessly
//! board.settle().unwrap();
//! assert_eq!(board.state(), BoardState::Playable);
//! assert!(board.score() > 0);
//! ```

pub mod behavior;
pub mod board;
pub mod cascade;
pub mod config;
pub mod error;
pub mod events;
pub mod game_board;
pub mod grid;
pub mod matcher;
pub mod playfield;
pub mod pool;
pub mod predictor;
pub mod request;
pub mod rng;
pub mod scoring;
pub mod sequencer;
pub mod snapshot;

pub use gem_cascade_types as types;

// Re-export commonly used types for convenience
pub use behavior::{BehaviorOdds, BehaviorTable, BoardEffect, EliminationAxis, TileBehavior};
pub use board::Board;
pub use cascade::{CascadePhase, CascadeReport, CascadeResolver};
pub use config::EngineConfig;
pub use error::{CascadeError, ConfigError, EngineError, LayoutError, SequencerError};
pub use events::{EventSink, NoopSink, TracingSink};
pub use game_board::{GameBoard, SwapOutcome};
pub use grid::GemGrid;
pub use matcher::{find_matches, Centroid, MatchDetails, MatchedTile};
pub use playfield::Playfield;
pub use pool::{PoolReturn, PullOutcome, TilePool, TileSlot};
pub use predictor::{find_possible_moves, PotentialMove, SlidePattern};
pub use request::{AnimationRequest, RequestBatch, RequestId};
pub use rng::{RandomSource, SimpleRng};
pub use scoring::{ScoreCheckpoint, ScoreDelta, ScoreEngine, ScoreRules};
pub use sequencer::{AckOutcome, AnimationSequencer};
pub use snapshot::{BoardSnapshot, CellSnapshot};
