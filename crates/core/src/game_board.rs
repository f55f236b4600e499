//! Game board - the authoritative engine for one player
//!
//! Ties the playfield, scoring, cascade resolution and the animation handshake
//! together. A turn looks like this:
//!
//! 1. [`GameBoard::try_swap`] swaps two tiles. No match puts them back and the board
//!    stays `Playable`.
//! 2. A match resolves the whole cascade at once and queues its requests. The board
//!    goes `AnimatingMoveResults`.
//! 3. The presentation layer polls [`GameBoard::next_request`] and reports each one
//!    with [`GameBoard::on_request_finished`]. Marked tiles return to the pool as
//!    rounds complete.
//! 4. After the last round the board checks for remaining moves and regenerates on
//!    deadlock.
//!
//! [`GameBoard::settle`] plays step 3 headlessly.

use crate::behavior::TileBehavior;
use crate::cascade::{refill, CascadeResolver};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EventSink, NoopSink, TracingSink};
use crate::grid::GemGrid;
use crate::matcher::{find_matches, MatchDetails};
use crate::playfield::{parse_layout, Playfield};
use crate::pool::{PoolReturn, TilePool};
use crate::predictor::{find_possible_moves, has_possible_move, PotentialMove};
use crate::request::{AnimationRequest, RequestBatch, RequestId};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::{ScoreDelta, ScoreEngine, ScoreRules};
use crate::sequencer::{AckOutcome, AnimationSequencer};
use crate::snapshot::BoardSnapshot;
use crate::types::{BoardState, Coord, TileSlotId};

/// Result of a swap attempt
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub accepted: bool,
    /// Matches the swap itself created (round 0)
    pub matches: Vec<MatchDetails>,
    /// Cascade rounds queued for animation
    pub rounds: u32,
    /// Points awarded across every round
    pub points: i64,
}

impl SwapOutcome {
    fn rejected() -> Self {
        Self {
            accepted: false,
            matches: Vec::new(),
            rounds: 0,
            points: 0,
        }
    }
}

pub struct GameBoard<R = SimpleRng, S = TracingSink> {
    config: EngineConfig,
    field: Playfield,
    rng: R,
    sink: S,
    scoring: ScoreEngine,
    resolver: CascadeResolver,
    sequencer: AnimationSequencer,
    next_request_id: u64,
    score_events: Vec<ScoreDelta>,
    turns: u64,
    reshuffles: u64,
}

impl GameBoard<SimpleRng, TracingSink> {
    /// Empty board seeded from `config.seed`, logging through `tracing`.
    /// Call [`GameBoard::generate`] before play.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let rng = SimpleRng::new(config.seed);
        Self::with_parts(config, rng, TracingSink)
    }

    /// Board loaded from gem letters (`A`.., `.` for empty), ready to play
    pub fn with_layout(config: EngineConfig, rows: &[&str]) -> Result<Self, EngineError> {
        let rng = SimpleRng::new(config.seed);
        Self::with_layout_and_parts(config, rows, rng, TracingSink)
    }
}

impl<R: RandomSource, S: EventSink> GameBoard<R, S> {
    pub fn with_parts(config: EngineConfig, rng: R, sink: S) -> Result<Self, EngineError> {
        config.validate()?;
        let field = Playfield::new(
            config.tile_count,
            config.gem_kinds,
            TilePool::from_config(&config),
        )?;
        Ok(Self {
            scoring: ScoreEngine::new(ScoreRules::from_config(&config)),
            resolver: CascadeResolver::new(config.minimum_match_count, config.max_cascade_rounds),
            sequencer: AnimationSequencer::new(),
            next_request_id: 0,
            score_events: Vec::new(),
            turns: 0,
            reshuffles: 0,
            config,
            field,
            rng,
            sink,
        })
    }

    pub fn with_layout_and_parts(
        mut config: EngineConfig,
        rows: &[&str],
        rng: R,
        sink: S,
    ) -> Result<Self, EngineError> {
        let layout = parse_layout(rows, config.gem_kinds)?;
        config.tile_count = layout.len();
        let mut board = Self::with_parts(config, rng, sink)?;
        board.field.load_layout(&layout);
        board.sequencer.finish_initializing();
        Ok(board)
    }

    /// Fill the board with a matchless, playable arrangement.
    ///
    /// Pre-existing matches are resolved silently (no points, no requests). Deadlocked
    /// fills are thrown away and retried. Returns the number of attempts used.
    pub fn generate(&mut self) -> Result<u32, EngineError> {
        self.sequencer.reset();
        let attempts = self.config.max_generation_attempts;

        for attempt in 1..=attempts {
            self.field.clear();
            let mut silent = RequestBatch::disabled();
            refill(&mut self.field, &mut self.rng, 0, &mut silent, &NoopSink);

            let matches = find_matches(&self.field, self.config.minimum_match_count, 0);
            let resolved = self.resolver.resolve(
                &mut self.field,
                matches,
                None,
                &mut self.rng,
                &mut silent,
                &NoopSink,
            );
            self.field.recycle_all_marked();

            if resolved.is_err() {
                continue;
            }
            if has_possible_move(&self.field, self.config.minimum_match_count) {
                self.sequencer.finish_initializing();
                self.sink.board_generated(&self.field, attempt);
                return Ok(attempt);
            }
        }

        self.field.clear();
        Err(EngineError::GenerationFailed { attempts })
    }

    /// Swap two cells and resolve the result.
    ///
    /// The cells need not be adjacent; only the resulting matches decide. A rejected
    /// swap leaves the board exactly as it was.
    pub fn try_swap(&mut self, a: Coord, b: Coord) -> Result<SwapOutcome, EngineError> {
        let state = self.sequencer.state();
        if state != BoardState::Playable {
            return Err(EngineError::NotPlayable(state));
        }
        for at in [a, b] {
            if self.field.slot_at(at).is_none() {
                return Err(EngineError::EmptyCell(at));
            }
        }

        self.sequencer.begin_turn();
        self.field.swap(a, b);

        let matches = find_matches(&self.field, self.config.minimum_match_count, 0);
        if matches.is_empty() {
            self.field.swap(a, b);
            self.sequencer.reject();
            self.sink.swap_rejected(a, b);
            return Ok(SwapOutcome::rejected());
        }
        self.sink.swap_accepted(a, b, matches.len());

        let mut batch = RequestBatch::starting_at(self.next_request_id);
        let checkpoint = self.scoring.checkpoint();
        let resolved = self.resolver.resolve(
            &mut self.field,
            matches.clone(),
            Some(&mut self.scoring),
            &mut self.rng,
            &mut batch,
            &self.sink,
        );
        self.next_request_id = batch.next_id();

        let report = match resolved {
            Ok(report) => report,
            Err(err) => {
                // Board still holds matches; start over rather than animate a partial turn
                // Abandoned rounds keep no points
                self.scoring.restore(checkpoint);
                self.field.recycle_all_marked();
                self.generate()?;
                self.reshuffles += 1;
                self.sink.board_reshuffled(&self.field);
                return Err(err.into());
            }
        };

        self.turns += 1;
        let points = report.scores.iter().map(|d| d.change).sum();
        self.score_events.extend(report.scores.iter().copied());

        if self.sequencer.start_animating(batch.into_requests(), report.rounds)
            == AckOutcome::TurnComplete
        {
            self.finish_turn()?;
        }

        Ok(SwapOutcome {
            accepted: true,
            matches,
            rounds: report.rounds,
            points,
        })
    }

    /// Swap by slot identity
    pub fn try_swap_slots(
        &mut self,
        a: TileSlotId,
        b: TileSlotId,
    ) -> Result<SwapOutcome, EngineError> {
        let at_a = self.position_of(a)?;
        let at_b = self.position_of(b)?;
        self.try_swap(at_a, at_b)
    }

    fn position_of(&self, slot: TileSlotId) -> Result<Coord, EngineError> {
        self.field
            .slot(slot)
            .and_then(|s| s.position)
            .ok_or(EngineError::SlotNotOnBoard(slot))
    }

    /// Next request the presentation layer may play, if any
    pub fn next_request(&mut self) -> Option<AnimationRequest> {
        self.sequencer.next_request()
    }

    /// Acknowledge a finished request. Must be called exactly once per request.
    pub fn on_request_finished(&mut self, id: RequestId) -> Result<AckOutcome, EngineError> {
        let outcome = self.sequencer.ack(id)?;
        match outcome {
            AckOutcome::Pending => {}
            AckOutcome::RoundAdvanced { round } => {
                self.field.recycle_marked_through(round.saturating_sub(1));
                self.sink
                    .round_advanced(round, self.sequencer.rounds_to_process());
            }
            AckOutcome::TurnComplete => {
                let rounds = self.sequencer.rounds_to_process();
                self.sink.round_advanced(rounds, rounds);
                self.finish_turn()?;
            }
        }
        Ok(outcome)
    }

    fn finish_turn(&mut self) -> Result<(), EngineError> {
        self.field.recycle_all_marked();
        let moves = find_possible_moves(&self.field, self.config.minimum_match_count).len();
        self.sink.turn_completed(
            self.sequencer.rounds_to_process(),
            self.scoring.total(),
            moves,
        );

        if moves == 0 {
            self.generate()?;
            self.reshuffles += 1;
            self.sink.board_reshuffled(&self.field);
        }
        Ok(())
    }

    /// Play out every queued request immediately. Returns how many were played.
    pub fn settle(&mut self) -> Result<usize, EngineError> {
        let mut played = 0;
        while let Some(request) = self.next_request() {
            self.on_request_finished(request.id)?;
            played += 1;
        }
        Ok(played)
    }

    /// Remove every tile and return to `Initializing`. The score is kept.
    pub fn clear(&mut self) {
        self.sequencer.reset();
        self.field.clear();
    }

    /// Advance pool maintenance; returns slots trimmed
    pub fn maintain(&mut self, elapsed_ms: u64) -> usize {
        self.field.pool_mut().maintain(elapsed_ms)
    }

    /// Handle for a presentation thread to return recycled slots early
    pub fn pool_handle(&self) -> PoolReturn {
        self.field.pool().return_handle()
    }

    /// Drain score breakdowns queued since the last call
    pub fn take_score_events(&mut self) -> Vec<ScoreDelta> {
        std::mem::take(&mut self.score_events)
    }

    pub fn possible_moves(&self) -> Vec<PotentialMove> {
        find_possible_moves(&self.field, self.config.minimum_match_count)
    }

    /// Matches currently on the board; empty whenever the board is stable
    pub fn current_matches(&self) -> Vec<MatchDetails> {
        find_matches(&self.field, self.config.minimum_match_count, 0)
    }

    /// Give the tile at `at` a behavior
    pub fn set_behavior_at(
        &mut self,
        at: Coord,
        behavior: TileBehavior,
    ) -> Result<TileSlotId, EngineError> {
        self.field
            .set_behavior(at, behavior)
            .ok_or(EngineError::EmptyCell(at))
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.fill_from(&self.field);
        out.score = self.scoring.total();
        out.state = self.sequencer.state();
        out.processing_round = self.sequencer.processing_round();
        out.rounds_to_process = self.sequencer.rounds_to_process();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut out = BoardSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    pub fn state(&self) -> BoardState {
        self.sequencer.state()
    }

    pub fn score(&self) -> i64 {
        self.scoring.total()
    }

    pub fn last_score(&self) -> Option<&ScoreDelta> {
        self.scoring.last()
    }

    pub fn processing_round(&self) -> u32 {
        self.sequencer.processing_round()
    }

    pub fn rounds_to_process(&self) -> u32 {
        self.sequencer.rounds_to_process()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn field(&self) -> &Playfield {
        &self.field
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn reshuffles(&self) -> u64 {
        self.reshuffles
    }
}
