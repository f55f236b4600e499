//! Cascade resolver - match, remove, compress, refill, repeat
//!
//! Resolution is synchronous: the playfield is final when [`CascadeResolver::resolve`]
//! returns, and the emitted requests only describe how to animate there.
//!
//! ```text
//! Idle -> EvaluatingMatches -> ApplyingBehaviors -> Compressing -> Refilling
//!              ^                                                      |
//!              +------------------ new matches -----------------------+
//! ```
//!
//! Per round:
//! 1. Score each match (each tile's behavior fires once), then apply behavior effects
//! 2. Mark matched tiles for recycling, empty their cells, emit `Recycling` requests
//! 3. Compress every column with a bottom-up write cursor, one `Animated` request per
//!    single-row slide
//! 4. Refill empty cells row-major, each with a `Static` then `Animated` request
//! 5. Scan again; new matches start the next round
//!
//! A tile is removed at most once per resolution, guarded by its recycling mark.
//! Silent resolution (no scorer, disabled batch) is used while generating boards.

use crate::behavior::BoardEffect;
use crate::error::CascadeError;
use crate::events::EventSink;
use crate::grid::GemGrid;
use crate::matcher::{find_matches, MatchDetails};
use crate::playfield::Playfield;
use crate::request::RequestBatch;
use crate::rng::RandomSource;
use crate::scoring::{ScoreDelta, ScoreEngine};
use crate::types::{AnimationKind, Coord, TileSlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CascadePhase {
    #[default]
    Idle,
    EvaluatingMatches,
    ApplyingBehaviors,
    Compressing,
    Refilling,
}

/// What one resolution did
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    /// Rounds that had matches; becomes the sequencer's rounds to process
    pub rounds: u32,
    pub matches: Vec<MatchDetails>,
    pub scores: Vec<ScoreDelta>,
    pub removed: usize,
    pub slides: usize,
    pub refilled: usize,
    pub overflows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefillOutcome {
    pub filled: usize,
    pub overflows: usize,
}

#[derive(Debug, Clone)]
pub struct CascadeResolver {
    phase: CascadePhase,
    minimum_match_count: usize,
    max_rounds: u32,
}

impl CascadeResolver {
    pub fn new(minimum_match_count: usize, max_rounds: u32) -> Self {
        Self {
            phase: CascadePhase::Idle,
            minimum_match_count,
            max_rounds,
        }
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    /// Resolve `initial` (round 0) and every chain reaction after it.
    ///
    /// With `scoring` absent no points are awarded and no behaviors fire.
    pub fn resolve<R, S>(
        &mut self,
        field: &mut Playfield,
        initial: Vec<MatchDetails>,
        mut scoring: Option<&mut ScoreEngine>,
        rng: &mut R,
        requests: &mut RequestBatch,
        sink: &S,
    ) -> Result<CascadeReport, CascadeError>
    where
        R: RandomSource + ?Sized,
        S: EventSink + ?Sized,
    {
        let mut report = CascadeReport::default();
        let mut round = 0;
        let mut matches = initial;
        self.phase = CascadePhase::EvaluatingMatches;

        while !matches.is_empty() {
            if round >= self.max_rounds {
                self.phase = CascadePhase::Idle;
                return Err(CascadeError::RoundLimit {
                    limit: self.max_rounds,
                });
            }
            for matched in &matches {
                sink.match_found(matched);
            }

            self.phase = CascadePhase::ApplyingBehaviors;
            for matched in &matches {
                if let Some(scorer) = scoring.as_deref_mut() {
                    let scored = scorer.increase_score(&*field, matched, round);
                    for trigger in &scored.triggers {
                        sink.behavior_triggered(trigger, round);
                    }
                    sink.score_changed(&scored.delta);
                    report.scores.push(scored.delta);

                    for effect in scored.effects {
                        let BoardEffect::Recycle { slot, at } = effect;
                        if remove_tile(field, slot, at, round, requests) {
                            report.removed += 1;
                        }
                    }
                }

                for tile in &matched.tiles {
                    if remove_tile(field, tile.slot, tile.at, round, requests) {
                        report.removed += 1;
                    }
                }
            }

            self.phase = CascadePhase::Compressing;
            report.slides += compress_columns(field, round, requests);

            self.phase = CascadePhase::Refilling;
            let filled = refill(field, rng, round, requests, sink);
            report.refilled += filled.filled;
            report.overflows += filled.overflows;

            report.matches.append(&mut matches);
            report.rounds = round + 1;

            self.phase = CascadePhase::EvaluatingMatches;
            round += 1;
            matches = find_matches(&*field, self.minimum_match_count, round);
        }

        self.phase = CascadePhase::Idle;
        Ok(report)
    }
}

/// Mark and take a tile off the board, once. Returns false if it was already gone.
fn remove_tile(
    field: &mut Playfield,
    slot: TileSlotId,
    at: Coord,
    round: u32,
    requests: &mut RequestBatch,
) -> bool {
    if field.slot_at(at) != Some(slot) || !field.mark_for_recycling(slot, round) {
        return false;
    }
    field.vacate(at);
    requests.push(slot, at, round, AnimationKind::Recycling);
    true
}

/// Let every column settle downward. Returns the number of single-row slides.
pub fn compress_columns(field: &mut Playfield, round: u32, requests: &mut RequestBatch) -> usize {
    let size = field.size();
    let mut slides = 0;

    for column in 0..size {
        // Next row to fill, counting up from the bottom
        let mut write = size;
        for read in (0..size).rev() {
            let from = Coord::new(read, column);
            let Some(slot) = field.slot_at(from) else {
                continue;
            };
            write -= 1;
            for row in read..write {
                field.swap(Coord::new(row, column), Coord::new(row + 1, column));
                requests.push(slot, Coord::new(row + 1, column), round, AnimationKind::Animated);
                slides += 1;
            }
        }
    }

    slides
}

/// Fill every empty cell from the pool, row-major
pub fn refill<R, S>(
    field: &mut Playfield,
    rng: &mut R,
    round: u32,
    requests: &mut RequestBatch,
    sink: &S,
) -> RefillOutcome
where
    R: RandomSource + ?Sized,
    S: EventSink + ?Sized,
{
    let mut outcome = RefillOutcome::default();
    let empty: Vec<Coord> = field
        .board()
        .coords()
        .filter(|at| field.slot_at(*at).is_none())
        .collect();

    for at in empty {
        let pulled = field.pull_into(at, rng);
        if pulled.overflow {
            outcome.overflows += 1;
            sink.pool_overflow(pulled.id, field.pool().len());
        }
        requests.push(pulled.id, at, round, AnimationKind::Static);
        requests.push(pulled.id, at, round, AnimationKind::Animated);
        outcome.filled += 1;
    }

    outcome
}
