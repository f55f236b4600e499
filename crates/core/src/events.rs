//! Observation port for the engine.
//!
//! The engine reports what happens through an injected [`EventSink`] rather than a
//! global logger. All methods default to doing nothing, so a sink only implements
//! what it cares about.
//!
//! [`TracingSink`] forwards everything to `tracing`; installing a subscriber is up to
//! the application.

use tracing::{debug, info, trace, warn};

use crate::matcher::MatchDetails;
use crate::playfield::Playfield;
use crate::scoring::{BehaviorTrigger, ScoreDelta};
use crate::types::{Coord, TileSlotId};

pub trait EventSink {
    fn match_found(&self, _matched: &MatchDetails) {}

    fn behavior_triggered(&self, _trigger: &BehaviorTrigger, _round: u32) {}

    fn score_changed(&self, _delta: &ScoreDelta) {}

    /// A round finished animating; `round` is the next round to play
    fn round_advanced(&self, _round: u32, _rounds_to_process: u32) {}

    fn swap_accepted(&self, _a: Coord, _b: Coord, _matches: usize) {}

    fn swap_rejected(&self, _a: Coord, _b: Coord) {}

    fn turn_completed(&self, _rounds: u32, _total_score: i64, _possible_moves: usize) {}

    fn board_generated(&self, _field: &Playfield, _attempts: u32) {}

    fn board_reshuffled(&self, _field: &Playfield) {}

    fn pool_overflow(&self, _slot: TileSlotId, _pool_size: usize) {}
}

/// Discards every observation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {}

/// Structured `tracing` events for every observation point
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn match_found(&self, matched: &MatchDetails) {
        debug!(
            gem = %matched.gem(),
            tiles = matched.len(),
            direction = matched.direction.as_str(),
            round = matched.round,
            "match found"
        );
    }

    fn behavior_triggered(&self, trigger: &BehaviorTrigger, round: u32) {
        debug!(
            tile = %trigger.slot,
            behavior = trigger.behavior.name(),
            score_delta = trigger.score_delta,
            effects = trigger.effects,
            round,
            "behavior triggered"
        );
    }

    fn score_changed(&self, delta: &ScoreDelta) {
        debug!(
            base = delta.base,
            bonus = delta.bonus,
            behavior = delta.behavior,
            total = delta.new_total,
            round = delta.round,
            "{}{}",
            delta.direction.sign(),
            delta.change.abs()
        );
    }

    fn round_advanced(&self, round: u32, rounds_to_process: u32) {
        debug!(round, rounds_to_process, "round advanced");
    }

    fn swap_accepted(&self, a: Coord, b: Coord, matches: usize) {
        debug!(%a, %b, matches, "swap accepted");
    }

    fn swap_rejected(&self, a: Coord, b: Coord) {
        debug!(%a, %b, "swap rejected");
    }

    fn turn_completed(&self, rounds: u32, total_score: i64, possible_moves: usize) {
        info!(rounds, total_score, possible_moves, "turn completed");
    }

    fn board_generated(&self, field: &Playfield, attempts: u32) {
        info!(size = field.board().size(), attempts, "board generated");
        trace!("board:\n{}", field);
    }

    fn board_reshuffled(&self, field: &Playfield) {
        warn!("no moves left, board reshuffled");
        trace!("board:\n{}", field);
    }

    fn pool_overflow(&self, slot: TileSlotId, pool_size: usize) {
        warn!(tile = %slot, pool_size, "tile pool exhausted, allocated overflow slot");
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn match_found(&self, matched: &MatchDetails) {
        (**self).match_found(matched)
    }

    fn behavior_triggered(&self, trigger: &BehaviorTrigger, round: u32) {
        (**self).behavior_triggered(trigger, round)
    }

    fn score_changed(&self, delta: &ScoreDelta) {
        (**self).score_changed(delta)
    }

    fn round_advanced(&self, round: u32, rounds_to_process: u32) {
        (**self).round_advanced(round, rounds_to_process)
    }

    fn swap_accepted(&self, a: Coord, b: Coord, matches: usize) {
        (**self).swap_accepted(a, b, matches)
    }

    fn swap_rejected(&self, a: Coord, b: Coord) {
        (**self).swap_rejected(a, b)
    }

    fn turn_completed(&self, rounds: u32, total_score: i64, possible_moves: usize) {
        (**self).turn_completed(rounds, total_score, possible_moves)
    }

    fn board_generated(&self, field: &Playfield, attempts: u32) {
        (**self).board_generated(field, attempts)
    }

    fn board_reshuffled(&self, field: &Playfield) {
        (**self).board_reshuffled(field)
    }

    fn pool_overflow(&self, slot: TileSlotId, pool_size: usize) {
        (**self).pool_overflow(slot, pool_size)
    }
}
