//! Animation sequencer - round-based handshake with the presentation layer
//!
//! Board states cycle `Playable -> ProcessingTurn -> AnimatingMoveResults -> Playable`,
//! with `Initializing` before the first board exists. Input is accepted only while
//! `Playable`.
//!
//! While animating, requests of the current round are released one at a time in
//! emission order. A tile's `Animated` drop is held back while its `Static` placement
//! is still in flight. A round advances once all of its requests are dispatched and
//! acknowledged; the turn completes when the last round does.
//!
//! Acknowledging an unknown, undispatched or repeated request is a contract breach
//! and reported as a [`SequencerError`].

use std::collections::VecDeque;

use crate::error::SequencerError;
use crate::request::{AnimationRequest, RequestId};
use crate::types::{AnimationKind, BoardState};

/// What an acknowledgement did to the round accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// The current round still has requests out
    Pending,
    /// A round completed; `round` is now playing
    RoundAdvanced { round: u32 },
    /// The last round completed and the board is playable again
    TurnComplete,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationSequencer {
    state: BoardState,
    pending: VecDeque<AnimationRequest>,
    in_flight: Vec<AnimationRequest>,
    processing_round: u32,
    rounds_to_process: u32,
}

impl AnimationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn processing_round(&self) -> u32 {
        self.processing_round
    }

    pub fn rounds_to_process(&self) -> u32 {
        self.rounds_to_process
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &AnimationRequest> {
        self.pending.iter()
    }

    /// Board generated; accept input
    pub fn finish_initializing(&mut self) {
        self.reset();
        self.state = BoardState::Playable;
    }

    /// Drop all queued work and return to `Initializing`
    pub fn reset(&mut self) {
        self.state = BoardState::Initializing;
        self.pending.clear();
        self.in_flight.clear();
        self.processing_round = 0;
        self.rounds_to_process = 0;
    }

    /// Lock input for a validated swap. Returns false unless `Playable`.
    pub fn begin_turn(&mut self) -> bool {
        if self.state != BoardState::Playable {
            return false;
        }
        self.state = BoardState::ProcessingTurn;
        true
    }

    /// The swap produced nothing; unlock input
    pub fn reject(&mut self) {
        if self.state == BoardState::ProcessingTurn {
            self.state = BoardState::Playable;
        }
    }

    /// Hand over the resolved turn for playback.
    ///
    /// Returns `TurnComplete` straight away when there is nothing to play.
    pub fn start_animating(
        &mut self,
        requests: Vec<AnimationRequest>,
        rounds_to_process: u32,
    ) -> AckOutcome {
        self.pending = requests.into();
        self.in_flight.clear();
        self.processing_round = 0;
        self.rounds_to_process = rounds_to_process;
        self.state = BoardState::AnimatingMoveResults;
        self.advance_finished_rounds()
    }

    /// Release the next request of the current round, if it may play now
    pub fn next_request(&mut self) -> Option<AnimationRequest> {
        if self.state != BoardState::AnimatingMoveResults {
            return None;
        }

        let front = self.pending.front()?;
        if front.round != self.processing_round {
            return None;
        }
        if front.kind == AnimationKind::Animated && self.static_in_flight(front) {
            return None;
        }

        let request = self.pending.pop_front()?;
        self.in_flight.push(request);
        Some(request)
    }

    fn static_in_flight(&self, request: &AnimationRequest) -> bool {
        self.in_flight
            .iter()
            .any(|r| r.tile == request.tile && r.kind == AnimationKind::Static)
    }

    /// Record that the presentation layer finished `id`
    pub fn ack(&mut self, id: RequestId) -> Result<AckOutcome, SequencerError> {
        if self.state != BoardState::AnimatingMoveResults {
            return Err(SequencerError::NotAnimating(self.state));
        }

        let Some(index) = self.in_flight.iter().position(|r| r.id == id) else {
            if self.pending.iter().any(|r| r.id == id) {
                return Err(SequencerError::NotDispatched(id));
            }
            return Err(SequencerError::UnknownRequest(id));
        };
        self.in_flight.swap_remove(index);

        Ok(self.advance_finished_rounds())
    }

    fn round_finished(&self) -> bool {
        self.in_flight.is_empty()
            && self
                .pending
                .front()
                .map_or(true, |r| r.round != self.processing_round)
    }

    fn advance_finished_rounds(&mut self) -> AckOutcome {
        let mut advanced = false;
        while self.processing_round < self.rounds_to_process && self.round_finished() {
            self.processing_round += 1;
            advanced = true;
        }

        if self.processing_round >= self.rounds_to_process && self.in_flight.is_empty() {
            self.pending.clear();
            self.state = BoardState::Playable;
            AckOutcome::TurnComplete
        } else if advanced {
            AckOutcome::RoundAdvanced {
                round: self.processing_round,
            }
        } else {
            AckOutcome::Pending
        }
    }
}
