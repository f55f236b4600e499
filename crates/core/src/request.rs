//! Animation requests - what the presentation layer should play
//!
//! The board is already final when a request is emitted; requests only describe how
//! to get the picture there. Each must be acknowledged exactly once by id.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AnimationKind, Coord, TileSlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub id: RequestId,
    pub tile: TileSlotId,
    /// Cell the tile ends up in (or is removed from, for `Recycling`)
    pub target: Coord,
    pub round: u32,
    pub kind: AnimationKind,
}

/// Ordered requests for one turn, numbered from a running counter.
///
/// A disabled batch numbers nothing and keeps nothing; silent resolution uses it.
#[derive(Debug, Clone, Default)]
pub struct RequestBatch {
    next_id: u64,
    enabled: bool,
    requests: Vec<AnimationRequest>,
}

impl RequestBatch {
    pub fn starting_at(next_id: u64) -> Self {
        Self {
            next_id,
            enabled: true,
            requests: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn push(
        &mut self,
        tile: TileSlotId,
        target: Coord,
        round: u32,
        kind: AnimationKind,
    ) -> Option<RequestId> {
        if !self.enabled {
            return None;
        }
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.requests.push(AnimationRequest {
            id,
            tile,
            target,
            round,
            kind,
        });
        Some(id)
    }

    /// Id the next batch should start from
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[AnimationRequest] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<AnimationRequest> {
        self.requests
    }
}
