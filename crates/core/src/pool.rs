//! Tile pool - reusable tile slot carriers
//!
//! The pool pre-allocates its target number of slots and hands out the lowest free
//! one on `pull`. Matched tiles are only marked for recycling while the presentation
//! layer may still reference them; [`TilePool::recycle_all_marked`] returns them to the
//! free set between rounds.
//!
//! # Exhaustion
//!
//! When nothing is free, `pull` drains slots handed back through [`PoolReturn`] handles.
//! If a handle is still alive it waits on the return channel for up to the wait budget.
//! After that (or straight away when no handle exists) it allocates an overflow slot.
//! `pull_now` skips the wait; the playfield uses it, since nothing can come back while
//! a cascade is resolving. Capacity is advisory: a pull never fails.
//!
//! # Maintenance
//!
//! [`TilePool::maintain`] is fed elapsed time. Once the pool has stayed above its
//! target size for the cleanup window, free slots are trimmed least recently released
//! first.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::behavior::{BehaviorTable, TileBehavior};
use crate::config::EngineConfig;
use crate::rng::RandomSource;
use crate::types::{Coord, GemKind, TileSlotId, MAX_SPECIALS, POOL_CLEANUP_MS, POOL_WAIT_MS};

/// A pooled tile carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSlot {
    pub id: TileSlotId,
    pub gem: GemKind,
    /// Mirrors the board cell holding the slot; `None` while the slot is off the board
    pub position: Option<Coord>,
    pub behavior: TileBehavior,
    available: bool,
    /// Round the slot was marked for recycling in
    recycle_mark: Option<u32>,
    last_released_ms: u64,
}

impl TileSlot {
    fn fresh(id: TileSlotId) -> Self {
        Self {
            id,
            gem: GemKind::UNKNOWN,
            position: None,
            behavior: TileBehavior::Default,
            available: true,
            recycle_mark: None,
            last_released_ms: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_marked_for_recycling(&self) -> bool {
        self.recycle_mark.is_some()
    }
}

/// Result of a pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullOutcome {
    pub id: TileSlotId,
    /// True when the pool had to grow past its free slots
    pub overflow: bool,
}

/// Handle for returning slots to a pool from another thread.
///
/// A pull that finds the pool empty waits on these handles while any is alive.
#[derive(Debug, Clone)]
pub struct PoolReturn {
    tx: Sender<TileSlotId>,
    _token: Arc<()>,
}

impl PoolReturn {
    /// Hand a slot back. Returns false once the pool is gone.
    pub fn release(&self, slot: TileSlotId) -> bool {
        self.tx.send(slot).is_ok()
    }
}

#[derive(Debug)]
pub struct TilePool {
    slots: BTreeMap<TileSlotId, TileSlot>,
    available: BTreeSet<TileSlotId>,
    next_id: u32,
    target_size: usize,
    max_specials: usize,
    behaviors: BehaviorTable,
    wait: Duration,
    cleanup_after_ms: u64,
    clock_ms: u64,
    oversize_ms: u64,
    returns_tx: Sender<TileSlotId>,
    returns_rx: Receiver<TileSlotId>,
    return_token: Arc<()>,
}

impl TilePool {
    /// Pool with `target_size` pre-allocated slots and default limits
    pub fn new(target_size: usize) -> Self {
        let (returns_tx, returns_rx) = mpsc::channel();
        let mut pool = Self {
            slots: BTreeMap::new(),
            available: BTreeSet::new(),
            next_id: 0,
            target_size,
            max_specials: MAX_SPECIALS,
            behaviors: BehaviorTable::default(),
            wait: Duration::from_millis(POOL_WAIT_MS),
            cleanup_after_ms: POOL_CLEANUP_MS,
            clock_ms: 0,
            oversize_ms: 0,
            returns_tx,
            returns_rx,
            return_token: Arc::new(()),
        };
        for _ in 0..target_size {
            pool.allocate();
        }
        pool
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.pool_capacity())
            .with_max_specials(config.max_specials)
            .with_behaviors(BehaviorTable::from_odds(&config.behavior_odds))
            .with_wait_ms(config.pool_wait_ms)
            .with_cleanup_ms(config.pool_cleanup_ms)
    }

    pub fn with_max_specials(mut self, max_specials: usize) -> Self {
        self.max_specials = max_specials;
        self
    }

    pub fn with_behaviors(mut self, behaviors: BehaviorTable) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn with_wait_ms(mut self, wait_ms: u64) -> Self {
        self.wait = Duration::from_millis(wait_ms);
        self
    }

    pub fn with_cleanup_ms(mut self, cleanup_ms: u64) -> Self {
        self.cleanup_after_ms = cleanup_ms;
        self
    }

    fn allocate(&mut self) -> TileSlotId {
        let id = TileSlotId(self.next_id);
        self.next_id += 1;
        self.slots.insert(id, TileSlot::fresh(id));
        self.available.insert(id);
        id
    }

    /// A handle other threads can return slots through
    pub fn return_handle(&self) -> PoolReturn {
        PoolReturn {
            tx: self.returns_tx.clone(),
            _token: Arc::clone(&self.return_token),
        }
    }

    fn handles_alive(&self) -> bool {
        Arc::strong_count(&self.return_token) > 1
    }

    /// Take the lowest free slot without assigning a behavior, waiting on live
    /// return handles when nothing is free
    pub fn acquire(&mut self) -> PullOutcome {
        self.take_slot(true)
    }

    /// Like [`TilePool::acquire`], but overflows at once instead of waiting
    pub fn acquire_now(&mut self) -> PullOutcome {
        self.take_slot(false)
    }

    /// Take the lowest free slot and roll its behavior.
    ///
    /// A special behavior is only possible while fewer than `max_specials` live slots
    /// carry one.
    pub fn pull<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> PullOutcome {
        let outcome = self.take_slot(true);
        self.roll_behavior(outcome.id, rng);
        outcome
    }

    /// Non-waiting [`TilePool::pull`], for callers that cannot receive returns
    /// until they finish (a cascade resolving in place)
    pub fn pull_now<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> PullOutcome {
        let outcome = self.take_slot(false);
        self.roll_behavior(outcome.id, rng);
        outcome
    }

    fn take_slot(&mut self, wait: bool) -> PullOutcome {
        self.drain_returns();

        if wait && self.available.is_empty() && self.handles_alive() {
            self.wait_for_return();
        }

        let (id, overflow) = match self.available.pop_first() {
            Some(id) => (id, false),
            None => {
                let id = self.allocate();
                self.available.remove(&id);
                (id, true)
            }
        };

        if let Some(slot) = self.slots.get_mut(&id) {
            slot.available = false;
            slot.recycle_mark = None;
            slot.behavior = TileBehavior::Default;
        }

        PullOutcome { id, overflow }
    }

    fn roll_behavior<R: RandomSource + ?Sized>(&mut self, id: TileSlotId, rng: &mut R) {
        if self.live_specials() < self.max_specials {
            let behavior = self.behaviors.draw(rng);
            if let Some(slot) = self.slots.get_mut(&id) {
                slot.behavior = behavior;
            }
        }
    }

    fn drain_returns(&mut self) {
        while let Ok(id) = self.returns_rx.try_recv() {
            self.recycle(id);
        }
    }

    fn wait_for_return(&mut self) {
        let deadline = Instant::now() + self.wait;
        while self.available.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            match self.returns_rx.recv_timeout(remaining) {
                Ok(id) => {
                    self.recycle(id);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    /// Mark a live slot for recycling once `round` has played.
    /// Returns false if it already was marked, or is free.
    pub fn mark_for_recycling(&mut self, id: TileSlotId, round: u32) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) if !slot.available && slot.recycle_mark.is_none() => {
                slot.recycle_mark = Some(round);
                true
            }
            _ => false,
        }
    }

    fn recycle(&mut self, id: TileSlotId) -> bool {
        let clock = self.clock_ms;
        match self.slots.get_mut(&id) {
            Some(slot) if slot.recycle_mark.is_some() => {
                slot.gem = GemKind::UNKNOWN;
                slot.behavior = TileBehavior::Default;
                slot.position = None;
                slot.recycle_mark = None;
                slot.available = true;
                slot.last_released_ms = clock;
                self.available.insert(id);
                true
            }
            _ => false,
        }
    }

    /// Return every marked slot to the free set, returning how many were recycled
    pub fn recycle_all_marked(&mut self) -> usize {
        self.recycle_marked_through(u32::MAX)
    }

    /// Recycle slots marked in `round` or earlier
    pub fn recycle_marked_through(&mut self, round: u32) -> usize {
        self.drain_returns();
        let marked: Vec<TileSlotId> = self
            .slots
            .values()
            .filter(|s| s.recycle_mark.is_some_and(|r| r <= round))
            .map(|s| s.id)
            .collect();
        marked.into_iter().filter(|id| self.recycle(*id)).count()
    }

    /// Advance the maintenance clock, trimming if oversized past the cleanup window.
    /// Returns the number of slots trimmed.
    pub fn maintain(&mut self, elapsed_ms: u64) -> usize {
        self.drain_returns();
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);

        if self.slots.len() <= self.target_size {
            self.oversize_ms = 0;
            return 0;
        }

        self.oversize_ms = self.oversize_ms.saturating_add(elapsed_ms);
        if self.oversize_ms < self.cleanup_after_ms {
            return 0;
        }
        self.oversize_ms = 0;

        let mut idle: Vec<(u64, TileSlotId)> = self
            .available
            .iter()
            .filter_map(|id| self.slots.get(id))
            .map(|s| (s.last_released_ms, s.id))
            .collect();
        idle.sort_unstable();

        let excess = self.slots.len() - self.target_size;
        let mut trimmed = 0;
        for (_, id) in idle.into_iter().take(excess) {
            self.available.remove(&id);
            self.slots.remove(&id);
            trimmed += 1;
        }
        trimmed
    }

    pub fn get(&self, id: TileSlotId) -> Option<&TileSlot> {
        self.slots.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TileSlotId) -> Option<&mut TileSlot> {
        self.slots.get_mut(&id)
    }

    /// Live slots carrying a special behavior
    pub fn live_specials(&self) -> usize {
        self.slots
            .values()
            .filter(|s| !s.available && s.behavior.is_special())
            .count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn unavailable_count(&self) -> usize {
        self.slots.len() - self.available.len()
    }

    pub fn marked_count(&self) -> usize {
        self.slots
            .values()
            .filter(|s| s.recycle_mark.is_some())
            .count()
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    pub fn slots(&self) -> impl Iterator<Item = &TileSlot> {
        self.slots.values()
    }
}
