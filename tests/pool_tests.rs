//! Pool tests - slot conservation, overflow and maintenance through the engine

use std::cell::Cell;
use std::time::{Duration, Instant};

use gem_cascade::core::{EngineConfig, EventSink, GameBoard, SimpleRng, TilePool};
use gem_cascade::types::{TileSlotId, POOL_WAIT_MS};

#[derive(Default)]
struct OverflowCounter {
    overflows: Cell<usize>,
}

impl EventSink for OverflowCounter {
    fn pool_overflow(&self, _slot: TileSlotId, _pool_size: usize) {
        self.overflows.set(self.overflows.get() + 1);
    }
}

fn play_turns<S: EventSink>(board: &mut GameBoard<SimpleRng, S>, turns: usize) {
    for _ in 0..turns {
        let mv = board.possible_moves()[0];
        let target = mv.target(board.config().tile_count).unwrap();
        board.try_swap(mv.origin, target).unwrap();
        board.settle().unwrap();
    }
}

#[test]
fn test_default_pool_is_conserved_across_turns() {
    let config = EngineConfig::default().with_seed(4);
    let mut board =
        GameBoard::with_parts(config, SimpleRng::new(4), OverflowCounter::default()).unwrap();
    board.generate().unwrap();
    let size = board.field().pool().len();
    assert!(size >= 81 + 40);

    play_turns(&mut board, 10);

    let pool = board.field().pool();
    assert_eq!(pool.available_count() + pool.unavailable_count(), pool.len());
    assert_eq!(pool.unavailable_count(), 81);
    assert_eq!(pool.marked_count(), 0);
    if board.sink().overflows.get() == 0 && board.reshuffles() == 0 {
        assert_eq!(pool.len(), size);
    }
}

#[test]
fn test_tight_pool_overflows_then_trims() {
    let config = EngineConfig {
        pool_size: Some(81),
        pool_cleanup_ms: 1_000,
        seed: 8,
        ..EngineConfig::default()
    };
    let mut board =
        GameBoard::with_parts(config, SimpleRng::new(8), OverflowCounter::default()).unwrap();
    board.generate().unwrap();
    // Drop whatever silent generation allocated
    board.maintain(1_000);
    assert_eq!(board.field().pool().len(), 81);

    play_turns(&mut board, 1);

    let grown = board.field().pool().len();
    let overflows = board.sink().overflows.get();
    assert!(overflows >= 3);
    assert!(grown >= 81 + overflows);

    assert_eq!(board.maintain(10), 0);
    assert_eq!(board.maintain(1_000), grown - 81);
    assert_eq!(board.field().pool().len(), 81);
    assert!(board.field().board().is_full());
    assert!(board.field().positions_consistent());

    // Play continues on the trimmed pool
    play_turns(&mut board, 1);
}

#[test]
fn test_overflow_during_turn_does_not_wait_on_presentation() {
    let config = EngineConfig {
        pool_size: Some(81),
        pool_wait_ms: 10_000,
        pool_cleanup_ms: 1_000,
        seed: 8,
        ..EngineConfig::default()
    };
    let mut board =
        GameBoard::with_parts(config, SimpleRng::new(8), OverflowCounter::default()).unwrap();
    board.generate().unwrap();
    board.maintain(1_000);
    let _presentation = board.pool_handle();

    let started = Instant::now();
    play_turns(&mut board, 2);
    assert!(board.sink().overflows.get() >= 3);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_maintain_is_idle_at_target_size() {
    let mut pool = TilePool::new(8).with_cleanup_ms(0);
    assert_eq!(pool.maintain(1_000_000), 0);
    assert_eq!(pool.len(), 8);
}

#[test]
fn test_returned_slot_is_reused_before_overflow() {
    let mut pool = TilePool::new(2).with_wait_ms(POOL_WAIT_MS);
    let a = pool.acquire().id;
    let b = pool.acquire().id;
    assert!(pool.mark_for_recycling(a, 0));

    let handle = pool.return_handle();
    assert!(handle.release(a));

    let next = pool.acquire();
    assert!(!next.overflow);
    assert_eq!(next.id, a);
    assert_ne!(next.id, b);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_release_after_pool_dropped_reports_failure() {
    let pool = TilePool::new(1);
    let handle = pool.return_handle();
    drop(pool);
    assert!(!handle.release(TileSlotId(0)));
}
