//! Property tests over random boards

use proptest::prelude::*;

use gem_cascade::core::cascade::{compress_columns, refill};
use gem_cascade::core::{
    find_matches, find_possible_moves, EngineConfig, GameBoard, GemGrid, NoopSink, Playfield,
    RequestBatch, SimpleRng, TilePool,
};
use gem_cascade::types::Coord;

const LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Square layouts of `size` rows; `holes` adds `.` cells
fn layout(size: usize, holes: bool) -> impl Strategy<Value = Vec<String>> {
    let cell = if holes {
        prop_oneof![
            4 => (0..6usize).prop_map(|i| LETTERS[i]),
            1 => Just('.'),
        ]
        .boxed()
    } else {
        (0..6usize).prop_map(|i| LETTERS[i]).boxed()
    };
    prop::collection::vec(prop::collection::vec(cell, size), size).prop_map(|rows| {
        rows.into_iter()
            .map(|r| r.into_iter().collect::<String>())
            .collect::<Vec<String>>()
    })
}

fn as_strs(rows: &[String]) -> Vec<&str> {
    rows.iter().map(String::as_str).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rejected_swaps_change_nothing(
        rows in layout(6, false),
        a in (0..6usize, 0..6usize),
        b in (0..6usize, 0..6usize),
    ) {
        let rows = as_strs(&rows);
        let mut board = GameBoard::with_layout_and_parts(
            EngineConfig::default(),
            &rows,
            SimpleRng::new(1),
            NoopSink,
        )
        .unwrap();
        let before = board.field().board().clone();
        let score = board.score();

        let outcome = board
            .try_swap(Coord::new(a.0, a.1), Coord::new(b.0, b.1))
            .unwrap();
        if !outcome.accepted {
            prop_assert_eq!(board.field().board(), &before);
            prop_assert!(board.field().positions_consistent());
            prop_assert_eq!(board.score(), score);
            prop_assert_eq!(board.next_request(), None);
        }
    }

    #[test]
    fn generated_boards_are_stable_and_playable(seed in 1u32..u32::MAX, size in 5usize..10) {
        let config = EngineConfig::default().with_tile_count(size).with_seed(seed);
        let mut board = GameBoard::with_parts(config, SimpleRng::new(seed), NoopSink).unwrap();
        board.generate().unwrap();

        prop_assert!(board.field().board().is_full());
        prop_assert!(find_matches(board.field(), 3, 0).is_empty());
        prop_assert!(!find_possible_moves(board.field(), 3).is_empty());
        prop_assert_eq!(board.field().pool().marked_count(), 0);
    }

    #[test]
    fn compression_leaves_no_gaps_and_refill_fills_everything(
        rows in layout(7, true),
        seed in any::<u32>(),
    ) {
        let rows = as_strs(&rows);
        let mut field = Playfield::from_layout(&rows, 6).unwrap();
        let tiles = 49 - field.board().empty_count();
        let mut batch = RequestBatch::starting_at(0);

        compress_columns(&mut field, 0, &mut batch);
        for column in 0..7 {
            let first_tile = (0..7).find(|&row| field.slot_at(Coord::new(row, column)).is_some());
            if let Some(first) = first_tile {
                for row in first..7 {
                    prop_assert!(field.slot_at(Coord::new(row, column)).is_some());
                }
            }
        }
        prop_assert_eq!(49 - field.board().empty_count(), tiles);
        prop_assert!(field.positions_consistent());

        let filled = refill(&mut field, &mut SimpleRng::new(seed), 0, &mut batch, &NoopSink);
        prop_assert_eq!(filled.filled, 49 - tiles);
        prop_assert!(field.board().is_full());
        prop_assert!(field.positions_consistent());
    }

    #[test]
    fn pull_and_recycle_conserve_slots(target in 1usize..40, pulls in 0usize..40) {
        let pulls = pulls.min(target);
        let mut pool = TilePool::new(target);
        let mut rng = SimpleRng::new(3);

        let ids: Vec<_> = (0..pulls).map(|_| pool.pull(&mut rng)).collect();
        prop_assert!(ids.iter().all(|p| !p.overflow));
        prop_assert_eq!(pool.available_count() + pool.unavailable_count(), target);
        prop_assert_eq!(pool.unavailable_count(), pulls);

        for pulled in &ids {
            prop_assert!(pool.mark_for_recycling(pulled.id, 0));
        }
        prop_assert_eq!(pool.recycle_all_marked(), pulls);
        prop_assert_eq!(pool.available_count(), target);
        prop_assert_eq!(pool.len(), target);
    }
}
