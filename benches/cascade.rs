use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gem_cascade::core::{
    find_matches, find_possible_moves, EngineConfig, GameBoard, NoopSink, SimpleRng,
};

fn quiet_board(seed: u32) -> GameBoard<SimpleRng, NoopSink> {
    let config = EngineConfig::default().with_seed(seed);
    let mut board = GameBoard::with_parts(config, SimpleRng::new(seed), NoopSink).unwrap();
    board.generate().unwrap();
    board
}

fn bench_match_scan(c: &mut Criterion) {
    let board = quiet_board(12345);

    c.bench_function("match_scan_9x9", |b| {
        b.iter(|| find_matches(black_box(board.field()), 3, 0))
    });
}

fn bench_move_prediction(c: &mut Criterion) {
    let board = quiet_board(12345);

    c.bench_function("predict_moves_9x9", |b| {
        b.iter(|| find_possible_moves(black_box(board.field()), 3))
    });
}

fn bench_generate(c: &mut Criterion) {
    let mut board = quiet_board(12345);

    c.bench_function("generate_9x9", |b| {
        b.iter(|| {
            board.generate().unwrap();
        })
    });
}

fn bench_settled_turn(c: &mut Criterion) {
    let mut board = quiet_board(12345);

    c.bench_function("settled_turn", |b| {
        b.iter(|| {
            let mv = board.possible_moves()[0];
            let target = mv.target(board.config().tile_count).unwrap();
            board.try_swap(mv.origin, target).unwrap();
            board.settle().unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_match_scan,
    bench_move_prediction,
    bench_generate,
    bench_settled_turn
);
criterion_main!(benches);
