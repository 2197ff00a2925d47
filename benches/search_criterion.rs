use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cedar_chess::board::board::Board;
use cedar_chess::notation::fen::board_from_fen;
use cedar_chess::search::engine::Engine;

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_move");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(8));
    group.sample_size(10);

    let cases: &[(&str, Board)] = &[
        ("startpos", Board::new_game()),
        (
            "tactical",
            board_from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
                .expect("benchmark FEN should parse"),
        ),
    ];

    for depth in [2u32, 3] {
        for (name, board) in cases {
            let bench_name = format!("{name}_d{depth}");
            group.bench_with_input(BenchmarkId::from_parameter(bench_name), board, |b, board| {
                b.iter(|| {
                    let mut engine = Engine::with_depth(depth);
                    engine.start();
                    let mut position = board.clone();
                    black_box(engine.best_move(&mut position))
                });
            });
        }
    }

    group.finish();
}

criterion_group!(search_benches, bench_search);
criterion_main!(search_benches);
