use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cedar_chess::move_generation::generator::generate_moves;
use cedar_chess::notation::fen::{board_from_fen, INITIAL_POSITION_FEN};

struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_moves: usize,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: INITIAL_POSITION_FEN,
        expected_moves: 20,
    },
    BenchCase {
        name: "open_middlegame",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        expected_moves: 46,
    },
    BenchCase {
        name: "rook_endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_moves: 14,
    },
];

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_moves");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));

    for case in CASES {
        let mut board = board_from_fen(case.fen).expect("benchmark FEN should parse");

        // correctness guard before benchmarking
        assert_eq!(generate_moves(&mut board).len(), case.expected_moves);

        group.bench_with_input(BenchmarkId::from_parameter(case.name), case.fen, |b, _| {
            b.iter(|| {
                let moves = generate_moves(black_box(&mut board));
                black_box(moves.len())
            });
        });
    }

    group.finish();
}

criterion_group!(movegen_benches, bench_movegen);
criterion_main!(movegen_benches);
