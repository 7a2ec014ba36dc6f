//! Perft is the closest thing to an end-to-end benchmark of the move
//! generator: it exercises generation, legality filtering and make/undo in
//! the proportions a real consumer would.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use patzer::chess::board::Board;
use patzer::chess::core::Player;
use patzer::perft::perft;

fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    for (depth, nodes) in [(3, 8_902), (4, 197_281)] {
        group.throughput(Throughput::Elements(nodes));
        group.sample_size(10);
        group.bench_function(format!("depth {depth}"), |b| {
            b.iter(|| {
                let mut board = Board::new();
                assert_eq!(perft(&mut board, Player::White, depth), Ok(nodes));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, perft_bench);
criterion_main!(benches);
