use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use santorini_game_types::board_representation::geometry::{direction_offsets, legal_directions};
use santorini_game_types::board_fixture;
use santorini_game_types::board_representation::{CellIndex, BOARD_WIDTH, CELL_COUNT};
use santorini_game_types::notation;
use santorini_game_types::types::NeighborDeterminableGame;

fn bench_legal_directions(c: &mut Criterion) {
    let offsets = direction_offsets(BOARD_WIDTH);
    let mut rng = SmallRng::from_entropy();
    c.bench_function("legal directions random cell", |b| {
        b.iter(|| {
            let cell = rng.gen_range(0..i32::from(CELL_COUNT));
            legal_directions(BOARD_WIDTH, black_box(&offsets), cell)
        })
    });
}

fn bench_neighbor_highlight(c: &mut Criterion) {
    let board = board_fixture("2ff1/1srrt/4t/3ff/1ssf1 p 4p13 5P20");
    let mut rng = SmallRng::from_entropy();
    c.bench_function("neighbor highlight", |b| {
        b.iter(|| {
            let cell = CellIndex(rng.gen_range(0..CELL_COUNT));
            board.neighbors(black_box(&cell))
        })
    });
}

fn bench_notation_validation(c: &mut Criterion) {
    c.bench_function("notation validation", |b| {
        b.iter(|| notation::is_valid(black_box("2ff1/1srrt/4t/3ff/1ssf1 p 4p13 5P20")))
    });
}

criterion_group!(
    benches,
    bench_legal_directions,
    bench_neighbor_highlight,
    bench_notation_validation
);
criterion_main!(benches);
