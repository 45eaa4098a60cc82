use agent_2048::engine::{BoardSnapshot, Direction, Grid};
use agent_2048::simulator::Simulator;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = vec![Grid::EMPTY];
    let mut sim = Simulator::new(&BoardSnapshot::empty());
    sim.spawn_random_tile(&mut rng);
    sim.spawn_random_tile(&mut rng);
    boards.push(*sim.grid());
    // Derive a variety of densities deterministically
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..20 {
        if sim.apply_move(seq[i % seq.len()]) {
            sim.spawn_random_tile(&mut rng);
        }
        boards.push(*sim.grid());
    }
    boards
}

fn bench_apply_move(c: &mut Criterion) {
    let boards = corpus();
    for dir in Direction::ALL {
        c.bench_function(&format!("apply_move/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &grid in &boards {
                    let mut sim = Simulator::from_grid(grid);
                    if sim.apply_move(dir) { acc += 1; }
                    acc = acc.wrapping_add(sim.score());
                }
                black_box(acc)
            })
        });
    }
}

fn bench_checkpoint_and_spawn(c: &mut Criterion) {
    c.bench_function("simulator/spawn_random_tile", |bch| {
        bch.iter_batched(
            || (Simulator::new(&BoardSnapshot::empty()), StdRng::seed_from_u64(7)),
            |(mut sim, mut rng)| {
                for _ in 0..16 { sim.spawn_random_tile(&mut rng); }
                black_box(sim.score())
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("simulator/checkpoint_restore", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0usize;
            for &grid in &boards {
                let mut sim = Simulator::from_grid(grid);
                let cp = sim.checkpoint();
                sim.apply_move(Direction::Left);
                sim.restore(&cp);
                acc ^= sim.available_cells().len();
            }
            black_box(acc)
        })
    });
}

fn bench_snapshots(c: &mut Criterion) {
    c.bench_function("grid/serialize_roundtrip", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0u32;
            for grid in &boards { acc ^= Grid::from_snapshot(&grid.serialize()).highest_tile(); }
            black_box(acc)
        })
    });
}

criterion_group!(engine_ops, bench_apply_move, bench_checkpoint_and_spawn, bench_snapshots);
criterion_main!(engine_ops);
