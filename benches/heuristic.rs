use agent_2048::engine::{BoardSnapshot, Direction, Grid};
use agent_2048::expectimax::{heuristic, Tiering};
use agent_2048::simulator::Simulator;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(1337);
    let mut boards = vec![Grid::EMPTY];
    let mut sim = Simulator::new(&BoardSnapshot::empty());
    sim.spawn_random_tile(&mut rng);
    sim.spawn_random_tile(&mut rng);
    boards.push(*sim.grid());
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..24 {
        if sim.apply_move(seq[i % seq.len()]) {
            sim.spawn_random_tile(&mut rng);
        }
        boards.push(*sim.grid());
    }
    boards
}

fn bench_heuristic(c: &mut Criterion) {
    let boards = corpus();
    for (name, tiering) in [("sequence_length", Tiering::SequenceLength), ("reference", Tiering::Reference)] {
        c.bench_function(&format!("heuristic/{name}"), |bch| {
            bch.iter(|| {
                let mut acc = 0f64;
                for grid in &boards {
                    let v = heuristic::evaluate_grid(grid, tiering);
                    acc = acc.mul_add(1.000_000_1, v);
                }
                black_box(acc)
            })
        });
    }
}

criterion_group!(benches, bench_heuristic);
criterion_main!(benches);
