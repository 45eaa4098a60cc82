//! agent-2048: move selection for 2048 by Expectimax search
//!
//! This crate provides:
//! - Board primitives (`engine`): `Grid`, `Tile`, `Direction` and the
//!   serializable `BoardSnapshot`
//! - A tile-level move simulator with checkpoint/restore (`simulator`)
//! - A fixed-depth Expectimax policy and its static evaluation (`expectimax`)
//!
//! Quick start:
//! ```
//! use agent_2048::engine::{BoardSnapshot, Direction};
//! use agent_2048::simulator::Simulator;
//!
//! let snapshot = BoardSnapshot::from_rows([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
//! let mut sim = Simulator::new(&snapshot);
//! assert!(sim.apply_move(Direction::Right));
//! assert_eq!(sim.score(), 4);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use agent_2048::engine::BoardSnapshot;
//! use agent_2048::expectimax::{Expectimax, ExpectimaxConfig};
//! use agent_2048::simulator::Simulator;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // 1) Policy with a shallow depth to keep doctests fast
//! let mut policy = Expectimax::with_config(ExpectimaxConfig { depth: 2, ..Default::default() });
//! let mut rng = StdRng::seed_from_u64(123);
//!
//! // 2) Start board with two random tiles
//! let mut game = Simulator::new(&BoardSnapshot::empty());
//! game.spawn_random_tile(&mut rng);
//! game.spawn_random_tile(&mut rng);
//!
//! // 3) The caller applies the chosen move and spawns the next real tile
//! let mut moves = 0u32;
//! while !game.grid().is_game_over() && moves < 4 {
//!     let Some(dir) = policy.best_move(&game.snapshot()) else { break };
//!     assert!(game.apply_move(dir));
//!     game.spawn_random_tile(&mut rng);
//!     moves += 1;
//! }
//! assert!(moves > 0);
//! ```
//!
pub mod engine;
pub mod expectimax;
pub mod simulator;
