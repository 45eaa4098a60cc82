//! Expectimax search policy for 2048.
//!
//! [`Expectimax`] alternates max nodes (the agent picks a direction) and
//! chance nodes (a 2-tile appears on an empty cell) down to a fixed depth,
//! scoring leaves with [`heuristic::evaluate_grid`].
//!
//! Notes
//! - Search works on a private [`crate::simulator::Simulator`]; the caller's
//!   snapshot is only read.
//! - Expectimax is deterministic; randomness only occurs when a game loop
//!   calls `Simulator::spawn_random_tile`.
//!
//! Quick start
//! ```
//! use agent_2048::engine::{BoardSnapshot, Direction};
//! use agent_2048::expectimax::{Expectimax, ExpectimaxConfig};
//!
//! let board = BoardSnapshot::from_rows([[0, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
//! let mut ex = Expectimax::with_config(ExpectimaxConfig { depth: 3, ..Default::default() });
//! // Up cannot move anything on this board, so it is never chosen.
//! assert_ne!(ex.select_move(&board), Direction::Up);
//! ```

use crate::engine::Direction;

pub mod heuristic;
mod search_seq;

pub use search_seq::Expectimax;

/// Search depth counted in plies from the root decision.
pub const DEFAULT_DEPTH: u32 = 5;

/// Weight applied to every modelled spawn at a chance node.
pub const CHANCE_DISCOUNT: f64 = 0.9;

/// Value of a position from which no direction changes the board.
///
/// Lies far below any score the heuristic can produce, so a legal branch
/// always beats it.
pub const NO_MOVE_SCORE: f64 = -999_999_999_999.0;

/// How the monotone tiers of [`heuristic::line_difference`] are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tiering {
    /// Length tiers never match; only the `-10` / `-5` fallbacks apply.
    /// The evaluation weights were tuned against this behaviour.
    #[default]
    Reference,
    /// Compare tiers against the length of the row or column being scored.
    SequenceLength,
}

/// Search parameters: depth, spawn weighting, and smoothness tiers.
///
/// - `depth`: plies searched from the root decision.
/// - `chance_discount`: weight on the modelled 2-tile spawn at chance nodes.
/// - `tiering`: smoothness tier selection in the evaluation.
#[derive(Debug, Clone)]
pub struct ExpectimaxConfig {
    pub depth: u32,
    pub chance_discount: f64,
    pub tiering: Tiering,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self { depth: DEFAULT_DEPTH, chance_discount: CHANCE_DISCOUNT, tiering: Tiering::default() }
    }
}

/// Value of one root direction.
///
/// - `ev` is the expected value for taking `dir` from the current board.
/// - `legal` is false when the move is a no-op; `ev` is then [`NO_MOVE_SCORE`].
#[derive(Debug, Clone, Copy)]
pub struct BranchEval {
    pub dir: Direction,
    pub ev: f64,
    pub legal: bool,
}

/// Node counts gathered while choosing one move.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub peak_nodes: u64,
}

/// Direction with the strictly highest value among legal branches.
///
/// Ties keep the lowest index; with no legal branch the result is `Up`.
pub(crate) fn pick_direction(branches: &[BranchEval; 4]) -> Direction {
    let mut best: Option<&BranchEval> = None;
    for branch in branches.iter().filter(|b| b.legal) {
        if best.map_or(true, |b| branch.ev > b.ev) {
            best = Some(branch);
        }
    }
    best.map_or(Direction::Up, |b| b.dir)
}
