use crate::engine::{BoardSnapshot, Direction, Grid, Tile};
use crate::simulator::Simulator;

use super::heuristic::evaluate_grid;
use super::{pick_direction, BranchEval, ExpectimaxConfig, SearchStats, NO_MOVE_SCORE};

/// Value of the tile modelled at chance nodes. 4-tile spawns are not expanded.
const SPAWN_VALUE: u32 = 2;

enum Node { Max, Chance }

/// Single-threaded, fixed-depth Expectimax search.
pub struct Expectimax {
    cfg: ExpectimaxConfig,
    stats: SearchStats,
}

impl Expectimax {
    pub fn new() -> Self { Self::with_config(ExpectimaxConfig::default()) }

    pub fn with_config(cfg: ExpectimaxConfig) -> Self { Self { cfg, stats: SearchStats::default() } }

    #[inline]
    pub fn config(&self) -> &ExpectimaxConfig { &self.cfg }

    /// Direction with the highest expected value for `board`.
    ///
    /// Ties resolve to the lowest index (Up, Right, Down, Left). When no
    /// direction changes the board the result is `Up`; use [`Self::best_move`]
    /// to tell that case apart.
    ///
    /// ```
    /// use agent_2048::engine::{BoardSnapshot, Direction};
    /// use agent_2048::expectimax::{Expectimax, ExpectimaxConfig};
    /// let board = BoardSnapshot::from_rows([[2, 4, 8, 16], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 0]]);
    /// let mut ex = Expectimax::with_config(ExpectimaxConfig { depth: 3, ..Default::default() });
    /// let dir = ex.select_move(&board);
    /// assert!(dir == Direction::Right || dir == Direction::Down);
    /// ```
    pub fn select_move(&mut self, board: &BoardSnapshot) -> Direction {
        let branches = self.branch_evals(board);
        let dir = pick_direction(&branches);
        log::debug!("selected {dir}");
        dir
    }

    /// Like [`Self::select_move`] but `None` when no direction is legal.
    pub fn best_move(&mut self, board: &BoardSnapshot) -> Option<Direction> {
        let branches = self.branch_evals(board);
        if branches.iter().any(|b| b.legal) { Some(pick_direction(&branches)) } else { None }
    }

    /// Search every root direction and report its value.
    ///
    /// Returns a fixed array in order `[Up, Right, Down, Left]`. Illegal
    /// moves are marked `legal=false` and carry [`NO_MOVE_SCORE`].
    pub fn branch_evals(&mut self, board: &BoardSnapshot) -> [BranchEval; 4] {
        let root = Grid::from_snapshot(board);
        let child_depth = self.cfg.depth.saturating_sub(1);
        let mut state_count = 0u64;
        let out = Direction::ALL.map(|dir| {
            let mut sim = Simulator::from_grid(root);
            if sim.apply_move(dir) {
                let ev = self.expectimax(&mut sim, Node::Chance, child_depth, &mut state_count);
                BranchEval { dir, ev, legal: true }
            } else {
                BranchEval { dir, ev: NO_MOVE_SCORE, legal: false }
            }
        });
        for b in &out {
            log::debug!("branch {}: legal={} ev={:.1}", b.dir, b.legal, b.ev);
        }
        self.record(state_count);
        out
    }

    /// Value of `board` as a max node: the best legal branch value.
    ///
    /// [`NO_MOVE_SCORE`] when the board has empty cells but nothing can move.
    pub fn state_value(&mut self, board: &BoardSnapshot) -> f64 {
        let mut sim = Simulator::new(board);
        let mut state_count = 0u64;
        let value = self.expectimax(&mut sim, Node::Max, self.cfg.depth, &mut state_count);
        self.record(state_count);
        value
    }

    /// Node counts of the most recent search; `peak_nodes` spans every search
    /// since construction or [`Self::reset_stats`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Forget recorded node counts, including the peak.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn record(&mut self, state_count: u64) {
        self.stats.nodes = state_count;
        self.stats.peak_nodes = self.stats.peak_nodes.max(state_count);
        log::trace!("searched {state_count} nodes at depth {}", self.cfg.depth);
    }

    fn expectimax(&self, sim: &mut Simulator, node: Node, depth: u32, state_count: &mut u64) -> f64 {
        *state_count += 1;
        if depth == 0 || !sim.has_available_cell() {
            return evaluate_grid(sim.grid(), self.cfg.tiering);
        }
        match node {
            Node::Max => self.evaluate_max(sim, depth, state_count),
            Node::Chance => self.evaluate_chance(sim, depth, state_count),
        }
    }

    fn evaluate_max(&self, sim: &mut Simulator, depth: u32, state_count: &mut u64) -> f64 {
        let checkpoint = sim.checkpoint();
        let mut best: Option<f64> = None;
        for direction in Direction::ALL {
            if sim.apply_move(direction) {
                let score = self.expectimax(sim, Node::Chance, depth - 1, state_count);
                best = Some(best.map_or(score, |b| b.max(score)));
            }
            sim.restore(&checkpoint);
        }
        best.unwrap_or(NO_MOVE_SCORE)
    }

    fn evaluate_chance(&self, sim: &mut Simulator, depth: u32, state_count: &mut u64) -> f64 {
        let checkpoint = sim.checkpoint();
        let cells = sim.available_cells();
        let weight = self.cfg.chance_discount / cells.len() as f64;
        let mut score = 0.0;
        for cell in cells {
            sim.insert_tile(Tile::new(cell, SPAWN_VALUE));
            score += weight * self.expectimax(sim, Node::Max, depth - 1, state_count);
            sim.restore(&checkpoint);
        }
        score
    }
}

impl Default for Expectimax { fn default() -> Self { Self::new() } }
