//! Tile-level move simulation on a private working copy of the board.
//!
//! [`Simulator`] owns a [`Grid`] plus the score accumulated by the merges it
//! performed. The search saves a [`Checkpoint`] before each branch and
//! restores it afterwards; the caller's board is never touched.
//!
//! ```
//! use agent_2048::engine::{BoardSnapshot, Direction};
//! use agent_2048::simulator::Simulator;
//!
//! let snapshot = BoardSnapshot::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let mut sim = Simulator::new(&snapshot);
//! assert!(sim.apply_move(Direction::Left));
//! assert_eq!(sim.score(), 4);
//! assert!(!sim.apply_move(Direction::Left));
//! ```

use rand::Rng;

use crate::engine::{BoardSnapshot, Cell, Direction, Grid, Tile, Vector, SIZE};

/// Saved working state: the grid and the accumulated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    grid: Grid,
    score: u64,
}

#[derive(Debug, Clone)]
pub struct Simulator {
    grid: Grid,
    score: u64,
}

struct Traversals {
    x: [i32; SIZE],
    y: [i32; SIZE],
}

impl Traversals {
    /// Visit cells farthest along `vector` first.
    fn build(vector: Vector) -> Self {
        let mut x = [0; SIZE];
        let mut y = [0; SIZE];
        for pos in 0..SIZE {
            x[pos] = pos as i32;
            y[pos] = pos as i32;
        }
        if vector.x == 1 {
            x.reverse();
        }
        if vector.y == 1 {
            y.reverse();
        }
        Traversals { x, y }
    }
}

impl Simulator {
    /// Fresh working grid built from `snapshot`, score zero.
    pub fn new(snapshot: &BoardSnapshot) -> Self { Self::from_grid(Grid::from_snapshot(snapshot)) }

    pub fn from_grid(grid: Grid) -> Self { Simulator { grid, score: 0 } }

    /// Discard the working grid and score and rebuild from `snapshot`.
    pub fn reset_to(&mut self, snapshot: &BoardSnapshot) {
        self.grid = Grid::from_snapshot(snapshot);
        self.score = 0;
    }

    #[inline]
    pub fn checkpoint(&self) -> Checkpoint { Checkpoint { grid: self.grid, score: self.score } }

    #[inline]
    pub fn restore(&mut self, checkpoint: &Checkpoint) {
        self.grid = checkpoint.grid;
        self.score = checkpoint.score;
    }

    #[inline]
    pub fn grid(&self) -> &Grid { &self.grid }

    #[inline]
    pub fn score(&self) -> u64 { self.score }

    pub fn snapshot(&self) -> BoardSnapshot { self.grid.serialize() }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns the new tile, or `None` if the board is full.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Tile> {
        let cells = self.grid.available_cells();
        if cells.is_empty() {
            return None;
        }
        let cell = cells[rng.gen_range(0..cells.len())];
        let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
        let tile = Tile::new(cell, value);
        self.grid.insert_tile(tile);
        Some(tile)
    }

    #[inline]
    pub fn insert_tile(&mut self, tile: Tile) { self.grid.insert_tile(tile); }

    #[inline]
    pub fn has_available_cell(&self) -> bool { self.grid.has_available_cell() }

    #[inline]
    pub fn available_cells(&self) -> Vec<Cell> { self.grid.available_cells() }

    #[inline]
    pub fn cell_content(&self, cell: Cell) -> Option<&Tile> { self.grid.cell_content(cell) }

    #[inline]
    pub fn within_bounds(&self, cell: Cell) -> bool { self.grid.within_bounds(cell) }

    #[inline]
    pub fn is_cell_available(&self, cell: Cell) -> bool { self.grid.is_cell_available(cell) }

    /// Slide and merge every tile in `direction`, adding merged values to the score.
    ///
    /// Returns true if at least one tile moved or merged. A tile produced by a
    /// merge cannot merge again within the same call.
    pub fn apply_move(&mut self, direction: Direction) -> bool {
        let vector = direction.vector();
        let traversals = Traversals::build(vector);
        let mut moved = false;

        self.grid.prepare_tiles();

        for &x in &traversals.x {
            for &y in &traversals.y {
                let cell = Cell::new(x, y);
                let Some(tile) = self.grid.cell_content(cell).copied() else { continue };
                let (farthest, next) = self.find_farthest_position(cell, vector);

                let mergeable = self
                    .grid
                    .cell_content(next)
                    .is_some_and(|other| other.value() == tile.value() && other.merged_from().is_none());

                if mergeable {
                    let merged = Tile::merged(next, tile.value() * 2, [cell, next]);
                    self.grid.remove_tile(&tile);
                    self.grid.insert_tile(merged);
                    self.score += u64::from(merged.value());
                    moved = true;
                } else if farthest != cell {
                    self.grid.move_tile(cell, farthest);
                    moved = true;
                }
            }
        }
        moved
    }

    /// Walk from `cell` along `vector` over empty cells.
    ///
    /// Returns the last empty cell reached and the cell just beyond it.
    fn find_farthest_position(&self, cell: Cell, vector: Vector) -> (Cell, Cell) {
        let mut previous = cell;
        let mut next = cell.step(vector);
        while self.grid.is_cell_available(next) {
            previous = next;
            next = next.step(vector);
        }
        (previous, next)
    }
}
