use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board.
pub const SIZE: usize = 4;

const CELL_COUNT: usize = SIZE * SIZE;

/// Largest tile a 4x4 board can hold (2^17).
pub const MAX_TILE_VALUE: u32 = 1 << 17;

/// A direction to move/merge tiles.
///
/// The discriminants double as the tie-break order used by the search:
/// Up, Right, Down, Left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All four directions in index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Unit vector on the (x, y) axes; y grows downwards.
    #[inline]
    pub fn vector(self) -> Vector {
        match self {
            Direction::Up => Vector { x: 0, y: -1 },
            Direction::Right => Vector { x: 1, y: 0 },
            Direction::Down => Vector { x: 0, y: 1 },
            Direction::Left => Vector { x: -1, y: 0 },
        }
    }

    #[inline]
    pub fn index(self) -> usize { self as usize }

    pub fn from_index(idx: usize) -> Option<Self> { Self::ALL.get(idx).copied() }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

/// Board coordinate. May lie outside the board while walking a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self { Cell { x, y } }

    #[inline]
    pub fn step(self, v: Vector) -> Self { Cell { x: self.x + v.x, y: self.y + v.y } }
}

/// A numbered tile. Its position is plain data; moving it updates it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    x: i32,
    y: i32,
    value: u32,
    merged_from: Option<[Cell; 2]>,
}

impl Tile {
    #[inline]
    pub fn new(cell: Cell, value: u32) -> Self {
        debug_assert!(value.is_power_of_two() && value > 1);
        Tile { x: cell.x, y: cell.y, value, merged_from: None }
    }

    /// A tile produced by merging the tiles that started at `sources`.
    pub(crate) fn merged(cell: Cell, value: u32, sources: [Cell; 2]) -> Self {
        Tile { merged_from: Some(sources), ..Tile::new(cell, value) }
    }

    #[inline]
    pub fn position(&self) -> Cell { Cell::new(self.x, self.y) }

    #[inline]
    pub fn value(&self) -> u32 { self.value }

    /// Source cells of the merge that produced this tile during the current move.
    #[inline]
    pub fn merged_from(&self) -> Option<[Cell; 2]> { self.merged_from }

    #[inline]
    pub fn update_position(&mut self, cell: Cell) {
        self.x = cell.x;
        self.y = cell.y;
    }

    #[inline]
    pub(crate) fn clear_merge(&mut self) { self.merged_from = None; }
}

/// Serializable, immutable capture of a board.
///
/// `cells[y][x]` holds the tile value or `None` for an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<u32>>>,
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        BoardSnapshot { size: SIZE, cells: vec![vec![None; SIZE]; SIZE] }
    }

    /// Build a snapshot from row-major values, `0` meaning empty.
    ///
    /// ```
    /// use agent_2048::engine::BoardSnapshot;
    /// let s = BoardSnapshot::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(s.cells[0][1], Some(2));
    /// assert!(s.validate().is_ok());
    /// ```
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        let cells = rows
            .iter()
            .map(|row| row.iter().map(|&v| if v == 0 { None } else { Some(v) }).collect())
            .collect();
        BoardSnapshot { size: SIZE, cells }
    }

    /// Check the size and tile values. The search assumes a valid snapshot.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.size != SIZE {
            return Err(SnapshotError::UnsupportedSize(self.size));
        }
        if self.cells.len() != SIZE {
            return Err(SnapshotError::UnsupportedSize(self.cells.len()));
        }
        for (y, row) in self.cells.iter().enumerate() {
            if row.len() != SIZE {
                return Err(SnapshotError::RowLength { row: y, len: row.len() });
            }
            for (x, value) in row.iter().enumerate() {
                if let Some(v) = *value {
                    if v < 2 || !v.is_power_of_two() {
                        return Err(SnapshotError::InvalidTileValue { x, y, value: v });
                    }
                    if v > MAX_TILE_VALUE {
                        return Err(SnapshotError::TileTooLarge { x, y, value: v });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self { Self::empty() }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("unsupported board size {0} (expected {expected})", expected = SIZE)]
    UnsupportedSize(usize),
    #[error("row {row} has {len} cells (expected {expected})", expected = SIZE)]
    RowLength { row: usize, len: usize },
    #[error("invalid tile value {value} at ({x}, {y})")]
    InvalidTileValue { x: usize, y: usize, value: u32 },
    #[error("tile value {value} at ({x}, {y}) exceeds {max}", max = MAX_TILE_VALUE)]
    TileTooLarge { x: usize, y: usize, value: u32 },
}

/// Fixed 4x4 grid of optional tiles.
///
/// `Grid` is a `Copy` value, so saving and restoring search state is a
/// plain assignment.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cells: [Option<Tile>; CELL_COUNT],
}

impl Grid {
    pub const EMPTY: Grid = Grid { cells: [None; CELL_COUNT] };

    /// Rebuild a grid from a snapshot. Cells outside the 4x4 area are ignored.
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        let mut grid = Grid::EMPTY;
        for (y, row) in snapshot.cells.iter().enumerate().take(SIZE) {
            for (x, value) in row.iter().enumerate().take(SIZE) {
                if let Some(v) = *value {
                    grid.insert_tile(Tile::new(Cell::new(x as i32, y as i32), v));
                }
            }
        }
        grid
    }

    pub fn try_from_snapshot(snapshot: &BoardSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Row-major values, `0` meaning empty.
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        Self::from_snapshot(&BoardSnapshot::from_rows(rows))
    }

    pub fn serialize(&self) -> BoardSnapshot {
        let cells = (0..SIZE)
            .map(|y| (0..SIZE).map(|x| self.cells[y * SIZE + x].map(|t| t.value())).collect())
            .collect();
        BoardSnapshot { size: SIZE, cells }
    }

    /// Row-major values, `0` meaning empty.
    pub fn to_rows(&self) -> [[u32; SIZE]; SIZE] {
        let mut rows = [[0; SIZE]; SIZE];
        for tile in self.tiles() {
            let p = tile.position();
            rows[p.y as usize][p.x as usize] = tile.value();
        }
        rows
    }

    #[inline]
    pub fn size(&self) -> usize { SIZE }

    #[inline]
    pub fn within_bounds(&self, cell: Cell) -> bool {
        (0..SIZE as i32).contains(&cell.x) && (0..SIZE as i32).contains(&cell.y)
    }

    /// Tile at `cell`, or `None` when empty or out of bounds.
    #[inline]
    pub fn cell_content(&self, cell: Cell) -> Option<&Tile> {
        if self.within_bounds(cell) { self.cells[index(cell)].as_ref() } else { None }
    }

    #[inline]
    pub fn is_cell_available(&self, cell: Cell) -> bool {
        self.within_bounds(cell) && self.cells[index(cell)].is_none()
    }

    /// Coordinates of all empty cells, row-major.
    pub fn available_cells(&self) -> Vec<Cell> {
        (0..CELL_COUNT)
            .filter(|&i| self.cells[i].is_none())
            .map(|i| Cell::new((i % SIZE) as i32, (i / SIZE) as i32))
            .collect()
    }

    #[inline]
    pub fn has_available_cell(&self) -> bool { self.cells.iter().any(Option::is_none) }

    /// Place `tile` at its own position, replacing whatever was there.
    #[inline]
    pub fn insert_tile(&mut self, tile: Tile) {
        let cell = tile.position();
        debug_assert!(self.within_bounds(cell));
        self.cells[index(cell)] = Some(tile);
    }

    #[inline]
    pub fn remove_tile(&mut self, tile: &Tile) {
        let cell = tile.position();
        debug_assert!(self.within_bounds(cell));
        self.cells[index(cell)] = None;
    }

    /// Move the tile at `from` to the empty cell `to`.
    pub(crate) fn move_tile(&mut self, from: Cell, to: Cell) {
        if let Some(mut tile) = self.cells[index(from)].take() {
            tile.update_position(to);
            self.cells[index(to)] = Some(tile);
        }
    }

    /// Drop the merge markers left by the previous move.
    pub(crate) fn prepare_tiles(&mut self) {
        for tile in self.cells.iter_mut().flatten() {
            tile.clear_merge();
        }
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ { self.cells.iter().flatten() }

    pub fn occupied_count(&self) -> usize { self.tiles().count() }

    /// Highest tile value on the board, `0` when empty.
    pub fn highest_tile(&self) -> u32 { self.tiles().map(Tile::value).max().unwrap_or(0) }

    /// True if the board is full and no two neighbours can merge.
    pub fn is_game_over(&self) -> bool {
        if self.has_available_cell() {
            return false;
        }
        !self.tiles().any(|tile| {
            [Direction::Right, Direction::Down].iter().any(|dir| {
                self.cell_content(tile.position().step(dir.vector()))
                    .is_some_and(|other| other.value() == tile.value())
            })
        })
    }
}

impl Default for Grid {
    fn default() -> Self { Grid::EMPTY }
}

#[inline]
fn index(cell: Cell) -> usize { cell.y as usize * SIZE + cell.x as usize }

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Grid").field(&self.to_rows()).finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (y, row) in self.to_rows().iter().enumerate() {
            if y > 0 {
                writeln!(f, "{}", "-".repeat(31))?;
            }
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: &u32) -> String {
    match *val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}
