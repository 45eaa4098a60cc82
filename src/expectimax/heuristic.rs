//! Static evaluation of a board at the search frontier.
//!
//! The score combines five fixed-weight signals: free cells, row/column
//! smoothness, placement of the highest tile, large tiles kept off the
//! centre, and the number of mid-sized tiles.

use crate::engine::{Cell, Grid, Tile, SIZE};

use super::Tiering;

const EMPTY_WEIGHT: f64 = 5000.0;
const SMOOTHNESS_WEIGHT: f64 = 240.0;
const CORNER_WEIGHT: f64 = 50.0;
const OFF_CORNER_WEIGHT: f64 = 10.0;
const BORDER_WEIGHT: f64 = 2.0;
const BORDER_MIN_VALUE: u32 = 128;
const LARGE_TILE_WEIGHT: f64 = 1600.0;
const LARGE_TILE_THRESHOLD: u32 = 32;

/// Heuristic value of `grid`; higher is better.
///
/// ```
/// use agent_2048::engine::Grid;
/// use agent_2048::expectimax::{heuristic, Tiering};
/// let corner = Grid::from_rows([[64, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
/// let centre = Grid::from_rows([[0; 4], [0, 64, 0, 0], [0; 4], [0; 4]]);
/// assert!(heuristic::evaluate_grid(&corner, Tiering::default()) > heuristic::evaluate_grid(&centre, Tiering::default()));
/// ```
pub fn evaluate_grid(grid: &Grid, tiering: Tiering) -> f64 {
    let mut max_tile: Option<&Tile> = None;
    let mut border_score = 0u64;
    let mut large_tiles = 0u32;

    // Column by column, top to bottom; the first tile holding the maximum wins ties.
    let columns = (0..SIZE as i32).flat_map(|x| (0..SIZE as i32).map(move |y| Cell::new(x, y)));
    for tile in columns.filter_map(|cell| grid.cell_content(cell)) {
        if max_tile.map_or(true, |m| tile.value() > m.value()) {
            max_tile = Some(tile);
        }
        if tile.value() >= BORDER_MIN_VALUE && !is_at_center(tile) {
            border_score += u64::from(tile.value());
        }
        if tile.value() > LARGE_TILE_THRESHOLD {
            large_tiles += 1;
        }
    }

    let empty_cells = (SIZE * SIZE - grid.occupied_count()) as f64;
    let placement = match max_tile {
        Some(tile) => {
            let half_max = f64::from(tile.value()) / 2.0;
            if is_at_corner(tile) { CORNER_WEIGHT * half_max } else { -OFF_CORNER_WEIGHT * half_max }
        }
        None => 0.0,
    };

    EMPTY_WEIGHT * empty_cells - SMOOTHNESS_WEIGHT * total_difference(grid, tiering) + placement
        + BORDER_WEIGHT * border_score as f64
        - LARGE_TILE_WEIGHT * f64::from(large_tiles)
}

/// Sum of [`line_difference`] over every row and column, empty cells skipped.
fn total_difference(grid: &Grid, tiering: Tiering) -> f64 {
    let rows = grid.to_rows();
    let mut difference = 0.0;
    for i in 0..SIZE {
        let row: Vec<u32> = (0..SIZE).map(|j| rows[i][j]).filter(|&v| v != 0).collect();
        let col: Vec<u32> = (0..SIZE).map(|j| rows[j][i]).filter(|&v| v != 0).collect();
        difference += line_difference(&row, tiering) + line_difference(&col, tiering);
    }
    difference
}

/// Smoothness/monotonicity metric for one line of tile values.
///
/// Adjacent ratios (larger / smaller) are summed. Monotone lines map the sum
/// through a tier table to a negative value, so the caller's negative weight
/// turns them into a reward; disordered lines return a positive penalty,
/// tripled once the sum reaches 10.
pub fn line_difference(values: &[u32], tiering: Tiering) -> f64 {
    let mut increasing = true;
    let mut decreasing = true;
    let mut difference = 0.0;
    for pair in values.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        increasing &= a <= b;
        decreasing &= a >= b;
        difference += f64::from(a.max(b)) / f64::from(a.min(b));
    }

    if !(increasing || decreasing) {
        return if difference < 10.0 { difference } else { 3.0 * difference };
    }

    let len = match tiering {
        Tiering::SequenceLength => values.len(),
        Tiering::Reference => 0,
    };
    match len {
        3 if difference <= 4.0 => -5.0 * (7.0 - difference),
        4 if difference <= 6.0 => -10.0 * (9.0 - difference),
        3 if difference <= 12.0 => -3.0 * (15.0 - difference),
        4 if difference <= 18.0 => -5.0 * (21.0 - difference),
        _ if difference <= 30.0 => -10.0,
        _ => -5.0,
    }
}

fn is_at_corner(tile: &Tile) -> bool {
    let edge = SIZE as i32 - 1;
    let p = tile.position();
    (p.x == 0 || p.x == edge) && (p.y == 0 || p.y == edge)
}

fn is_at_center(tile: &Tile) -> bool {
    let p = tile.position();
    (1..=2).contains(&p.x) && (1..=2).contains(&p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEN: Tiering = Tiering::SequenceLength;

    #[test]
    fn it_scores_monotone_tiers_by_length() {
        assert_eq!(line_difference(&[], LEN), -10.0);
        assert_eq!(line_difference(&[8], LEN), -10.0);
        assert_eq!(line_difference(&[2, 4], LEN), -10.0);
        assert_eq!(line_difference(&[2, 128], LEN), -5.0);
        assert_eq!(line_difference(&[2, 2, 2], LEN), -25.0);
        assert_eq!(line_difference(&[2, 4, 8], LEN), -15.0);
        assert_eq!(line_difference(&[2, 8, 32], LEN), -21.0);
        assert_eq!(line_difference(&[16, 8, 4, 2], LEN), -30.0);
        assert_eq!(line_difference(&[2, 8, 32, 128], LEN), -45.0);
        assert_eq!(line_difference(&[2, 16, 128, 1024], LEN), -10.0);
    }

    #[test]
    fn it_scores_reference_tiers() {
        assert_eq!(line_difference(&[2, 4, 8, 16], Tiering::Reference), -10.0);
        assert_eq!(line_difference(&[2, 2, 2], Tiering::Reference), -10.0);
        assert_eq!(line_difference(&[2, 32, 512], Tiering::Reference), -5.0);
    }

    #[test]
    fn it_penalises_disorder() {
        assert_eq!(line_difference(&[4, 2, 4], LEN), 4.0);
        assert_eq!(line_difference(&[8, 2, 16, 4], LEN), 48.0);
        assert_eq!(line_difference(&[8, 2, 16, 4], Tiering::Reference), 48.0);
    }

    #[test]
    fn it_prefers_sorted_rows() {
        let sorted = Grid::from_rows([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        let shuffled = Grid::from_rows([[8, 2, 16, 4], [0; 4], [0; 4], [0; 4]]);
        assert!(total_difference(&sorted, LEN) < total_difference(&shuffled, LEN));
        assert!(evaluate_grid(&sorted, LEN) > evaluate_grid(&shuffled, LEN));
    }

    #[test]
    fn it_rewards_max_tile_in_corner() {
        let corner = Grid::from_rows([[64, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let centre = Grid::from_rows([[0; 4], [0, 64, 0, 0], [0; 4], [0; 4]]);
        assert_eq!(evaluate_grid(&corner, LEN), 75000.0 + 19200.0 + 1600.0 - 1600.0);
        assert_eq!(evaluate_grid(&centre, LEN), 75000.0 + 19200.0 - 320.0 - 1600.0);
    }

    #[test]
    fn it_breaks_max_ties_column_first() {
        // (0, 3) is reached before (1, 0), so the corner bonus applies.
        let grid = Grid::from_rows([[0, 64, 0, 0], [0; 4], [0; 4], [64, 0, 0, 0]]);
        assert_eq!(evaluate_grid(&grid, LEN), 70000.0 + 19200.0 + 1600.0 - 3200.0);
        let mirrored = Grid::from_rows([[64, 0, 0, 0], [0; 4], [0; 4], [0, 64, 0, 0]]);
        assert_eq!(evaluate_grid(&mirrored, LEN), 70000.0 + 19200.0 + 1600.0 - 3200.0);
        let swapped = Grid::from_rows([[0, 0, 0, 0], [64, 0, 0, 0], [0; 4], [0, 0, 0, 64]]);
        // (0, 1) comes first and sits on an edge, not a corner.
        assert_eq!(evaluate_grid(&swapped, LEN), 70000.0 + 19200.0 - 320.0 - 3200.0);
    }

    #[test]
    fn it_evaluates_all_terms() {
        assert_eq!(evaluate_grid(&Grid::EMPTY, LEN), 80000.0 + 19200.0);
        // 14 empty; lines sum to -75; corner 128; border 128; one large tile.
        let grid = Grid::from_rows([[128, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(evaluate_grid(&grid, LEN), 70000.0 + 18000.0 + 3200.0 + 256.0 - 1600.0);
    }

    #[test]
    fn it_keeps_large_tiles_off_centre() {
        let edge = Grid::from_rows([[0, 256, 0, 0], [0, 0, 0, 512], [0; 4], [0; 4]]);
        let centre = Grid::from_rows([[0; 4], [0, 256, 0, 0], [0, 0, 512, 0], [0; 4]]);
        let diff = evaluate_grid(&edge, LEN) - evaluate_grid(&centre, LEN);
        // Only the border term differs: both maxima are off-corner and lines match.
        assert_eq!(diff, 2.0 * (256.0 + 512.0));
    }
}
