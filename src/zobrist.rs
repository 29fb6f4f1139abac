//! Position hashing and the superko history.
//!
//! Every grid that has occurred in a game is kept verbatim. Lookups go
//! through a Zobrist hash index first and then compare whole grids, so a
//! hash collision can never make a fresh position look repeated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::{Color, Grid};
use crate::constants::ZOBRIST_SEED;

/// Zobrist key for a stone of `color` at storage index `index`.
///
/// Keys are derived on demand from a seeded `fastrand` stream rather than
/// held in a table, so any board size hashes without setup.
#[inline]
fn key(index: usize, color: Color) -> u64 {
    let slot = ((index as u64) << 1) | color as u64;
    let mut rng = fastrand::Rng::with_seed(ZOBRIST_SEED ^ slot.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    rng.u64(..)
}

/// Zobrist hash of a grid. Empty points contribute nothing.
pub fn hash_grid(grid: &Grid) -> u64 {
    grid.cells()
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell.map(|color| key(i, color)))
        .fold(0, |h, k| h ^ k)
}

/// Ordered, append-only record of past grids with fast membership tests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Grid>", into = "Vec<Grid>")]
pub struct GridHistory {
    grids: Vec<Grid>,
    /// Hash -> indices into `grids`
    index: HashMap<u64, Vec<usize>>,
}

impl GridHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, grid: Grid) {
        let h = hash_grid(&grid);
        self.index.entry(h).or_default().push(self.grids.len());
        self.grids.push(grid);
    }

    /// Whether an identical grid has been recorded.
    pub fn contains(&self, grid: &Grid) -> bool {
        self.index
            .get(&hash_grid(grid))
            .is_some_and(|hits| hits.iter().any(|&i| self.grids[i] == *grid))
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grid> {
        self.grids.iter()
    }

    pub fn last(&self) -> Option<&Grid> {
        self.grids.last()
    }
}

impl PartialEq for GridHistory {
    fn eq(&self, other: &Self) -> bool {
        self.grids == other.grids
    }
}

impl Eq for GridHistory {}

impl From<Vec<Grid>> for GridHistory {
    fn from(grids: Vec<Grid>) -> Self {
        let mut history = GridHistory::new();
        for grid in grids {
            history.push(grid);
        }
        history
    }
}

impl From<GridHistory> for Vec<Grid> {
    fn from(history: GridHistory) -> Self {
        history.grids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Coord;

    #[test]
    fn test_empty_grid_hashes_to_zero() {
        assert_eq!(hash_grid(&Grid::empty(5, 5)), 0);
    }

    #[test]
    fn test_hash_depends_on_color_and_place() {
        let mut a = Grid::empty(5, 5);
        let mut b = Grid::empty(5, 5);
        a[Coord::new(1, 1)] = Some(Color::Black);
        b[Coord::new(1, 1)] = Some(Color::White);
        assert_ne!(hash_grid(&a), hash_grid(&b));

        let mut c = Grid::empty(5, 5);
        c[Coord::new(1, 2)] = Some(Color::Black);
        assert_ne!(hash_grid(&a), hash_grid(&c));
    }

    #[test]
    fn test_hash_is_order_independent() {
        let mut a = Grid::empty(4, 4);
        a[Coord::new(0, 0)] = Some(Color::Black);
        a[Coord::new(3, 2)] = Some(Color::White);
        let mut b = Grid::empty(4, 4);
        b[Coord::new(3, 2)] = Some(Color::White);
        b[Coord::new(0, 0)] = Some(Color::Black);
        assert_eq!(hash_grid(&a), hash_grid(&b));
    }

    #[test]
    fn test_history_membership() {
        let mut history = GridHistory::new();
        let empty = Grid::empty(3, 3);
        let mut one = empty.clone();
        one[Coord::new(1, 1)] = Some(Color::Black);

        history.push(empty.clone());
        assert!(history.contains(&empty));
        assert!(!history.contains(&one));

        history.push(one.clone());
        assert!(history.contains(&one));
        assert_eq!(history.len(), 2);
        assert_eq!(history.last(), Some(&one));
    }

    #[test]
    fn test_history_rebuilds_index_from_json() {
        let mut history = GridHistory::new();
        let mut grid = Grid::empty(3, 3);
        history.push(grid.clone());
        grid[Coord::new(2, 0)] = Some(Color::White);
        history.push(grid.clone());

        let json = serde_json::to_string(&history).unwrap();
        let back: GridHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
        assert!(back.contains(&grid));
    }
}
