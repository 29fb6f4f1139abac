//! Game state and the rules that act on it.
//!
//! This module provides the core game logic:
//! - [`GameState`], a complete snapshot of a game in progress
//! - Dead-group search that follows topology adjacency
//! - Stone placement with capture resolution
//! - Full recomputation of the legal-move mask under positional superko
//!
//! Legality is computed by brute force: for every empty point the move is
//! played out on a scratch grid and the result is checked against every
//! position seen so far. This costs O(cells²) per accepted move, which is
//! fine for interactive board sizes.

use serde::{Deserialize, Serialize};

use crate::board::{Color, Grid, LegalMask, Matrix};
use crate::constants::DIRECTIONS;
use crate::topology::{Coord, Size, Topology};
use crate::zobrist::GridHistory;

/// Stones captured by each side. Never decreases during play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prisoners {
    pub black: u32,
    pub white: u32,
}

impl Prisoners {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn add(&mut self, color: Color, n: u32) {
        match color {
            Color::Black => self.black += n,
            Color::White => self.white += n,
        }
    }
}

/// What a single placement removed from the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Captures {
    /// Stones cleared while resolving the neighbors of the new stone
    pub taken_by_mover: u32,
    /// The mover's own stones lost when the new stone's group is checked last
    pub taken_by_opponent: u32,
}

/// A complete game snapshot.
///
/// Snapshots are plain values: undo swaps in an older one wholesale.
/// The JSON form uses the field names viewers expect (`prisonersTakenBy`,
/// `isLegalMove`, `pastGrids`, ...) with the topology flattened in as
/// `topology` and `size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(flatten)]
    pub topology: Topology,
    /// Side to move
    pub turn: Color,
    pub prisoners_taken_by: Prisoners,
    pub grid: Grid,
    /// Where the side to move may legally play
    pub is_legal_move: LegalMask,
    /// Every grid seen so far, oldest first, including the current one
    pub past_grids: GridHistory,
    pub last_play_point: Option<Coord>,
}

impl GameState {
    /// An empty board with black to move.
    ///
    /// Every point starts out legal and the history holds just the empty grid.
    pub fn new(topology: Topology) -> Self {
        let (w, h) = (topology.width(), topology.height());
        let grid = Grid::empty(w, h);
        let mut past_grids = GridHistory::new();
        past_grids.push(grid.clone());
        Self {
            topology,
            turn: Color::Black,
            prisoners_taken_by: Prisoners::default(),
            grid,
            is_legal_move: LegalMask::filled(w, h, true),
            past_grids,
            last_play_point: None,
        }
    }

    pub fn size(&self) -> Size {
        self.topology.size
    }

    /// Whether the side to move may play at canonical point `c`.
    pub fn is_legal(&self, c: Coord) -> bool {
        self.is_legal_move.get(c).copied().unwrap_or(false)
    }

    /// All points where the side to move may play, row by row.
    pub fn legal_moves(&self) -> Vec<Coord> {
        self.topology.coords().filter(|&c| self.is_legal(c)).collect()
    }

    /// Whether the grid and legality mask agree with the topology size.
    pub fn is_consistent(&self) -> bool {
        let size = self.size();
        self.grid.size() == size
            && self.is_legal_move.size() == size
            && self.past_grids.iter().all(|g| g.size() == size)
            && self.last_play_point.is_none_or(|c| self.topology.contains(c))
    }

    /// The first occupied point the mask wrongly offers as a move, if any.
    pub fn occupied_marked_legal(&self) -> Option<Coord> {
        self.grid
            .iter()
            .find(|&(c, cell)| cell.is_some() && self.is_legal(c))
            .map(|(c, _)| c)
    }

    /// Play a stone for the side to move at canonical point `c`, assuming the
    /// caller has already checked legality.
    ///
    /// Resolves captures, flips the turn, records the new grid and recomputes
    /// the legal-move mask.
    pub(crate) fn apply_move(&mut self, c: Coord) -> Captures {
        let mover = self.turn;
        let captures = place_stone(&mut self.grid, &self.topology, c, mover);
        self.prisoners_taken_by.add(mover, captures.taken_by_mover);
        self.prisoners_taken_by
            .add(mover.opposite(), captures.taken_by_opponent);
        self.turn = mover.opposite();
        self.last_play_point = Some(c);
        self.past_grids.push(self.grid.clone());
        self.is_legal_move = legal_moves_mask(self);
        captures
    }
}

/// Find the group containing `start` if it has no liberties.
///
/// Walks the group with an explicit stack of `(point, next direction)`
/// entries. Any empty neighbor ends the search at once with no deaths.
/// Off-board neighbors are ignored. If the walk completes, every stone
/// reached is dead and is returned. Returns an empty list if `start` is
/// empty or the group has a liberty.
pub fn dead_group(grid: &Grid, topology: &Topology, start: Coord) -> Vec<Coord> {
    let color = match grid.get(start) {
        Some(Some(color)) => *color,
        _ => return Vec::new(),
    };

    let mut seen = vec![start];
    let mut visited = Matrix::<bool>::filled(grid.width(), grid.height(), false);
    visited[start] = true;
    let mut stack = vec![(start, 0usize)];

    while let Some((pt, dir)) = stack.pop() {
        if dir + 1 < DIRECTIONS.len() {
            stack.push((pt, dir + 1));
        }
        let (dx, dy) = DIRECTIONS[dir];
        let Some(next) = topology.normalize(pt.offset(dx, dy)) else {
            continue;
        };
        match grid[next] {
            None => return Vec::new(),
            Some(c) if c == color && !visited[next] => {
                visited[next] = true;
                seen.push(next);
                stack.push((next, 0));
            }
            _ => {}
        }
    }
    seen
}

/// Place a `color` stone at canonical point `c` and resolve captures.
///
/// Each neighbor of `c` is searched in turn, west, east, north, south, and
/// any dead group found there is removed and credited to the mover. This
/// includes a neighboring group of the mover's own color that the new stone
/// has joined and left without liberties. Only then is the placed stone's
/// own group checked, so a move that captures is never treated as suicide.
/// Whatever is still dead there is credited to the opponent.
///
/// Does not check legality, turn order or history.
pub fn place_stone(grid: &mut Grid, topology: &Topology, c: Coord, color: Color) -> Captures {
    grid[c] = Some(color);
    let mut captures = Captures::default();

    for n in topology.neighbors(c) {
        for dead in dead_group(grid, topology, n) {
            grid[dead] = None;
            captures.taken_by_mover += 1;
        }
    }

    for dead in dead_group(grid, topology, c) {
        grid[dead] = None;
        captures.taken_by_opponent += 1;
    }

    if captures != Captures::default() {
        tracing::trace!(
            at = %c,
            %color,
            taken_by_mover = captures.taken_by_mover,
            taken_by_opponent = captures.taken_by_opponent,
            "captures"
        );
    }
    captures
}

/// Recompute where the side to move in `state` may legally play.
///
/// An occupied point is illegal. An empty point is illegal only if playing
/// there would recreate any grid in the game's history (positional superko).
/// Self-capture that produces a new position is allowed.
pub fn legal_moves_mask(state: &GameState) -> LegalMask {
    let topology = &state.topology;
    let mut mask = LegalMask::filled(topology.width(), topology.height(), false);
    let mut scratch = state.grid.clone();
    let mut legal = 0usize;

    for c in topology.coords() {
        if state.grid[c].is_some() {
            continue;
        }
        scratch.clone_from(&state.grid);
        place_stone(&mut scratch, topology, c, state.turn);
        if !state.past_grids.contains(&scratch) {
            mask[c] = true;
            legal += 1;
        }
    }

    tracing::trace!(turn = %state.turn, legal, "recomputed legal moves");
    mask
}
