//! The rules engine: one game, its current state and its undo history.
//!
//! [`RulesEngine`] is the only thing that mutates a [`GameState`]. Moves go
//! through [`RulesEngine::play`] (or [`RulesEngine::try_play`] when the caller
//! wants to know why a move was refused), and [`RulesEngine::undo`] steps
//! back one accepted move at a time.
//!
//! The engine is single-threaded and every call runs to completion. A server
//! hosting several games should give each game its own engine behind its own
//! lock.

use thiserror::Error;

use crate::board::{Color, Grid, LegalMask};
use crate::position::{Captures, GameState, Prisoners};
use crate::topology::{Coord, Size, Topology, TopologyKind};

pub use crate::topology::BoardError;

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: {0} is off the board")]
    OffBoard(Coord),
    #[error("illegal move: {0} is not empty")]
    Occupied(Coord),
    #[error("illegal move: {0} repeats an earlier position")]
    Superko(Coord),
}

/// The result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Canonical point the stone went to
    pub at: Coord,
    pub color: Color,
    pub captures: Captures,
}

/// A game of Go on a wrapped board.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    state: GameState,
    /// Snapshots after each accepted move, starting with the initial state.
    /// The last entry always equals `state`.
    past_states: Vec<GameState>,
}

impl RulesEngine {
    /// Start a new game on an empty board.
    pub fn new(kind: TopologyKind, width: usize, height: usize) -> Result<Self, BoardError> {
        let state = GameState::new(Topology::new(kind, width, height)?);
        tracing::debug!(%kind, width, height, "new game");
        Ok(Self {
            past_states: vec![state.clone()],
            state,
        })
    }

    /// Resume a game from a snapshot, e.g. one received as JSON.
    ///
    /// The snapshot becomes the only undo entry. Snapshots whose matrices
    /// disagree with the board size, or whose mask offers an occupied point,
    /// are refused.
    pub fn from_state(state: GameState) -> Result<Self, BoardError> {
        let Size { x, y } = state.size();
        if x == 0 || y == 0 {
            return Err(BoardError::InvalidBoardSize {
                width: x,
                height: y,
            });
        }
        if !state.is_consistent() {
            return Err(BoardError::SizeMismatch {
                kind: state.topology.kind,
                size: state.size(),
            });
        }
        if let Some(c) = state.occupied_marked_legal() {
            return Err(BoardError::OccupiedMarkedLegal(c));
        }
        Ok(Self {
            past_states: vec![state.clone()],
            state,
        })
    }

    /// Play a stone for the side to move. Illegal moves are ignored.
    ///
    /// `c` may be any logical coordinate; it is normalized first.
    pub fn play(&mut self, c: Coord) {
        let _ = self.try_play(c);
    }

    /// Play a stone for the side to move, reporting why a move was refused.
    ///
    /// A refused move leaves the game untouched.
    pub fn try_play(&mut self, c: Coord) -> Result<PlayOutcome, MoveError> {
        let at = self.state.topology.normalize(c).ok_or(MoveError::OffBoard(c));
        let at = match at.and_then(|at| self.check(at)) {
            Ok(at) => at,
            Err(e) => {
                tracing::debug!(turn = %self.state.turn, "{e}");
                return Err(e);
            }
        };

        let color = self.state.turn;
        let captures = self.state.apply_move(at);
        self.past_states.push(self.state.clone());
        tracing::debug!(%at, %color, moves = self.move_count(), "played");
        Ok(PlayOutcome {
            at,
            color,
            captures,
        })
    }

    fn check(&self, at: Coord) -> Result<Coord, MoveError> {
        if self.state.grid[at].is_some() {
            Err(MoveError::Occupied(at))
        } else if self.state.is_legal(at) {
            Ok(at)
        } else {
            Err(MoveError::Superko(at))
        }
    }

    /// Revert the last accepted move.
    ///
    /// Returns `false`, and changes nothing, when already at the start of the
    /// recorded history.
    pub fn undo(&mut self) -> bool {
        if self.past_states.len() < 2 {
            return false;
        }
        self.past_states.pop();
        if let Some(prev) = self.past_states.last() {
            self.state = prev.clone();
        }
        tracing::debug!(moves = self.move_count(), "undo");
        true
    }

    /// Moves that can currently be undone.
    pub fn move_count(&self) -> usize {
        self.past_states.len() - 1
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn topology(&self) -> &Topology {
        &self.state.topology
    }

    pub fn size(&self) -> Size {
        self.state.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn turn(&self) -> Color {
        self.state.turn
    }

    pub fn prisoners_taken_by(&self) -> Prisoners {
        self.state.prisoners_taken_by
    }

    pub fn is_legal_move(&self) -> &LegalMask {
        &self.state.is_legal_move
    }

    /// Whether the side to move may play at logical point `c`.
    pub fn is_legal(&self, c: Coord) -> bool {
        self.state
            .topology
            .normalize(c)
            .is_some_and(|at| self.state.is_legal(at))
    }

    pub fn legal_moves(&self) -> Vec<Coord> {
        self.state.legal_moves()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RulesEngine {
        RulesEngine::new(TopologyKind::Torus, 5, 5).unwrap()
    }

    #[test]
    fn test_rejects_empty_board() {
        assert_eq!(
            RulesEngine::new(TopologyKind::Torus, 0, 5).unwrap_err(),
            BoardError::InvalidBoardSize {
                width: 0,
                height: 5
            }
        );
        assert!(RulesEngine::new(TopologyKind::KleinBottle, 3, 0).is_err());
    }

    #[test]
    fn test_play_normalizes_input() {
        let mut e = engine();
        let outcome = e.try_play(Coord::new(7, -1)).unwrap();
        assert_eq!(outcome.at, Coord::new(2, 4));
        assert_eq!(outcome.color, Color::Black);
        assert_eq!(e.grid()[Coord::new(2, 4)], Some(Color::Black));
        assert_eq!(e.state().last_play_point, Some(Coord::new(2, 4)));
    }

    #[test]
    fn test_occupied_is_rejected_silently() {
        let mut e = engine();
        e.play(Coord::new(1, 1));
        let before = e.state().clone();
        assert_eq!(
            e.try_play(Coord::new(1, 1)),
            Err(MoveError::Occupied(Coord::new(1, 1)))
        );
        e.play(Coord::new(6, 1));
        assert_eq!(e.state(), &before);
        assert_eq!(e.move_count(), 1);
    }

    #[test]
    fn test_off_board_on_cylinder() {
        let mut e = RulesEngine::new(TopologyKind::Cylinder, 4, 4).unwrap();
        assert_eq!(
            e.try_play(Coord::new(0, 4)),
            Err(MoveError::OffBoard(Coord::new(0, 4)))
        );
        assert!(!e.is_legal(Coord::new(0, -1)));
        assert_eq!(e.move_count(), 0);
    }

    #[test]
    fn test_undo() {
        let mut e = engine();
        assert!(!e.undo());
        e.play(Coord::new(0, 0));
        e.play(Coord::new(1, 0));
        assert_eq!(e.move_count(), 2);
        assert!(e.undo());
        assert_eq!(e.turn(), Color::White);
        assert_eq!(e.grid()[Coord::new(1, 0)], None);
        assert!(e.undo());
        assert_eq!(e.state(), &GameState::new(*e.topology()));
        assert!(!e.undo());
    }

    #[test]
    fn test_from_state_checks_sizes() {
        let e = engine();
        let mut state = e.state().clone();
        assert!(RulesEngine::from_state(state.clone()).is_ok());
        state.grid = Grid::empty(4, 5);
        assert!(matches!(
            RulesEngine::from_state(state),
            Err(BoardError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_state_rejects_occupied_point_marked_legal() {
        let mut e = engine();
        e.play(Coord::new(0, 0));
        let mut state = e.state().clone();
        state.is_legal_move[Coord::new(0, 0)] = true;
        assert_eq!(
            RulesEngine::from_state(state).unwrap_err(),
            BoardError::OccupiedMarkedLegal(Coord::new(0, 0))
        );
    }

    #[test]
    fn test_occupied_point_refused_even_if_mask_allows_it() {
        let mut e = engine();
        e.play(Coord::new(0, 0));
        e.state.is_legal_move[Coord::new(0, 0)] = true;
        assert_eq!(
            e.try_play(Coord::new(0, 0)),
            Err(MoveError::Occupied(Coord::new(0, 0)))
        );
        assert_eq!(e.grid()[Coord::new(0, 0)], Some(Color::Black));
        assert_eq!(e.move_count(), 1);
    }
}
