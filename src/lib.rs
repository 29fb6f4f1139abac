//! Wrap-Go: the rules of Go on boards whose edges are glued together.
//!
//! Supported boards are the torus, the cylinder, the Möbius strip and the
//! Klein bottle, each of any width and height. The engine tracks captures and
//! prisoners, forbids any move that would recreate an earlier position
//! (positional superko), and keeps a full undo history.
//!
//! ## Modules
//!
//! - [`constants`] - Neighbor offsets, hashing seed and CLI defaults
//! - [`topology`] - Coordinates and per-topology normalization
//! - [`board`] - Stone colors and the grid / legality matrices
//! - [`zobrist`] - Position hashing and the superko history
//! - [`position`] - Game state, group search, captures and legality
//! - [`engine`] - The stateful rules engine with play and undo
//! - [`protocol`] - Text protocol front-end
//!
//! ## Example
//!
//! ```
//! use wrap_go::board::Color;
//! use wrap_go::engine::RulesEngine;
//! use wrap_go::topology::{Coord, TopologyKind};
//!
//! let mut engine = RulesEngine::new(TopologyKind::Torus, 5, 5).unwrap();
//! engine.play(Coord::new(2, 2));
//! // White surrounds the black stone while black plays elsewhere.
//! for (white, black) in [((1, 2), (0, 0)), ((3, 2), (4, 0)), ((2, 1), (0, 4))] {
//!     engine.play(Coord::new(white.0, white.1));
//!     engine.play(Coord::new(black.0, black.1));
//! }
//! engine.play(Coord::new(2, 3));
//! assert_eq!(engine.grid()[Coord::new(2, 2)], None);
//! assert_eq!(engine.prisoners_taken_by().get(Color::White), 1);
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod position;
pub mod protocol;
pub mod topology;
pub mod zobrist;
