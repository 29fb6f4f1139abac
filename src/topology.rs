//! Board topologies and coordinate normalization.
//!
//! Every board is a `width x height` rectangle whose edges may be glued
//! together. A *logical* coordinate can lie anywhere on the integer plane;
//! [`Topology::normalize`] maps it to its *canonical* in-bounds representative,
//! or reports that it falls off the board. All adjacency in the engine goes
//! through `normalize`, nothing else computes wraparound.
//!
//! | Topology     | x axis              | y axis            |
//! |--------------|---------------------|-------------------|
//! | Torus        | periodic            | periodic          |
//! | Cylinder     | periodic            | bounded           |
//! | Möbius strip | periodic, flips y   | bounded           |
//! | Klein bottle | periodic, flips y   | periodic          |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DIRECTIONS;

/// Why a board could not be set up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board size {width}x{height}: both sides must be at least 1")]
    InvalidBoardSize { width: usize, height: usize },
    #[error("state does not match its {size} {kind} board")]
    SizeMismatch { kind: TopologyKind, size: Size },
    #[error("state marks occupied point {0} as a legal move")]
    OccupiedMarkedLegal(Coord),
}

/// A point on (or off) the board.
///
/// Logical coordinates may be negative or arbitrarily large; canonical
/// coordinates satisfy `0 <= x < width` and `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate {0:?}, expected \"x,y\"")]
pub struct ParseCoordError(String);

impl FromStr for Coord {
    type Err = ParseCoordError;

    /// Parse the `"x,y"` form used on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordError(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Coord::new(x, y))
    }
}

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub x: usize,
    /// Height
    pub y: usize,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// The four supported ways of gluing the board edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopologyKind {
    #[serde(rename = "torus")]
    Torus,
    #[serde(rename = "cylinder")]
    Cylinder,
    #[serde(rename = "mobius")]
    MobiusStrip,
    #[serde(rename = "klein")]
    KleinBottle,
}

impl TopologyKind {
    pub const ALL: [TopologyKind; 4] = [
        TopologyKind::Torus,
        TopologyKind::Cylinder,
        TopologyKind::MobiusStrip,
        TopologyKind::KleinBottle,
    ];

    /// Short name, as used on the wire and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            TopologyKind::Torus => "torus",
            TopologyKind::Cylinder => "cylinder",
            TopologyKind::MobiusStrip => "mobius",
            TopologyKind::KleinBottle => "klein",
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown topology {0:?} (expected torus, cylinder, mobius or klein)")]
pub struct ParseTopologyError(String);

impl FromStr for TopologyKind {
    type Err = ParseTopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "torus" => Ok(TopologyKind::Torus),
            "cylinder" => Ok(TopologyKind::Cylinder),
            "mobius" | "mobius_strip" => Ok(TopologyKind::MobiusStrip),
            "klein" | "klein_bottle" => Ok(TopologyKind::KleinBottle),
            _ => Err(ParseTopologyError(s.to_string())),
        }
    }
}

/// Which axes a viewer should treat as wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub x: bool,
    pub y: bool,
}

/// A topology together with the board size it applies to.
///
/// Stateless after construction. Serializes flat as `topology` and `size`
/// so it can be embedded in a game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    #[serde(rename = "topology")]
    pub kind: TopologyKind,
    pub size: Size,
}

impl Topology {
    /// Create a topology. Both sides must be at least 1.
    pub fn new(kind: TopologyKind, width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidBoardSize { width, height });
        }
        Ok(Self {
            kind,
            size: Size {
                x: width,
                y: height,
            },
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Map a logical coordinate to its canonical representative.
    ///
    /// Returns `None` when the coordinate lies outside a bounded axis. Never
    /// returns `None` for the torus or the Klein bottle.
    pub fn normalize(&self, c: Coord) -> Option<Coord> {
        let w = self.size.x as i64;
        let h = self.size.y as i64;
        let in_rows = 0 <= c.y && c.y < h;

        match self.kind {
            TopologyKind::Torus => Some(Coord::new(c.x.rem_euclid(w), c.y.rem_euclid(h))),
            TopologyKind::Cylinder => in_rows.then(|| Coord::new(c.x.rem_euclid(w), c.y)),
            TopologyKind::MobiusStrip => {
                if !in_rows {
                    return None;
                }
                let fx = c.x.rem_euclid(2 * w);
                if fx < w {
                    Some(Coord::new(fx, c.y))
                } else {
                    Some(Coord::new(fx - w, h - 1 - c.y))
                }
            }
            TopologyKind::KleinBottle => {
                let fx = c.x.rem_euclid(2 * w);
                let fy = c.y.rem_euclid(h);
                if fx < w {
                    Some(Coord::new(fx, fy))
                } else {
                    // (h - 1 - y) mod h, without overflowing on extreme y
                    Some(Coord::new(fx - w, h - 1 - fy))
                }
            }
        }
    }

    /// Whether `c` is already canonical.
    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        0 <= c.x && c.x < self.size.x as i64 && 0 <= c.y && c.y < self.size.y as i64
    }

    /// The cardinal neighbors of `c` that exist on the board, normalized.
    ///
    /// May contain duplicates, or `c` itself, on very narrow boards.
    pub fn neighbors(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        DIRECTIONS
            .iter()
            .filter_map(move |&(dx, dy)| self.normalize(c.offset(dx, dy)))
    }

    /// All canonical coordinates, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (w, h) = (self.size.x as i64, self.size.y as i64);
        (0..h).flat_map(move |y| (0..w).map(move |x| Coord::new(x, y)))
    }

    /// Axes along which the board repeats and so is drawn with shadow copies.
    pub fn extend_axes(&self) -> Axes {
        match self.kind {
            TopologyKind::Torus | TopologyKind::KleinBottle => Axes { x: true, y: true },
            TopologyKind::Cylinder | TopologyKind::MobiusStrip => Axes { x: true, y: false },
        }
    }

    /// Axes along which a viewer may scroll the board.
    ///
    /// Scrolling a Klein bottle along y would mirror half the view, so only x
    /// is offered there.
    pub fn scroll_axes(&self) -> Axes {
        match self.kind {
            TopologyKind::KleinBottle => Axes { x: true, y: false },
            _ => self.extend_axes(),
        }
    }
}
