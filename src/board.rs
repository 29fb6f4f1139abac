use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topology::{Coord, Size};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("black"),
            Color::White => f.write_str("white"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("matrix has no columns")]
    Empty,
    #[error("column {column} has {found} cells, expected {expected}")]
    Ragged {
        column: usize,
        found: usize,
        expected: usize,
    },
}

/// A `width x height` table of cells addressed by canonical coordinates.
///
/// Serializes column-major as nested arrays, `cells[x][y]`, which is the
/// layout viewers index into.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Vec<T>>",
    into = "Vec<Vec<T>>",
    bound(serialize = "T: Clone + Serialize", deserialize = "T: Deserialize<'de>")
)]
pub struct Matrix<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Stones on the board; `None` is an empty point.
pub type Grid = Matrix<Option<Color>>;

/// `true` where the side to move may place a stone.
pub type LegalMask = Matrix<bool>;

impl<T: Clone> Matrix<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Matrix<T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Size {
        Size {
            x: self.width,
            y: self.height,
        }
    }

    fn idx(&self, c: Coord) -> Option<usize> {
        let (x, y) = (usize::try_from(c.x).ok()?, usize::try_from(c.y).ok()?);
        (x < self.width && y < self.height).then_some(x * self.height + y)
    }

    /// The cell at `c`, or `None` if `c` is not canonical for this matrix.
    pub fn get(&self, c: Coord) -> Option<&T> {
        self.idx(c).map(|i| &self.cells[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        let h = self.height;
        self.cells.iter().enumerate().map(move |(i, v)| {
            let c = Coord::new((i / h) as i64, (i % h) as i64);
            (c, v)
        })
    }

    /// Raw cells in storage order (column-major).
    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}

impl<T> Index<Coord> for Matrix<T> {
    type Output = T;

    fn index(&self, c: Coord) -> &T {
        match self.idx(c) {
            Some(i) => &self.cells[i],
            None => panic!("{c} is outside a {}x{} board", self.width, self.height),
        }
    }
}

impl<T> IndexMut<Coord> for Matrix<T> {
    fn index_mut(&mut self, c: Coord) -> &mut T {
        match self.idx(c) {
            Some(i) => &mut self.cells[i],
            None => panic!("{c} is outside a {}x{} board", self.width, self.height),
        }
    }
}

impl<T> TryFrom<Vec<Vec<T>>> for Matrix<T> {
    type Error = MatrixError;

    fn try_from(columns: Vec<Vec<T>>) -> Result<Self, Self::Error> {
        let width = columns.len();
        let height = columns.first().map(Vec::len).ok_or(MatrixError::Empty)?;
        let mut cells = Vec::with_capacity(width * height);
        for (column, col) in columns.into_iter().enumerate() {
            if col.len() != height {
                return Err(MatrixError::Ragged {
                    column,
                    found: col.len(),
                    expected: height,
                });
            }
            cells.extend(col);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl<T: Clone> From<Matrix<T>> for Vec<Vec<T>> {
    fn from(m: Matrix<T>) -> Self {
        if m.height == 0 {
            return vec![Vec::new(); m.width];
        }
        m.cells.chunks(m.height).map(<[T]>::to_vec).collect()
    }
}

impl Grid {
    pub fn empty(width: usize, height: usize) -> Self {
        Self::filled(width, height, None)
    }

    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self[Coord::new(x as i64, y as i64)] {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
