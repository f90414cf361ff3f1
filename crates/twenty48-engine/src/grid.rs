//! Square tile storage.
//!
//! [`Grid`] owns the `size`×`size` tile values of a board in row-major
//! order. [`Line`] describes one row or column of it, ordered from the wall
//! that tiles travel toward, so the four move directions share a single
//! merge/slide algorithm.

use std::fmt;

use crate::error::BoardError;
use crate::geom::{Direction, Point, Range};

/// A tile value. `0` is an empty cell; occupied cells hold a power of two.
pub type Tile = u32;

/// Whether `value` may appear on a board (0 or a power of two ≥ 2).
#[inline]
pub fn is_valid_tile(value: Tile) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A square 2D grid of [`Tile`] values.
///
/// With the `serde` feature a grid is (de)serialized as its rows, and
/// deserializing goes through [`Grid::from_rows`] so the shape is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")
)]
pub struct Grid {
    cells: Vec<Tile>,
    size: i32,
}

impl Grid {
    /// Create an all-empty grid. A negative size yields an empty grid.
    pub fn new(size: i32) -> Self {
        let n = size.max(0) as usize;
        Self {
            cells: vec![0; n * n],
            size: size.max(0),
        }
    }

    /// Build a grid from rows, addressed as `rows[y][x]`.
    ///
    /// Fails with [`BoardError::InvalidConfig`] if there are no rows or the
    /// rows do not form a square.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, BoardError> {
        let n = rows.len();
        if n == 0 {
            return Err(BoardError::InvalidConfig("initial grid is empty".into()));
        }
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(BoardError::InvalidConfig(format!(
                "initial grid is not square: row {y} has {} cells, expected {n}",
                row.len()
            )));
        }
        let size = i32::try_from(n)
            .map_err(|_| BoardError::InvalidConfig(format!("grid size {n} is too large")))?;
        Ok(Self {
            cells: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Side length of the grid.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The range of valid coordinates.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::square(self.size)
    }

    /// Whether `p` addresses a cell of this grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y as usize) * (self.size as usize) + (p.x as usize))
    }

    /// Get the tile at a point, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Get the tile at a point, failing with [`BoardError::OutOfBounds`].
    pub fn get(&self, p: Point) -> Result<Tile, BoardError> {
        self.at(p).ok_or(BoardError::OutOfBounds {
            pos: p,
            size: self.size,
        })
    }

    /// Set the tile at a point, failing with [`BoardError::OutOfBounds`].
    pub fn set(&mut self, p: Point, value: Tile) -> Result<(), BoardError> {
        let i = self.index(p).ok_or(BoardError::OutOfBounds {
            pos: p,
            size: self.size,
        })?;
        self.cells[i] = value;
        Ok(())
    }

    /// In-bounds write for engine internals; points come from [`Line`]s or
    /// [`Grid::iter`] and are always valid.
    #[inline]
    pub(crate) fn put(&mut self, p: Point, value: Tile) {
        if let Some(i) = self.index(p) {
            self.cells[i] = value;
        }
    }

    /// In-bounds read for engine internals.
    #[inline]
    pub(crate) fn value(&self, p: Point) -> Tile {
        self.at(p).unwrap_or(0)
    }

    /// Copy every value from `src` into `self`.
    ///
    /// Fails with [`BoardError::ShapeMismatch`] if the sizes differ.
    pub fn copy_from(&mut self, src: &Grid) -> Result<(), BoardError> {
        if src.size != self.size {
            return Err(BoardError::ShapeMismatch {
                expected: self.size,
                found: src.size,
            });
        }
        self.cells.copy_from_slice(&src.cells);
        Ok(())
    }

    /// Largest value on the grid (0 when every cell is empty).
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Empty cells in row-major order.
    pub fn empty_points(&self) -> Vec<Point> {
        self.iter()
            .filter_map(|(p, v)| (v == 0).then_some(p))
            .collect()
    }

    /// Iterate over `(Point, Tile)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        // `max(1)` keeps `chunks` happy on a zero-sized grid, which has no cells anyway.
        self.cells.chunks(self.size.max(1) as usize)
    }

    /// The `index`-th line traversed when moving in `dir`: rows for
    /// horizontal moves, columns for vertical ones.
    #[inline]
    pub fn line(&self, dir: Direction, index: i32) -> Line {
        Line::new(dir, index, self.size)
    }
}

impl TryFrom<Vec<Vec<Tile>>> for Grid {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Tile>> {
    fn from(grid: Grid) -> Self {
        grid.rows().map(<[Tile]>::to_vec).collect()
    }
}

impl fmt::Display for Grid {
    /// Unformatted dump: values separated by one space, one row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let mut first = true;
            for v in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{v}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// One row or column of a grid, ordered wall-first.
///
/// Position 0 is the cell touching the wall that tiles move toward; each
/// following position steps one cell away from it. Tiles therefore always
/// travel toward *lower* positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Line {
    start: Point,
    step: Point,
    len: i32,
}

impl Line {
    /// The `index`-th row (horizontal moves) or column (vertical moves) of a
    /// `size`×`size` grid, traversed against the direction of travel.
    pub fn new(dir: Direction, index: i32, size: i32) -> Self {
        let delta = dir.delta();
        let wall = if delta.x + delta.y < 0 { 0 } else { size - 1 };
        let start = if dir.is_horizontal() {
            Point::new(wall, index)
        } else {
            Point::new(index, wall)
        };
        Self {
            start,
            step: -delta,
            len: size,
        }
    }

    /// Number of cells in the line.
    #[inline]
    pub(crate) fn len(&self) -> i32 {
        self.len
    }

    /// Grid coordinate of position `i`.
    #[inline]
    pub fn point(&self, i: i32) -> Point {
        self.start + self.step * i
    }

    /// Grid coordinates, wall-first.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.len).map(|i| self.point(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_size() {
        let g = Grid::new(4);
        assert_eq!(g.size(), 4);
        assert_eq!(g.count_empty(), 16);
        assert_eq!(g.max_tile(), 0);
        assert_eq!(Grid::new(-2).size(), 0);
    }

    #[test]
    fn set_and_get() {
        let mut g = Grid::new(4);
        let p = Point::new(2, 3);
        g.set(p, 8).unwrap();
        assert_eq!(g.get(p), Ok(8));
        assert_eq!(g.at(Point::new(0, 0)), Some(0));
        assert_eq!(g.at(Point::new(4, 0)), None);
        assert_eq!(
            g.get(Point::new(-1, 0)),
            Err(BoardError::OutOfBounds {
                pos: Point::new(-1, 0),
                size: 4
            })
        );
        assert!(g.set(Point::new(0, 4), 2).is_err());
    }

    #[test]
    fn from_rows_is_row_major() {
        let g = Grid::from_rows(vec![vec![2, 4], vec![8, 0]]).unwrap();
        assert_eq!(g.at(Point::new(1, 0)), Some(4));
        assert_eq!(g.at(Point::new(0, 1)), Some(8));
        assert_eq!(g.max_tile(), 8);
        assert_eq!(g.empty_points(), vec![Point::new(1, 1)]);
    }

    #[test]
    fn from_rows_rejects_bad_shapes() {
        assert!(matches!(
            Grid::from_rows(vec![]),
            Err(BoardError::InvalidConfig(_))
        ));
        assert!(matches!(
            Grid::from_rows(vec![vec![2, 4], vec![8]]),
            Err(BoardError::InvalidConfig(_))
        ));
        assert!(matches!(
            Grid::from_rows(vec![vec![2, 4, 8], vec![8, 2, 4]]),
            Err(BoardError::InvalidConfig(_))
        ));
    }

    #[test]
    fn copy_from_requires_same_size() {
        let src = Grid::from_rows(vec![vec![2, 0], vec![0, 4]]).unwrap();
        let mut dst = Grid::new(2);
        dst.copy_from(&src).unwrap();
        assert_eq!(dst, src);

        let mut wrong = Grid::new(3);
        assert_eq!(
            wrong.copy_from(&src),
            Err(BoardError::ShapeMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn plain_display() {
        let g = Grid::from_rows(vec![vec![2, 0], vec![16, 4]]).unwrap();
        assert_eq!(g.to_string(), "2 0\n16 4\n");
    }

    #[test]
    fn lines_start_at_the_wall() {
        let left: Vec<_> = Line::new(Direction::Left, 1, 3).points().collect();
        assert_eq!(
            left,
            vec![Point::new(0, 1), Point::new(1, 1), Point::new(2, 1)]
        );
        let right: Vec<_> = Line::new(Direction::Right, 0, 3).points().collect();
        assert_eq!(
            right,
            vec![Point::new(2, 0), Point::new(1, 0), Point::new(0, 0)]
        );
        let up: Vec<_> = Line::new(Direction::Up, 2, 3).points().collect();
        assert_eq!(up, vec![Point::new(2, 0), Point::new(2, 1), Point::new(2, 2)]);
        let down: Vec<_> = Line::new(Direction::Down, 0, 3).points().collect();
        assert_eq!(
            down,
            vec![Point::new(0, 2), Point::new(0, 1), Point::new(0, 0)]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_checks_the_shape() {
        let g = Grid::from_rows(vec![vec![2, 0], vec![16, 4]]).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, "[[2,0],[16,4]]");
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);

        assert!(serde_json::from_str::<Grid>("[[2,0],[0]]").is_err());
        assert!(serde_json::from_str::<Grid>("[]").is_err());
        assert!(serde_json::from_str::<Grid>(r#"{"cells":[2,0,0],"size":2}"#).is_err());
    }

    #[test]
    fn row_conversions() {
        let g = Grid::try_from(vec![vec![8, 2], vec![0, 4]]).unwrap();
        assert_eq!(Vec::<Vec<Tile>>::from(g), vec![vec![8, 2], vec![0, 4]]);
        assert!(Grid::try_from(vec![vec![2, 4, 8]]).is_err());
    }

    #[test]
    fn tile_domain() {
        assert!(is_valid_tile(0));
        assert!(is_valid_tile(2));
        assert!(is_valid_tile(2048));
        assert!(!is_valid_tile(1));
        assert!(!is_valid_tile(3));
        assert!(!is_valid_tile(12));
    }
}
