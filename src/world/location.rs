//! Grid coordinates and compass directions on a toroidal map.
//!
//! Locations are always stored normalized into `[0, rows) x [0, cols)`.
//! They carry no reference to the world that produced them; anything that
//! needs the map dimensions takes a `MapSize` explicitly.

use std::fmt;

/// Dimensions of the toroidal map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapSize {
    pub rows: usize,
    pub cols: usize,
}

impl MapSize {
    /// Creates a map size of `rows` by `cols` cells.
    pub const fn new(rows: usize, cols: usize) -> Self {
        MapSize { rows, cols }
    }

    /// True if `loc` is already normalized onto this map.
    pub const fn contains(self, loc: Location) -> bool {
        loc.row < self.rows && loc.col < self.cols
    }

    /// Wraps an arbitrary (possibly negative or out-of-range) coordinate
    /// onto the map.
    pub fn wrap(self, row: i64, col: i64) -> Location {
        let rows = self.rows.max(1) as i64;
        let cols = self.cols.max(1) as i64;
        Location {
            row: row.rem_euclid(rows) as usize,
            col: col.rem_euclid(cols) as usize,
        }
    }

    /// Total number of cells.
    pub const fn area(self) -> usize {
        self.rows * self.cols
    }

    /// Row-major index of a location.
    pub const fn index(self, loc: Location) -> usize {
        loc.row * self.cols + loc.col
    }

    /// Inverse of [`MapSize::index`].
    pub const fn location_at(self, idx: usize) -> Location {
        Location {
            row: idx / self.cols,
            col: idx % self.cols,
        }
    }

    /// Wrap-aware absolute delta along the row axis.
    pub fn row_delta(self, a: Location, b: Location) -> usize {
        let d = a.row.abs_diff(b.row);
        d.min(self.rows - d)
    }

    /// Wrap-aware absolute delta along the column axis.
    pub fn col_delta(self, a: Location, b: Location) -> usize {
        let d = a.col.abs_diff(b.col);
        d.min(self.cols - d)
    }
}

/// A normalized grid coordinate.
///
/// Build one from raw judge input with [`MapSize::wrap`]. Geometry on a
/// location outside the map it is used with is meaningless and may panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    /// Creates a location from coordinates the caller knows are in range.
    ///
    /// Nothing is wrapped or checked here; use [`MapSize::wrap`] for raw
    /// coordinates.
    pub const fn new(row: usize, col: usize) -> Self {
        Location { row, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four moves a unit can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

/// All directions in the order neighbors are tried.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

impl Direction {
    /// The (row, col) offset of one step in this direction.
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    /// Returns the single-character protocol letter.
    pub const fn protocol_char(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        }
    }

}
