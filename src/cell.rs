use core::fmt;
use grid_util::point::Point;

/// A single position on the grid, addressed by row and column. Rows grow downwards and columns
/// grow to the right, so [Direction::Up] decrements the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Cell {
        Cell { row, col }
    }

    /// The cell one unit step away in the given direction. May lie outside the grid.
    pub fn step(self, direction: Direction) -> Cell {
        let (d_row, d_col) = direction.delta();
        Cell::new(self.row + d_row, self.col + d_col)
    }

    pub fn manhattan_distance(&self, other: &Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether the two cells differ by exactly one unit in exactly one coordinate.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Storage coordinates for [grid_util] grids, which are indexed by (x, y) = (col, row).
    pub(crate) fn point(self) -> Point {
        Point::new(self.col, self.row)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four unit moves of a 4-connected grid. [Direction::ALL] fixes the order in which
/// neighbours are generated, which in turn fixes enumeration order and search tie-breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column offsets of the move.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}
