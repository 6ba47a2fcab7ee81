use std::ops::{Add, AddAssign};

/// A cell on the playfield, addressed as (row, col).
///
/// Values may fall outside the playfield; bounds checks are left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Component-wise sum of `self` and `offset`.
    pub fn translate(self, offset: Coord) -> Self {
        Coord::new(self.row + offset.row, self.col + offset.col)
    }

    pub fn moved(self, direction: Direction) -> Self {
        self.translate(direction.unit())
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        self.translate(rhs)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        *self = self.translate(rhs);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    Left,
    Down,
    #[default]
    Right,
}

impl Direction {
    /// One step in this direction. Rows grow downwards.
    pub const fn unit(self) -> Coord {
        match self {
            Direction::Up => Coord::new(-1, 0),
            Direction::Left => Coord::new(0, -1),
            Direction::Down => Coord::new(1, 0),
            Direction::Right => Coord::new(0, 1),
        }
    }
}
