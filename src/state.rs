use crate::geometry::{Coord, Direction};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const MAX_FOOD: usize = 1;

/// Inclusive playable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_row: i32,
    pub min_col: i32,
    pub max_row: i32,
    pub max_col: i32,
}

impl Bounds {
    /// Bounds covering a surface of `height` rows by `width` columns.
    /// A zero extent is treated as one so the range is never empty.
    pub fn from_size(height: u16, width: u16) -> Self {
        Self {
            min_row: 0,
            min_col: 0,
            max_row: height.max(1) as i32 - 1,
            max_col: width.max(1) as i32 - 1,
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (self.min_row..=self.max_row).contains(&coord.row)
            && (self.min_col..=self.max_col).contains(&coord.col)
    }
}

/// Random food placement: one generator, one uniform distribution per axis.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    rng: StdRng,
    rows: Uniform<i32>,
    cols: Uniform<i32>,
}

impl FoodSpawner {
    pub fn new(bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(bounds: Bounds, rng: StdRng) -> Self {
        Self {
            rng,
            rows: Uniform::new_inclusive(bounds.min_row, bounds.max_row),
            cols: Uniform::new_inclusive(bounds.min_col, bounds.max_col),
        }
    }

    /// A spawner over `bounds` that continues this one's random stream.
    pub fn rebound(&self, bounds: Bounds) -> Self {
        Self::with_rng(bounds, self.rng.clone())
    }

    /// Any in-bounds cell, occupied or not.
    pub fn next_coord(&mut self) -> Coord {
        let row = self.rows.sample(&mut self.rng);
        let col = self.cols.sample(&mut self.rng);
        Coord::new(row, col)
    }
}

/// Everything one play session mutates.
#[derive(Debug, Clone)]
pub struct GameState {
    pub direction: Direction,
    pub score: u32,
    /// Authoritative snake position; appended to `body` during each tick.
    pub head: Coord,
    pub snake_max_length: usize,
    /// Oldest segment first.
    pub body: VecDeque<Coord>,
    pub max_food: usize,
    pub food: Vec<Coord>,
    pub bounds: Bounds,
    pub spawner: FoodSpawner,
}

impl GameState {
    pub fn new(bounds: Bounds, seed: u64) -> Self {
        Self::with_spawner(bounds, FoodSpawner::new(bounds, seed))
    }

    pub fn with_spawner(bounds: Bounds, spawner: FoodSpawner) -> Self {
        Self {
            direction: Direction::Right,
            score: 0,
            head: Coord::new(0, 0),
            snake_max_length: INITIAL_SNAKE_LENGTH,
            body: VecDeque::new(),
            max_food: MAX_FOOD,
            food: Vec::new(),
            bounds,
            spawner,
        }
    }

    /// Replaces the whole state with a fresh one for `bounds`. Only the
    /// random stream carries over.
    pub fn rebuild(&mut self, bounds: Bounds) {
        let spawner = self.spawner.rebound(bounds);
        *self = Self::with_spawner(bounds, spawner);
    }

    pub fn hits_wall(&self) -> bool {
        !self.bounds.contains(self.head)
    }

    pub fn hits_body(&self) -> bool {
        self.body.contains(&self.head)
    }

    /// Tops the food set back up to `max_food`, returning the new cells.
    pub fn replenish_food(&mut self) -> &[Coord] {
        let start = self.food.len();
        while self.food.len() < self.max_food {
            let cell = self.spawner.next_coord();
            tracing::trace!(row = cell.row, col = cell.col, "food spawned");
            self.food.push(cell);
        }
        &self.food[start..]
    }

    /// Eats the food under the head, if any.
    pub fn eat(&mut self) -> bool {
        match self.food.iter().position(|&cell| cell == self.head) {
            Some(index) => {
                self.food.remove(index);
                self.score += 1;
                self.snake_max_length += 1;
                true
            }
            None => false,
        }
    }

    /// Appends the head to the body and returns the tail cell dropped to
    /// stay within `snake_max_length`.
    pub fn grow_head(&mut self) -> Option<Coord> {
        self.body.push_back(self.head);
        if self.body.len() > self.snake_max_length {
            self.body.pop_front()
        } else {
            None
        }
    }

    /// Every field except the random stream, for equality checks.
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> String {
        format!(
            "{:?} {} {:?} {} {:?} {} {:?} {:?}",
            self.direction,
            self.score,
            self.head,
            self.snake_max_length,
            self.body,
            self.max_food,
            self.food,
            self.bounds
        )
    }
}
