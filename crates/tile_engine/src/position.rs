use std::{
    cmp::Ordering,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

/// Integer grid coordinate
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Snap a world-space point to the grid cell it falls into.
    ///
    /// Halves round to the even neighbour, so 0.5 snaps to 0 and 1.5 to 2.
    pub fn from_world(x: f32, y: f32) -> Self {
        Position::new(x.round_ties_even() as i32, y.round_ties_even() as i32)
    }

    pub fn min(self, other: Self) -> Self {
        Position::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Self) -> Self {
        Position::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// The edge-adjacent neighbours. Cells past the `i32` range are left out.
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        let Position { x, y } = self;
        [
            x.checked_sub(1).map(|x| Position::new(x, y)),
            x.checked_add(1).map(|x| Position::new(x, y)),
            y.checked_sub(1).map(|y| Position::new(x, y)),
            y.checked_add(1).map(|y| Position::new(x, y)),
        ]
        .into_iter()
        .flatten()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl Add<Position> for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Position> for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// Row-major, so sorted tile lists read top-to-bottom, left-to-right.
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
