//! Grid coordinates and compass headings.
//!
//! `y` grows southwards, so turning left from east faces north.

use serde::{Deserialize, Serialize};

/// Intersection coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, ignoring wrap-around.
    pub fn distance(&self, other: &Location) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// One block along `heading`, wrapping at the grid edges.
    pub fn step(&self, heading: Heading, width: i32, height: i32) -> Location {
        let (dx, dy) = heading.delta();
        Location {
            x: (self.x + dx).rem_euclid(width),
            y: (self.y + dy).rem_euclid(height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Unit step as `(dx, dy)`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    pub fn turn_left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    pub fn turn_right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    pub fn opposite(self) -> Heading {
        self.turn_left().turn_left()
    }

    /// Travelling along the north-south axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Heading::North | Heading::South)
    }
}
