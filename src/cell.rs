use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cell in public coordinates: 1-indexed, x grows to the right, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Convert a 0-indexed grid coordinate into a public cell
    pub fn from_index(x: usize, y: usize) -> Self {
        Cell {
            x: x as i32 + 1,
            y: y as i32 + 1,
        }
    }

    /// 0-indexed coordinate, or None when the cell lies left of or above the grid
    pub fn to_index(self) -> Option<(usize, usize)> {
        if self.x < 1 || self.y < 1 {
            return None;
        }
        Some(((self.x - 1) as usize, (self.y - 1) as usize))
    }

    /// The neighbouring cell one step in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// The neighbouring cell one step against `direction`
    pub fn step_back(self, direction: Direction) -> Self {
        self.step(direction.inverse())
    }

    /// Manhattan distance, the admissible heuristic for 4-directional unit-cost moves
    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

/// One of the four moves the game accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Candidate approach directions, in the order the insight query tries them
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Map a unit coordinate delta back to its direction
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}
