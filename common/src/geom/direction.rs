use super::coord::GridCoord;
use std::fmt;

/// Orthogonal move directions. `ALL` fixes the neighbor expansion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    #[inline(always)]
    pub fn from_index(idx: usize) -> Option<Direction> {
        Self::ALL.get(idx).copied()
    }

    /// Direction of a single step from `from` to `to`, if they are adjacent.
    pub fn between(from: GridCoord, to: GridCoord) -> Option<Direction> {
        if from.x == to.x {
            if to.y + 1 == from.y {
                return Some(Direction::North);
            }
            if from.y + 1 == to.y {
                return Some(Direction::South);
            }
        } else if from.y == to.y {
            if from.x + 1 == to.x {
                return Some(Direction::East);
            }
            if to.x + 1 == from.x {
                return Some(Direction::West);
            }
        }
        None
    }

    /// Neighbor of `c` in this direction, or `None` when it would leave
    /// a `width` x `height` canvas.
    #[inline]
    pub fn step(self, c: GridCoord, width: u32, height: u32) -> Option<GridCoord> {
        match self {
            Direction::North if c.y > 0 => Some(GridCoord::new(c.x, c.y - 1)),
            Direction::South if c.y + 1 < height => Some(GridCoord::new(c.x, c.y + 1)),
            Direction::East if c.x + 1 < width => Some(GridCoord::new(c.x + 1, c.y)),
            Direction::West if c.x > 0 => Some(GridCoord::new(c.x - 1, c.y)),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        };
        f.write_str(s)
    }
}
