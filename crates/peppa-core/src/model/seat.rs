use core::fmt;
use serde::{Deserialize, Serialize};

/// Fixed seat around the table. Seat 0 (`South`) is the human player and
/// play proceeds in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    South = 0,
    West = 1,
    North = 2,
    East = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::South, Seat::West, Seat::North, Seat::East];

    pub const HUMAN: Seat = Seat::South;

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::South),
            1 => Some(Seat::West),
            2 => Some(Seat::North),
            3 => Some(Seat::East),
            _ => None,
        }
    }

    /// Seat at `index mod 4`.
    pub const fn wrapping(index: usize) -> Self {
        Self::LOOP[index % 4]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_human(self) -> bool {
        matches!(self, Seat::South)
    }

    /// Seat at index + 1.
    pub const fn next(self) -> Seat {
        Self::wrapping(self.index() + 1)
    }

    /// Seat at index + 3.
    pub const fn previous(self) -> Seat {
        Self::wrapping(self.index() + 3)
    }

    /// Seat at index + 2.
    pub const fn opposite(self) -> Seat {
        Self::wrapping(self.index() + 2)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::South => "South",
            Seat::West => "West",
            Seat::North => "North",
            Seat::East => "East",
        };
        f.write_str(label)
    }
}
