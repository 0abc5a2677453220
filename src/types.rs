// Core value types shared by the tour engine, the session and the JSON API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest board on which a tour is meaningful
pub const MIN_BOARD_SIZE: i32 = 3;

/// A square on the board, 0-indexed from the top-left corner
///
/// Coordinates are signed so that knight offsets can be applied before the
/// result is bounds-checked against the board.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// Returns the cell reached by applying a relative offset
    pub fn offset(&self, d_row: i32, d_col: i32) -> Cell {
        Cell {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Like `offset`, but `None` when either coordinate would overflow
    pub fn checked_offset(&self, d_row: i32, d_col: i32) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add(d_row)?,
            col: self.col.checked_add(d_col)?,
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Whether the tour must end a knight's move away from its start
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TourType {
    Open,
    Closed,
}

impl TourType {
    /// Converts tour type to the string used in ledger keys and the API
    pub fn as_str(&self) -> &'static str {
        match self {
            TourType::Open => "open",
            TourType::Closed => "closed",
        }
    }
}

impl fmt::Display for TourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TourType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TourType::Open),
            "closed" => Ok(TourType::Closed),
            _ => Err(format!("Invalid tour type: {}", s)),
        }
    }
}

/// Board dimensions and tour rules, fixed for the lifetime of one tour
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardConfig {
    pub size: i32,
    pub tour_type: TourType,
}

impl BoardConfig {
    /// Creates a configuration, rejecting boards smaller than 3x3
    pub fn new(size: i32, tour_type: TourType) -> Result<Self, crate::tour::TourError> {
        if size < MIN_BOARD_SIZE {
            return Err(crate::tour::TourError::InvalidBoardSize { size });
        }
        Ok(BoardConfig { size, tour_type })
    }

    pub fn total_cells(&self) -> usize {
        (self.size * self.size) as usize
    }
}

/// One of the eight L-shaped knight jumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KnightOffset {
    pub d_row: i32,
    pub d_col: i32,
}

/// Knight jumps in canonical order; hint tie-breaking depends on this order
pub const KNIGHT_OFFSETS: [KnightOffset; 8] = [
    KnightOffset { d_row: -2, d_col: -1 },
    KnightOffset { d_row: -2, d_col: 1 },
    KnightOffset { d_row: -1, d_col: -2 },
    KnightOffset { d_row: -1, d_col: 2 },
    KnightOffset { d_row: 1, d_col: -2 },
    KnightOffset { d_row: 1, d_col: 2 },
    KnightOffset { d_row: 2, d_col: -1 },
    KnightOffset { d_row: 2, d_col: 1 },
];

impl KnightOffset {
    /// Returns all eight offsets in canonical order
    pub fn all() -> [KnightOffset; 8] {
        KNIGHT_OFFSETS
    }

    /// Calculates the destination when jumping from `cell`
    pub fn apply(&self, cell: &Cell) -> Cell {
        cell.offset(self.d_row, self.d_col)
    }
}

/// Per-cell marker used by the advisor oracle wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CellMarker {
    Unvisited = 0,
    Visited = 1,
    Current = 2,
}

impl CellMarker {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
