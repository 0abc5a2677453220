// Board model: grid bounds and the visited set
//
// The visited set is a flat bitset indexed by `row * size + col`, so membership
// checks and updates are O(1) without hashing.

use crate::types::{Cell, CellMarker};

/// Fixed-size square board with visited-cell tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: i32,
    visited: Vec<bool>,
    visited_count: usize,
}

impl Board {
    /// Creates an empty board of `size` x `size` cells
    pub fn new(size: i32) -> Self {
        let cells = (size.max(0) * size.max(0)) as usize;
        Board {
            size,
            visited: vec![false; cells],
            visited_count: 0,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Checks whether a coordinate lies on the board
    pub fn is_valid(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.size && col >= 0 && col < self.size
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.is_valid(cell.row, cell.col)
    }

    fn index(&self, cell: &Cell) -> Option<usize> {
        if self.contains(cell) {
            Some((cell.row * self.size + cell.col) as usize)
        } else {
            None
        }
    }

    /// Off-board cells are never visited
    pub fn is_visited(&self, cell: &Cell) -> bool {
        self.index(cell).map(|i| self.visited[i]).unwrap_or(false)
    }

    /// Marks a cell visited; returns false if it was off-board or already visited
    pub fn mark(&mut self, cell: &Cell) -> bool {
        match self.index(cell) {
            Some(i) if !self.visited[i] => {
                self.visited[i] = true;
                self.visited_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Clears a visited cell; returns false if it was not visited
    pub fn unmark(&mut self, cell: &Cell) -> bool {
        match self.index(cell) {
            Some(i) if self.visited[i] => {
                self.visited[i] = false;
                self.visited_count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    pub fn total_cells(&self) -> usize {
        self.visited.len()
    }

    pub fn is_full(&self) -> bool {
        self.visited_count == self.total_cells()
    }

    /// Serializes the board as a row-major grid of markers
    /// (0 = unvisited, 1 = visited, 2 = current knight position)
    pub fn marker_grid(&self, current: Option<Cell>) -> Vec<Vec<u8>> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| {
                        let cell = Cell::new(row, col);
                        let marker = if Some(cell) == current {
                            CellMarker::Current
                        } else if self.is_visited(&cell) {
                            CellMarker::Visited
                        } else {
                            CellMarker::Unvisited
                        };
                        marker.as_u8()
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_bounds() {
        let board = Board::new(5);
        assert!(board.is_valid(0, 0));
        assert!(board.is_valid(4, 4));
        assert!(!board.is_valid(-1, 0));
        assert!(!board.is_valid(0, 5));
        assert!(!board.is_valid(5, 2));
    }

    #[test]
    fn test_mark_and_unmark_track_count() {
        let mut board = Board::new(4);
        let cell = Cell::new(1, 2);

        assert!(board.mark(&cell));
        assert!(!board.mark(&cell), "double mark must be rejected");
        assert_eq!(board.visited_count(), 1);
        assert!(board.is_visited(&cell));

        assert!(board.unmark(&cell));
        assert!(!board.unmark(&cell));
        assert_eq!(board.visited_count(), 0);
    }

    #[test]
    fn test_off_board_cells_are_ignored() {
        let mut board = Board::new(3);
        assert!(!board.mark(&Cell::new(3, 0)));
        assert!(!board.is_visited(&Cell::new(-1, -1)));
        assert_eq!(board.visited_count(), 0);
    }

    #[test]
    fn test_marker_grid_layout() {
        let mut board = Board::new(3);
        board.mark(&Cell::new(0, 0));
        board.mark(&Cell::new(1, 2));

        let grid = board.marker_grid(Some(Cell::new(1, 2)));
        assert_eq!(grid, vec![vec![1, 0, 0], vec![0, 0, 2], vec![0, 0, 0]]);
    }
}
