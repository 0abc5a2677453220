// Knight move generation
//
// Pure functions over a board: no function here mutates state.

use crate::board::Board;
use crate::types::{Cell, KnightOffset};

/// Generates all legal knight moves from `cell`
/// A move is legal if it:
/// - Lands on the board
/// - Lands on a cell not yet visited
///
/// Output follows the canonical offset order, so hints derived from it are
/// reproducible. An empty result means the knight is at a dead end.
pub fn legal_moves(board: &Board, cell: &Cell) -> Vec<Cell> {
    KnightOffset::all()
        .iter()
        .map(|offset| offset.apply(cell))
        .filter(|next| board.contains(next) && !board.is_visited(next))
        .collect()
}

/// Counts legal moves without allocating
pub fn count_legal_moves(board: &Board, cell: &Cell) -> usize {
    KnightOffset::all()
        .iter()
        .map(|offset| offset.apply(cell))
        .filter(|next| board.contains(next) && !board.is_visited(next))
        .count()
}

/// Checks whether `to` is exactly one knight jump from `from`, regardless of
/// visited status
pub fn is_knight_move(from: &Cell, to: &Cell) -> bool {
    KnightOffset::all()
        .iter()
        .any(|offset| offset.apply(from) == *to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_has_two_moves_in_canonical_order() {
        let board = Board::new(5);
        let moves = legal_moves(&board, &Cell::new(0, 0));
        assert_eq!(moves, vec![Cell::new(1, 2), Cell::new(2, 1)]);
    }

    #[test]
    fn test_center_of_5x5_has_eight_moves() {
        let board = Board::new(5);
        assert_eq!(legal_moves(&board, &Cell::new(2, 2)).len(), 8);
        assert_eq!(count_legal_moves(&board, &Cell::new(2, 2)), 8);
    }

    #[test]
    fn test_visited_cells_are_excluded() {
        let mut board = Board::new(5);
        board.mark(&Cell::new(1, 2));
        let moves = legal_moves(&board, &Cell::new(0, 0));
        assert_eq!(moves, vec![Cell::new(2, 1)]);
    }

    #[test]
    fn test_center_of_3x3_is_dead_end() {
        let board = Board::new(3);
        assert!(legal_moves(&board, &Cell::new(1, 1)).is_empty());
    }

    #[test]
    fn test_legal_moves_stay_in_bounds_and_unvisited() {
        for size in 3..=8 {
            let mut board = Board::new(size);
            // Visit a diagonal so the filter has something to exclude
            for i in 0..size {
                board.mark(&Cell::new(i, i));
            }
            for row in 0..size {
                for col in 0..size {
                    for next in legal_moves(&board, &Cell::new(row, col)) {
                        assert!(board.is_valid(next.row, next.col));
                        assert!(!board.is_visited(&next));
                    }
                }
            }
        }
    }

    #[test]
    fn test_is_knight_move_ignores_visited() {
        assert!(is_knight_move(&Cell::new(0, 0), &Cell::new(2, 1)));
        assert!(is_knight_move(&Cell::new(2, 1), &Cell::new(0, 0)));
        assert!(!is_knight_move(&Cell::new(0, 0), &Cell::new(1, 1)));
        assert!(!is_knight_move(&Cell::new(0, 0), &Cell::new(0, 0)));
    }
}
