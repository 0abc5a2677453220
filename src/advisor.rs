// Heuristic advisor: Warnsdorff's rule
//
// Prefers the candidate with the fewest onward moves. Looks exactly one ply
// ahead; it is a hint, not a guarantee that the tour can still be completed.

use log::debug;

use crate::board::Board;
use crate::movegen::count_legal_moves;
use crate::tour::{TourPhase, TourState};
use crate::types::Cell;

/// Picks the candidate with the strictly smallest onward-move count
///
/// Each candidate is scored on a scratch board where it is already visited.
/// Ties go to the first candidate seen, so a deterministic candidate order
/// gives a deterministic hint.
pub fn best_move(board: &Board, candidates: &[Cell]) -> Option<Cell> {
    let mut scratch = board.clone();
    let mut best: Option<(Cell, usize)> = None;

    for candidate in candidates {
        let newly_marked = scratch.mark(candidate);
        let onward = count_legal_moves(&scratch, candidate);
        if newly_marked {
            scratch.unmark(candidate);
        }

        match best {
            Some((_, min)) if onward >= min => {}
            _ => best = Some((*candidate, onward)),
        }
    }

    best.map(|(cell, onward)| {
        debug!("Warnsdorff pick {} with {} onward moves", cell, onward);
        cell
    })
}

/// Suggests the next move for an ACTIVE tour
pub fn hint(tour: &TourState) -> Option<Cell> {
    if tour.phase() != TourPhase::Active {
        return None;
    }
    best_move(tour.board(), &tour.possible_moves())
}

/// Result of following hints until the tour ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOut {
    pub path: Vec<Cell>,
    pub phase: TourPhase,
    pub visited: usize,
}

/// Plays the tour forward on a copy, always taking the Warnsdorff hint
///
/// `path` holds only the cells added by the play-out.
pub fn play_out(tour: &TourState) -> PlayOut {
    let mut scratch = tour.clone();
    let mut path = Vec::new();

    while let Some(next) = hint(&scratch) {
        if scratch.make_move(next).is_err() {
            break;
        }
        path.push(next);
    }

    PlayOut {
        path,
        phase: scratch.phase(),
        visited: scratch.visited_count(),
    }
}
