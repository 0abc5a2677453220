// Tour state machine
//
//   EMPTY --place--> ACTIVE --move--> ACTIVE | WON | LOST
//
// A new game or reset replaces the whole TourState. The current position is
// always derived from the history tail and is never stored separately.

use derive_more::{Display, Error};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::clock::TourClock;
use crate::movegen::{is_knight_move, legal_moves};
use crate::types::{BoardConfig, Cell, TourType};

/// Lifecycle phase of a single tour
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
pub enum TourPhase {
    #[display("empty")]
    Empty,
    #[display("active")]
    Active,
    #[display("won")]
    Won,
    #[display("lost")]
    Lost,
}

impl TourPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TourPhase::Won | TourPhase::Lost)
    }
}

/// Rejected tour actions; state is never modified when one is returned
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TourError {
    #[display("cannot {action} while tour is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: TourPhase,
    },
    #[display("illegal knight move to {cell}")]
    IllegalMove { cell: Cell },
    #[display("cell {cell} is outside the {size}x{size} board")]
    OutOfBounds { cell: Cell, size: i32 },
    #[display("board size {size} is not supported")]
    InvalidBoardSize { size: i32 },
}

/// One visited cell in tour order; `move_number` is 1-based
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub cell: Cell,
    pub move_number: u32,
}

/// Final figures of a completed tour
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WinSummary {
    pub elapsed_ms: u64,
    pub move_count: u32,
    pub tour_type: TourType,
}

/// Result of an accepted placement or move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Continue,
    Won(WinSummary),
    Lost,
}

/// Complete state of one knight's tour
#[derive(Debug, Clone)]
pub struct TourState {
    config: BoardConfig,
    board: Board,
    history: Vec<HistoryEntry>,
    move_count: u32,
    phase: TourPhase,
    clock: TourClock,
}

impl TourState {
    /// Creates an EMPTY tour for the given configuration
    pub fn new(config: BoardConfig) -> Self {
        TourState {
            config,
            board: Board::new(config.size),
            history: Vec::with_capacity(config.total_cells()),
            move_count: 0,
            phase: TourPhase::Empty,
            clock: TourClock::new(),
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Number of accepted knight moves, including moves later undone
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn visited_count(&self) -> usize {
        self.board.visited_count()
    }

    pub fn current_position(&self) -> Option<Cell> {
        self.history.last().map(|entry| entry.cell)
    }

    pub fn start_cell(&self) -> Option<Cell> {
        self.history.first().map(|entry| entry.cell)
    }

    pub fn clock(&self) -> &TourClock {
        &self.clock
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    /// Legal destinations from the current position (empty before placement)
    pub fn possible_moves(&self) -> Vec<Cell> {
        match self.current_position() {
            Some(current) => legal_moves(&self.board, &current),
            None => Vec::new(),
        }
    }

    /// Places the knight on its starting cell
    pub fn place(&mut self, cell: Cell) -> Result<MoveOutcome, TourError> {
        if self.phase != TourPhase::Empty {
            return Err(self.invalid("place"));
        }
        if !self.board.contains(&cell) {
            return Err(TourError::OutOfBounds {
                cell,
                size: self.config.size,
            });
        }

        self.board.mark(&cell);
        self.history.push(HistoryEntry {
            cell,
            move_number: 1,
        });
        self.phase = TourPhase::Active;
        self.clock.start();
        debug!("Knight placed at {}", cell);

        // The 3x3 center has no knight moves at all
        Ok(self.evaluate_terminal())
    }

    /// Moves the knight to `cell`, which must be a legal knight move
    pub fn make_move(&mut self, cell: Cell) -> Result<MoveOutcome, TourError> {
        if self.phase != TourPhase::Active {
            return Err(self.invalid("move"));
        }
        if !self.board.contains(&cell) {
            return Err(TourError::OutOfBounds {
                cell,
                size: self.config.size,
            });
        }
        if !self.possible_moves().contains(&cell) {
            return Err(TourError::IllegalMove { cell });
        }

        self.board.mark(&cell);
        self.history.push(HistoryEntry {
            cell,
            move_number: self.history.len() as u32 + 1,
        });
        self.move_count += 1;
        debug!("Knight moved to {} (move {})", cell, self.move_count);

        Ok(self.evaluate_terminal())
    }

    /// Places the knight if none is on the board yet, otherwise moves it
    pub fn place_or_move(&mut self, cell: Cell) -> Result<MoveOutcome, TourError> {
        match self.phase {
            TourPhase::Empty => self.place(cell),
            TourPhase::Active => self.make_move(cell),
            TourPhase::Won | TourPhase::Lost => Err(self.invalid("move")),
        }
    }

    /// Takes back the last move, returning the cell that was vacated
    ///
    /// The initial placement can never be undone.
    pub fn undo(&mut self) -> Result<Cell, TourError> {
        if self.phase != TourPhase::Active || self.history.len() <= 1 {
            return Err(self.invalid("undo"));
        }

        let undone = match self.history.pop() {
            Some(entry) => entry,
            None => return Err(self.invalid("undo")),
        };
        self.board.unmark(&undone.cell);
        debug!("Undid move to {}", undone.cell);

        Ok(undone.cell)
    }

    /// Checks whether the tour is complete under its open/closed rules
    ///
    /// The closed-tour return test is a plain knight-adjacency check against
    /// the start cell; `legal_moves` would filter the start out as visited.
    pub fn check_win_condition(&self) -> bool {
        if !self.board.is_full() {
            return false;
        }

        match self.config.tour_type {
            TourType::Open => true,
            TourType::Closed => match (self.current_position(), self.start_cell()) {
                (Some(current), Some(start)) => is_knight_move(&current, &start),
                _ => false,
            },
        }
    }

    fn evaluate_terminal(&mut self) -> MoveOutcome {
        if self.check_win_condition() {
            self.phase = TourPhase::Won;
            self.clock.stop();
            return MoveOutcome::Won(WinSummary {
                elapsed_ms: self.clock.elapsed_ms(),
                move_count: self.move_count,
                tour_type: self.config.tour_type,
            });
        }

        if self.possible_moves().is_empty() {
            self.phase = TourPhase::Lost;
            self.clock.stop();
            return MoveOutcome::Lost;
        }

        MoveOutcome::Continue
    }

    fn invalid(&self, action: &'static str) -> TourError {
        TourError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(size: i32) -> TourState {
        TourState::new(BoardConfig::new(size, TourType::Open).unwrap())
    }

    fn assert_history_matches_visited(tour: &TourState) {
        assert_eq!(tour.history().len(), tour.visited_count());
        for entry in tour.history() {
            assert!(tour.board().is_visited(&entry.cell));
        }
        for (i, entry) in tour.history().iter().enumerate() {
            assert_eq!(entry.move_number as usize, i + 1);
        }
    }

    #[test]
    fn test_move_before_place_is_rejected() {
        let mut tour = open(5);
        let err = tour.make_move(Cell::new(1, 2)).unwrap_err();
        assert!(matches!(err, TourError::InvalidTransition { action: "move", .. }));
        assert_eq!(tour.phase(), TourPhase::Empty);
    }

    #[test]
    fn test_place_seeds_history() {
        let mut tour = open(5);
        assert_eq!(tour.place(Cell::new(0, 0)).unwrap(), MoveOutcome::Continue);
        assert_eq!(tour.phase(), TourPhase::Active);
        assert_eq!(tour.current_position(), Some(Cell::new(0, 0)));
        assert_eq!(tour.history()[0].move_number, 1);
        assert_eq!(tour.move_count(), 0);
        assert!(tour.clock().is_running());
    }

    #[test]
    fn test_second_place_is_rejected() {
        let mut tour = open(5);
        tour.place(Cell::new(0, 0)).unwrap();
        assert!(tour.place(Cell::new(2, 2)).is_err());
        assert_eq!(tour.history().len(), 1);
    }

    #[test]
    fn test_place_off_board_is_rejected() {
        let mut tour = open(5);
        let err = tour.place(Cell::new(5, 0)).unwrap_err();
        assert!(matches!(err, TourError::OutOfBounds { size: 5, .. }));
        assert_eq!(tour.phase(), TourPhase::Empty);
    }

    #[test]
    fn test_illegal_move_leaves_state_unchanged() {
        let mut tour = open(5);
        tour.place(Cell::new(0, 0)).unwrap();
        let err = tour.make_move(Cell::new(1, 1)).unwrap_err();
        assert_eq!(err, TourError::IllegalMove { cell: Cell::new(1, 1) });
        assert_eq!(tour.history().len(), 1);
        assert_eq!(tour.visited_count(), 1);
        assert_eq!(tour.move_count(), 0);
    }

    #[test]
    fn test_undo_restores_prior_state() {
        let mut tour = open(5);
        tour.place(Cell::new(0, 0)).unwrap();
        tour.make_move(Cell::new(2, 1)).unwrap();

        let history_before = tour.history().to_vec();
        let board_before = tour.board().clone();
        let position_before = tour.current_position();

        tour.make_move(Cell::new(4, 0)).unwrap();
        assert_eq!(tour.undo().unwrap(), Cell::new(4, 0));

        assert_eq!(tour.history(), history_before.as_slice());
        assert_eq!(tour.board(), &board_before);
        assert_eq!(tour.current_position(), position_before);
        assert_history_matches_visited(&tour);
    }

    #[test]
    fn test_undo_keeps_move_count() {
        let mut tour = open(5);
        tour.place(Cell::new(0, 0)).unwrap();
        tour.make_move(Cell::new(2, 1)).unwrap();
        tour.undo().unwrap();
        assert_eq!(tour.move_count(), 1);

        tour.make_move(Cell::new(1, 2)).unwrap();
        assert_eq!(tour.move_count(), 2);
        assert_eq!(tour.history()[1].move_number, 2);
    }

    #[test]
    fn test_cannot_undo_initial_placement() {
        let mut tour = open(5);
        assert!(tour.undo().is_err());
        tour.place(Cell::new(2, 2)).unwrap();
        assert!(tour.undo().is_err());
        assert_eq!(tour.current_position(), Some(Cell::new(2, 2)));
    }

    #[test]
    fn test_3x3_center_start_is_lost_immediately() {
        let mut tour = open(3);
        assert_eq!(tour.place(Cell::new(1, 1)).unwrap(), MoveOutcome::Lost);
        assert_eq!(tour.phase(), TourPhase::Lost);
        assert!(!tour.clock().is_running());
    }

    #[test]
    fn test_dead_end_is_lost_and_frozen() {
        // Walk the 8-cycle around the unreachable 3x3 center
        let mut tour = open(3);
        tour.place(Cell::new(0, 0)).unwrap();
        let ring = [
            Cell::new(1, 2),
            Cell::new(2, 0),
            Cell::new(0, 1),
            Cell::new(2, 2),
            Cell::new(1, 0),
            Cell::new(0, 2),
            Cell::new(2, 1),
        ];
        let mut last = MoveOutcome::Continue;
        for cell in ring {
            last = tour.make_move(cell).unwrap();
        }
        assert_eq!(last, MoveOutcome::Lost);
        assert_eq!(tour.visited_count(), 8);
        assert!(tour.undo().is_err(), "undo is only valid while active");
        assert!(tour.place_or_move(Cell::new(1, 1)).is_err());
    }
}
