// Game session: the presentation-facing façade over one tour at a time
//
// Owns the current TourState, the epoch counter used to discard stale advisor
// replies, the score ledger and the move journal. Every operation here is
// synchronous except `ai_hint`, which is split into prepare/accept so a
// caller holding a lock can release it while the oracle is consulted.

use chrono::Utc;
use log::{debug, error, info};
use serde::Serialize;

use crate::advisor;
use crate::clock::format_time;
use crate::config::{AdvisorConfig, BoardSettings, Config};
use crate::journal::{JournalAction, JournalEntry, MoveJournal};
use crate::ledger::{LeaderboardRow, ScoreLedger};
use crate::oracle::{AdvisorError, AdvisorTicket, MoveOracle, RelativeMove};
use crate::tour::{MoveOutcome, TourError, TourPhase, TourState};
use crate::types::{BoardConfig, Cell, TourType};

/// How a cell should be drawn
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Empty,
    Visited,
    Current,
    PossibleMove,
    Hinted,
    AiHinted,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub class: CellClass,
    /// Position in the tour for visited and current cells
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_number: Option<u32>,
}

/// End-of-tour payload; a loss carries nothing beyond the signal
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum TerminalPayload {
    Won {
        elapsed_ms: u64,
        elapsed: String,
        move_count: u32,
        tour_type: TourType,
    },
    Lost,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub epoch: u64,
    pub size: i32,
    pub tour_type: TourType,
    pub phase: TourPhase,
    pub cells: Vec<Vec<CellView>>,
    pub current: Option<Cell>,
    pub move_count: u32,
    pub visited_count: usize,
    pub total_cells: usize,
    pub elapsed: String,
    pub hint: Option<Cell>,
    pub ai_hint: Option<Cell>,
    pub ai_hint_available: bool,
    pub terminal: Option<TerminalPayload>,
}

pub struct GameSession {
    board_settings: BoardSettings,
    advisor: AdvisorConfig,
    tour: TourState,
    epoch: u64,
    ledger: ScoreLedger,
    journal: MoveJournal,
    hint: Option<Cell>,
    ai_hint: Option<Cell>,
}

impl GameSession {
    /// Creates a session on the configured default board
    pub fn new(config: &Config, ledger: ScoreLedger, journal: MoveJournal) -> Self {
        let board = config.board.default_config();
        GameSession {
            board_settings: config.board.clone(),
            advisor: config.advisor.clone(),
            tour: TourState::new(board),
            epoch: 0,
            ledger,
            journal,
            hint: None,
            ai_hint: None,
        }
    }

    pub fn tour(&self) -> &TourState {
        &self.tour
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// Starts a fresh tour with a new board configuration
    pub fn new_game(&mut self, board: BoardConfig) -> Result<(), TourError> {
        if !self.board_settings.allows(board.size) {
            debug!("Rejected new game with size {}", board.size);
            return Err(TourError::InvalidBoardSize { size: board.size });
        }

        self.start_tour(board);
        info!(
            "New game {}: {}x{} {} tour",
            self.epoch, board.size, board.size, board.tour_type
        );
        self.journal(JournalAction::NewGame, None);
        Ok(())
    }

    /// Starts a fresh tour on the current board configuration
    pub fn reset(&mut self) {
        let board = self.tour.config();
        self.start_tour(board);
        info!("Game reset (epoch {})", self.epoch);
        self.journal(JournalAction::Reset, None);
    }

    /// Places the knight or moves it, depending on the tour phase
    ///
    /// A win is recorded in the score ledger, which is saved immediately.
    pub fn place_or_move(&mut self, cell: Cell) -> Result<MoveOutcome, TourError> {
        let placing = self.tour.phase() == TourPhase::Empty;
        let outcome = self.tour.place_or_move(cell).map_err(|e| {
            debug!("Rejected action at {}: {}", cell, e);
            e
        })?;
        self.clear_hints();

        let action = if placing {
            JournalAction::Place
        } else {
            JournalAction::Move
        };
        self.journal(action, Some(cell));

        match &outcome {
            MoveOutcome::Won(summary) => {
                info!(
                    "Tour complete in {} with {} moves",
                    format_time(summary.elapsed_ms),
                    summary.move_count
                );
                let config = self.tour.config();
                self.ledger
                    .record(&config, summary.elapsed_ms, summary.move_count);
                if let Err(e) = self.ledger.save() {
                    error!("Failed to save score ledger: {}", e);
                }
            }
            MoveOutcome::Lost => {
                info!(
                    "Dead end at {} after {} of {} cells",
                    cell,
                    self.tour.visited_count(),
                    self.tour.config().total_cells()
                );
            }
            MoveOutcome::Continue => {}
        }

        Ok(outcome)
    }

    pub fn undo(&mut self) -> Result<Cell, TourError> {
        let undone = self.tour.undo()?;
        self.clear_hints();
        self.journal(JournalAction::Undo, Some(undone));
        Ok(undone)
    }

    /// Highlights and returns the Warnsdorff suggestion for the next move
    pub fn hint(&mut self) -> Option<Cell> {
        self.hint = advisor::hint(&self.tour);
        if let Some(cell) = self.hint {
            self.journal(JournalAction::Hint, Some(cell));
        }
        self.hint
    }

    /// Whether the advisor oracle can be asked about the current tour
    pub fn ai_hint_available(&self) -> bool {
        self.advisor.enabled
            && self.tour.config().size == self.advisor.supported_size
            && self.tour.phase() == TourPhase::Active
    }

    /// Captures the state the oracle needs, tagged with the current epoch
    pub fn prepare_ai_hint(&self) -> Result<AdvisorTicket, AdvisorError> {
        let config = self.tour.config();
        if config.size != self.advisor.supported_size {
            return Err(AdvisorError::UnsupportedBoard {
                size: config.size,
                supported: self.advisor.supported_size,
            });
        }
        if self.tour.phase() != TourPhase::Active {
            return Err(AdvisorError::NoPosition);
        }
        let origin = self.tour.current_position().ok_or(AdvisorError::NoPosition)?;

        Ok(AdvisorTicket {
            epoch: self.epoch,
            config,
            origin,
            grid: self.tour.board().marker_grid(Some(origin)),
        })
    }

    /// Applies an oracle reply if the game it was asked about is still current
    pub fn accept_ai_hint(
        &mut self,
        ticket: &AdvisorTicket,
        reply: RelativeMove,
    ) -> Result<Cell, AdvisorError> {
        if ticket.epoch != self.epoch
            || ticket.config != self.tour.config()
            || Some(ticket.origin) != self.tour.current_position()
        {
            debug!(
                "Discarding advisor reply for epoch {} (current {})",
                ticket.epoch, self.epoch
            );
            return Err(AdvisorError::Stale);
        }

        let cell = match ticket.origin.checked_offset(reply.d_row, reply.d_col) {
            Some(cell) if self.tour.board().contains(&cell) => cell,
            Some(cell) => return Err(AdvisorError::OffBoard { cell }),
            None => {
                debug!("Advisor offset {:?} overflows from {}", reply, ticket.origin);
                return Err(AdvisorError::OffBoard {
                    cell: Cell::new(
                        ticket.origin.row.saturating_add(reply.d_row),
                        ticket.origin.col.saturating_add(reply.d_col),
                    ),
                });
            }
        };

        self.ai_hint = Some(cell);
        self.journal(JournalAction::AiHint, Some(cell));
        Ok(cell)
    }

    /// Asks the oracle for a hint while holding the session exclusively
    pub async fn ai_hint(&mut self, oracle: &dyn MoveOracle) -> Result<Cell, AdvisorError> {
        let ticket = self.prepare_ai_hint()?;
        let reply = oracle.predict(&ticket.grid).await?;
        self.accept_ai_hint(&ticket, reply)
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        self.ledger.best_per_config()
    }

    /// Builds the current board view
    pub fn view(&self) -> BoardView {
        let config = self.tour.config();
        let current = self.tour.current_position();
        let possible = self.tour.possible_moves();
        let board = self.tour.board();

        let size = config.size as usize;
        let mut move_numbers = vec![vec![None; size]; size];
        for entry in self.tour.history() {
            move_numbers[entry.cell.row as usize][entry.cell.col as usize] =
                Some(entry.move_number);
        }

        let cells = (0..config.size)
            .map(|row| {
                (0..config.size)
                    .map(|col| {
                        let cell = Cell::new(row, col);
                        let class = if Some(cell) == current {
                            CellClass::Current
                        } else if board.is_visited(&cell) {
                            CellClass::Visited
                        } else if Some(cell) == self.ai_hint {
                            CellClass::AiHinted
                        } else if Some(cell) == self.hint {
                            CellClass::Hinted
                        } else if possible.contains(&cell) {
                            CellClass::PossibleMove
                        } else {
                            CellClass::Empty
                        };
                        CellView {
                            class,
                            move_number: move_numbers[row as usize][col as usize],
                        }
                    })
                    .collect()
            })
            .collect();

        let terminal = match self.tour.phase() {
            TourPhase::Won => Some(TerminalPayload::Won {
                elapsed_ms: self.tour.elapsed_ms(),
                elapsed: format_time(self.tour.elapsed_ms()),
                move_count: self.tour.move_count(),
                tour_type: config.tour_type,
            }),
            TourPhase::Lost => Some(TerminalPayload::Lost),
            TourPhase::Empty | TourPhase::Active => None,
        };

        BoardView {
            epoch: self.epoch,
            size: config.size,
            tour_type: config.tour_type,
            phase: self.tour.phase(),
            cells,
            current,
            move_count: self.tour.move_count(),
            visited_count: self.tour.visited_count(),
            total_cells: config.total_cells(),
            elapsed: format_time(self.tour.elapsed_ms()),
            hint: self.hint,
            ai_hint: self.ai_hint,
            ai_hint_available: self.ai_hint_available(),
            terminal,
        }
    }

    fn start_tour(&mut self, board: BoardConfig) {
        self.tour = TourState::new(board);
        self.epoch += 1;
        self.clear_hints();
    }

    fn clear_hints(&mut self) {
        self.hint = None;
        self.ai_hint = None;
    }

    fn journal(&self, action: JournalAction, cell: Option<Cell>) {
        if !self.journal.is_enabled() {
            return;
        }
        let config = self.tour.config();
        self.journal.record(JournalEntry {
            epoch: self.epoch,
            action,
            size: config.size,
            tour_type: config.tour_type,
            cell,
            move_count: self.tour.move_count(),
            visited_count: self.tour.visited_count(),
            timestamp: Utc::now().to_rfc3339(),
        });
    }
}
