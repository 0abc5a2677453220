// Advisor bridge tests with in-process oracles
//
// Covers the marker grid sent to the oracle, relative-offset resolution,
// unavailable and off-board replies, and stale-reply rejection.

use async_trait::async_trait;
use parking_lot::Mutex;

use knight_tour::config::Config;
use knight_tour::journal::MoveJournal;
use knight_tour::ledger::ScoreLedger;
use knight_tour::oracle::{AdvisorError, DisabledOracle, HttpOracle, MoveOracle, RelativeMove};
use knight_tour::session::{CellClass, GameSession};
use knight_tour::tour::TourPhase;
use knight_tour::types::{BoardConfig, Cell, TourType};

/// Oracle that always answers with the same offset and remembers what it was shown
struct FixedOracle {
    reply: RelativeMove,
    seen: Mutex<Vec<Vec<Vec<u8>>>>,
}

impl FixedOracle {
    fn new(d_row: i32, d_col: i32) -> Self {
        FixedOracle {
            reply: RelativeMove { d_row, d_col },
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MoveOracle for FixedOracle {
    async fn predict(&self, grid: &[Vec<u8>]) -> Result<RelativeMove, AdvisorError> {
        self.seen.lock().push(grid.to_vec());
        Ok(self.reply)
    }
}

fn session_5x5(start: Option<Cell>) -> GameSession {
    let mut session = GameSession::new(
        &Config::default_hardcoded(),
        ScoreLedger::in_memory(5),
        MoveJournal::disabled(),
    );
    session
        .new_game(BoardConfig::new(5, TourType::Open).unwrap())
        .unwrap();
    if let Some(cell) = start {
        session.place_or_move(cell).unwrap();
    }
    session
}

#[tokio::test]
async fn test_ai_hint_resolves_relative_offset() {
    let mut session = session_5x5(Some(Cell::new(0, 0)));
    session.place_or_move(Cell::new(1, 2)).unwrap();
    let oracle = FixedOracle::new(2, 1);

    let cell = session.ai_hint(&oracle).await.unwrap();
    assert_eq!(cell, Cell::new(3, 3));

    let seen = oracle.seen.lock();
    let grid = &seen[0];
    assert_eq!(grid.len(), 5);
    assert_eq!(grid[0][0], 1);
    assert_eq!(grid[1][2], 2);
    assert_eq!(grid.iter().flatten().filter(|&&m| m == 0).count(), 23);

    let view = session.view();
    assert_eq!(view.ai_hint, Some(Cell::new(3, 3)));
    assert_eq!(view.cells[3][3].class, CellClass::AiHinted);
}

#[tokio::test]
async fn test_ai_hint_off_board_is_rejected() {
    let mut session = session_5x5(Some(Cell::new(0, 0)));
    let err = session.ai_hint(&FixedOracle::new(-2, -1)).await.unwrap_err();
    assert_eq!(
        err,
        AdvisorError::OffBoard {
            cell: Cell::new(-2, -1)
        }
    );
    assert_eq!(session.view().ai_hint, None);
}

#[tokio::test]
async fn test_ai_hint_overflowing_offset_is_off_board() {
    let mut session = session_5x5(Some(Cell::new(2, 2)));

    let err = session.ai_hint(&FixedOracle::new(i32::MAX, 0)).await.unwrap_err();
    assert_eq!(
        err,
        AdvisorError::OffBoard {
            cell: Cell::new(i32::MAX, 2)
        }
    );

    let err = session.ai_hint(&FixedOracle::new(0, i32::MIN)).await.unwrap_err();
    assert!(matches!(err, AdvisorError::OffBoard { .. }));

    // The tour is untouched and still answers well-formed replies
    assert_eq!(session.tour().phase(), TourPhase::Active);
    assert_eq!(session.view().ai_hint, None);
    assert_eq!(session.ai_hint(&FixedOracle::new(-2, 1)).await, Ok(Cell::new(0, 3)));
}

#[tokio::test]
async fn test_unavailable_oracle_leaves_state_unchanged() {
    let mut session = session_5x5(Some(Cell::new(0, 0)));
    let before = session.view();

    let err = session.ai_hint(&DisabledOracle).await.unwrap_err();
    assert!(matches!(err, AdvisorError::Unavailable { .. }));

    let mut config = Config::default_hardcoded().advisor;
    config.endpoint = "http://127.0.0.1:9/predict".to_string();
    config.timeout_ms = 500;
    let http = HttpOracle::new(&config).unwrap();
    let err = session.ai_hint(&http).await.unwrap_err();
    assert!(matches!(err, AdvisorError::Unavailable { .. }));

    let after = session.view();
    assert_eq!(after.cells, before.cells);
    assert_eq!(after.current, before.current);
    assert_eq!(after.ai_hint, None);
    assert_eq!(after.visited_count, before.visited_count);
    assert_eq!(session.tour().phase(), TourPhase::Active);
}

#[tokio::test]
async fn test_unsupported_board_and_missing_knight() {
    let mut session = GameSession::new(
        &Config::default_hardcoded(),
        ScoreLedger::in_memory(5),
        MoveJournal::disabled(),
    );
    let oracle = FixedOracle::new(1, 2);

    assert!(matches!(
        session.ai_hint(&oracle).await,
        Err(AdvisorError::UnsupportedBoard { size: 8, supported: 5 })
    ));
    assert!(!session.view().ai_hint_available);

    let mut session = session_5x5(None);
    assert_eq!(session.ai_hint(&oracle).await, Err(AdvisorError::NoPosition));
    assert!(oracle.seen.lock().is_empty());
}

#[test]
fn test_reply_after_reset_is_stale() {
    let mut session = session_5x5(Some(Cell::new(0, 0)));
    let ticket = session.prepare_ai_hint().unwrap();

    session.reset();
    session.place_or_move(Cell::new(0, 0)).unwrap();

    let reply = RelativeMove { d_row: 1, d_col: 2 };
    assert_eq!(session.accept_ai_hint(&ticket, reply), Err(AdvisorError::Stale));
    assert_eq!(session.view().ai_hint, None);
}

#[test]
fn test_reply_after_move_is_stale() {
    let mut session = session_5x5(Some(Cell::new(0, 0)));
    let ticket = session.prepare_ai_hint().unwrap();

    session.place_or_move(Cell::new(2, 1)).unwrap();

    let reply = RelativeMove { d_row: 1, d_col: 2 };
    assert_eq!(session.accept_ai_hint(&ticket, reply), Err(AdvisorError::Stale));
}

#[test]
fn test_fresh_ticket_is_accepted() {
    let mut session = session_5x5(Some(Cell::new(0, 0)));
    let ticket = session.prepare_ai_hint().unwrap();
    assert_eq!(ticket.epoch, session.epoch());
    assert_eq!(ticket.origin, Cell::new(0, 0));

    let reply = RelativeMove { d_row: 2, d_col: 1 };
    assert_eq!(session.accept_ai_hint(&ticket, reply), Ok(Cell::new(2, 1)));
}
