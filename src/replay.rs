// Replay module for analyzing move journals
//
// This module provides functionality to:
// 1. Parse JSONL move journals
// 2. Re-run every recorded tour through the tour engine
// 3. Compare each recorded move with the Warnsdorff hint at that moment
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::advisor::{self, PlayOut};
use crate::config::Config;
use crate::journal::{JournalAction, JournalEntry};
use crate::tour::{TourPhase, TourState};
use crate::types::{BoardConfig, Cell};

/// Result of replaying a single journaled action
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub step: usize,
    pub action: JournalAction,
    pub cell: Option<Cell>,
    pub accepted: bool,
    /// Warnsdorff suggestion just before the action (moves only)
    pub hint: Option<Cell>,
    pub followed_hint: bool,
    pub error: Option<String>,
}

/// Replay of one tour (one journal epoch)
#[derive(Debug, Clone)]
pub struct TourReplay {
    pub epoch: u64,
    pub config: BoardConfig,
    pub results: Vec<ReplayResult>,
    pub final_phase: TourPhase,
    pub visited_count: usize,
    pub move_count: u32,
    /// Where Warnsdorff would have taken a tour the player left unfinished
    pub projection: Option<PlayOut>,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub tours: usize,
    pub won: usize,
    pub lost: usize,
    pub total_moves: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub hint_matches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing move journals
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all entries from a JSONL journal
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<JournalEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open journal file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: JournalEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} journal entries", entries.len());
        Ok(entries)
    }

    /// Groups entries into tours by epoch, preserving journal order
    pub fn split_tours(entries: &[JournalEntry]) -> Vec<Vec<JournalEntry>> {
        let mut tours: Vec<Vec<JournalEntry>> = Vec::new();

        for entry in entries {
            match tours.last_mut() {
                Some(tour) if tour[0].epoch == entry.epoch => tour.push(entry.clone()),
                _ => tours.push(vec![entry.clone()]),
            }
        }

        tours
    }

    /// Re-runs one tour's actions through a fresh TourState
    pub fn replay_tour(&self, entries: &[JournalEntry]) -> Result<TourReplay, String> {
        let first = entries.first().ok_or("Cannot replay an empty tour")?;
        let config = BoardConfig::new(first.size, first.tour_type).map_err(|e| e.to_string())?;
        if !self.config.board.allows(config.size) {
            warn!(
                "Epoch {} uses a {}x{} board outside the configured range {}..={}",
                first.epoch,
                config.size,
                config.size,
                self.config.board.min_size,
                self.config.board.max_size
            );
        }
        let mut tour = TourState::new(config);
        let mut results = Vec::new();

        for (step, entry) in entries.iter().enumerate() {
            if entry.epoch != first.epoch {
                return Err(format!(
                    "Entry {} belongs to epoch {}, expected {}",
                    step, entry.epoch, first.epoch
                ));
            }

            let result = match entry.action {
                JournalAction::Place | JournalAction::Move => {
                    let cell = entry
                        .cell
                        .ok_or_else(|| format!("Step {} has no cell", step))?;
                    let hint = if entry.action == JournalAction::Move {
                        advisor::hint(&tour)
                    } else {
                        None
                    };
                    let outcome = tour.place_or_move(cell);
                    ReplayResult {
                        step,
                        action: entry.action,
                        cell: Some(cell),
                        accepted: outcome.is_ok(),
                        hint,
                        followed_hint: outcome.is_ok() && hint == Some(cell),
                        error: outcome.err().map(|e| e.to_string()),
                    }
                }
                JournalAction::Undo => {
                    let outcome = tour.undo();
                    let error = match &outcome {
                        Ok(undone) if entry.cell.is_some() && entry.cell != Some(*undone) => {
                            Some(format!("Undo vacated {} but journal says {:?}", undone, entry.cell))
                        }
                        Ok(_) => None,
                        Err(e) => Some(e.to_string()),
                    };
                    ReplayResult {
                        step,
                        action: entry.action,
                        cell: entry.cell,
                        accepted: error.is_none(),
                        hint: None,
                        followed_hint: false,
                        error,
                    }
                }
                // Game boundaries and hint requests do not change the tour
                JournalAction::NewGame
                | JournalAction::Reset
                | JournalAction::Hint
                | JournalAction::AiHint => continue,
            };

            if self.verbose {
                Self::log_result(first.epoch, &result);
            }
            results.push(result);
        }

        let projection = if tour.phase() == TourPhase::Active {
            Some(advisor::play_out(&tour))
        } else {
            None
        };

        Ok(TourReplay {
            epoch: first.epoch,
            config,
            results,
            projection,
            final_phase: tour.phase(),
            visited_count: tour.visited_count(),
            move_count: tour.move_count(),
        })
    }

    /// Replays every tour in the journal
    pub fn replay_all(&self, entries: &[JournalEntry]) -> Result<Vec<TourReplay>, String> {
        let mut replays = Vec::new();

        for tour in Self::split_tours(entries) {
            match self.replay_tour(&tour) {
                Ok(replay) => replays.push(replay),
                Err(e) => warn!("Failed to replay epoch {}: {}", tour[0].epoch, e),
            }
        }

        Ok(replays)
    }

    /// Replays only the tours with the given epochs
    pub fn replay_epochs(
        &self,
        entries: &[JournalEntry],
        epochs: &[u64],
    ) -> Result<Vec<TourReplay>, String> {
        let tours = Self::split_tours(entries);
        let mut replays = Vec::new();

        for epoch in epochs {
            let tour = tours
                .iter()
                .find(|t| t[0].epoch == *epoch)
                .ok_or_else(|| format!("Epoch {} not found in journal", epoch))?;
            replays.push(self.replay_tour(tour)?);
        }

        Ok(replays)
    }

    /// Generates statistics from replayed tours
    pub fn generate_stats(&self, replays: &[TourReplay]) -> ReplayStats {
        let moves: Vec<&ReplayResult> = replays
            .iter()
            .flat_map(|r| r.results.iter())
            .filter(|r| r.action == JournalAction::Move)
            .collect();

        let accepted = moves.iter().filter(|r| r.accepted).count();
        let hint_matches = moves.iter().filter(|r| r.followed_hint).count();
        let match_rate = if accepted > 0 {
            (hint_matches as f64 / accepted as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            tours: replays.len(),
            won: replays.iter().filter(|r| r.final_phase == TourPhase::Won).count(),
            lost: replays.iter().filter(|r| r.final_phase == TourPhase::Lost).count(),
            total_moves: moves.len(),
            accepted,
            rejected: moves.len() - accepted,
            hint_matches,
            match_rate,
        }
    }

    /// Prints a detailed report of replayed tours
    pub fn print_report(&self, replays: &[TourReplay]) {
        let stats = self.generate_stats(replays);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Tours:          {} ({} won, {} lost)", stats.tours, stats.won, stats.lost);
        println!("Moves:          {}", stats.total_moves);
        println!("Rejected:       {}", stats.rejected);
        println!(
            "Followed hint:  {} ({:.1}%)",
            stats.hint_matches, stats.match_rate
        );
        println!("═══════════════════════════════════════════════════════════\n");

        for replay in replays {
            println!(
                "Epoch {}: {}x{} {} -> {} ({}/{} cells, {} moves)",
                replay.epoch,
                replay.config.size,
                replay.config.size,
                replay.config.tour_type,
                replay.final_phase,
                replay.visited_count,
                replay.config.total_cells(),
                replay.move_count
            );
            if let Some(projection) = &replay.projection {
                println!(
                    "  Warnsdorff from the last position: {} after {} more move(s)",
                    projection.phase,
                    projection.path.len()
                );
            }
            for result in replay.results.iter().filter(|r| !r.accepted) {
                println!(
                    "  step {}: {:?} {:?} rejected: {}",
                    result.step,
                    result.action,
                    result.cell,
                    result.error.as_deref().unwrap_or("unknown")
                );
            }
        }
        println!();
    }

    fn log_result(epoch: u64, result: &ReplayResult) {
        if !result.accepted {
            warn!(
                "Epoch {} step {}: ✗ {:?} {:?} rejected: {}",
                epoch,
                result.step,
                result.action,
                result.cell,
                result.error.as_deref().unwrap_or("unknown")
            );
        } else if result.followed_hint {
            info!(
                "Epoch {} step {}: ✓ {:?} {:?} (followed hint)",
                epoch, result.step, result.action, result.cell
            );
        } else {
            info!(
                "Epoch {} step {}: ✓ {:?} {:?} (hint was {:?})",
                epoch, result.step, result.action, result.cell, result.hint
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TourType;

    fn entry(epoch: u64, action: JournalAction, cell: Option<(i32, i32)>) -> JournalEntry {
        JournalEntry {
            epoch,
            action,
            size: 5,
            tour_type: TourType::Open,
            cell: cell.map(|(r, c)| Cell::new(r, c)),
            move_count: 0,
            visited_count: 0,
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_split_tours_by_epoch() {
        let entries = vec![
            entry(1, JournalAction::NewGame, None),
            entry(1, JournalAction::Place, Some((0, 0))),
            entry(2, JournalAction::Reset, None),
            entry(2, JournalAction::Place, Some((2, 2))),
        ];
        let tours = ReplayEngine::split_tours(&entries);
        assert_eq!(tours.len(), 2);
        assert_eq!(tours[1][1].cell, Some(Cell::new(2, 2)));
    }

    #[test]
    fn test_replay_flags_illegal_move() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![
            entry(1, JournalAction::NewGame, None),
            entry(1, JournalAction::Place, Some((0, 0))),
            entry(1, JournalAction::Move, Some((1, 1))),
            entry(1, JournalAction::Move, Some((1, 2))),
        ];
        let replay = engine.replay_tour(&entries).unwrap();
        assert_eq!(replay.results.len(), 3);
        assert!(!replay.results[1].accepted);
        assert!(replay.results[2].accepted);
        assert!(replay.results[2].followed_hint);
        assert_eq!(replay.final_phase, TourPhase::Active);
        let projection = replay.projection.unwrap();
        assert!(projection.phase.is_terminal());
        assert_eq!(projection.visited, 2 + projection.path.len());
    }

    #[test]
    fn test_replay_undo_checks_vacated_cell() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![
            entry(1, JournalAction::Place, Some((0, 0))),
            entry(1, JournalAction::Move, Some((2, 1))),
            entry(1, JournalAction::Undo, Some((1, 2))),
        ];
        let replay = engine.replay_tour(&entries).unwrap();
        assert!(!replay.results[2].accepted);
        // The undo still happened in the engine
        assert_eq!(replay.visited_count, 1);
    }

    #[test]
    fn test_stats_count_only_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![
            entry(1, JournalAction::Place, Some((0, 0))),
            entry(1, JournalAction::Move, Some((1, 2))),
            entry(1, JournalAction::Move, Some((0, 4))),
        ];
        let replays = engine.replay_all(&entries).unwrap();
        let stats = engine.generate_stats(&replays);
        assert_eq!(stats.tours, 1);
        assert_eq!(stats.total_moves, 2);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.hint_matches, 2);
        assert_eq!(stats.match_rate, 100.0);
    }
}
