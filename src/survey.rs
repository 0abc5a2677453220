// Warnsdorff survey
//
// Plays greedy Warnsdorff tours from many starting cells at once and reports
// how often the heuristic alone completes the board.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

use crate::advisor;
use crate::tour::{TourPhase, TourState};
use crate::types::{BoardConfig, Cell};

/// Outcome of one play-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartResult {
    pub start: Cell,
    pub phase: TourPhase,
    pub visited: usize,
}

#[derive(Debug, Clone)]
pub struct SurveyReport {
    pub config: BoardConfig,
    pub results: Vec<StartResult>,
    pub completion_rate: f64,
    pub elapsed_ms: u128,
}

impl SurveyReport {
    pub fn completed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.phase == TourPhase::Won)
            .count()
    }

    pub fn print_report(&self) {
        println!("\n═══════════════════════════════════════════════════════════");
        println!(
            "         WARNSDORFF SURVEY: {}x{} {}",
            self.config.size, self.config.size, self.config.tour_type
        );
        println!("═══════════════════════════════════════════════════════════");
        println!("Starts:      {}", self.results.len());
        println!("Completed:   {} ({:.1}%)", self.completed(), self.completion_rate);
        println!("Elapsed:     {}ms", self.elapsed_ms);
        println!("═══════════════════════════════════════════════════════════\n");

        for result in &self.results {
            let mark = if result.phase == TourPhase::Won { "✓" } else { "✗" };
            println!(
                "  {} start {} -> {} ({}/{})",
                mark,
                result.start,
                result.phase,
                result.visited,
                self.config.total_cells()
            );
        }
        println!();
    }
}

/// Every cell of the board in row-major order
pub fn all_starts(size: i32) -> Vec<Cell> {
    (0..size)
        .flat_map(|row| (0..size).map(move |col| Cell::new(row, col)))
        .collect()
}

/// `n` distinct cells chosen with a seeded RNG; all cells when `n` covers the board
pub fn sample_starts(size: i32, n: usize, seed: u64) -> Vec<Cell> {
    let mut cells = all_starts(size);
    let mut rng = StdRng::seed_from_u64(seed);
    cells.shuffle(&mut rng);
    cells.truncate(n);
    cells
}

/// Places the knight on `start` and follows hints until the tour ends
pub fn survey_start(config: BoardConfig, start: Cell) -> StartResult {
    let mut tour = TourState::new(config);
    if let Err(e) = tour.place(start) {
        debug!("Skipping start {}: {}", start, e);
        return StartResult {
            start,
            phase: tour.phase(),
            visited: 0,
        };
    }

    let outcome = advisor::play_out(&tour);
    StartResult {
        start,
        phase: outcome.phase,
        visited: outcome.visited,
    }
}

/// Runs a play-out per start on the rayon pool; results keep the order of `starts`
pub fn survey(config: BoardConfig, starts: &[Cell]) -> SurveyReport {
    let started = Instant::now();

    let results: Vec<StartResult> = starts
        .par_iter()
        .map(|start| survey_start(config, *start))
        .collect();

    let completed = results
        .iter()
        .filter(|r| r.phase == TourPhase::Won)
        .count();
    let completion_rate = if results.is_empty() {
        0.0
    } else {
        (completed as f64 / results.len() as f64) * 100.0
    };
    let elapsed_ms = started.elapsed().as_millis();

    info!(
        "Survey {}x{} {}: {}/{} starts completed in {}ms",
        config.size,
        config.size,
        config.tour_type,
        completed,
        results.len(),
        elapsed_ms
    );

    SurveyReport {
        config,
        results,
        completion_rate,
        elapsed_ms,
    }
}
