// Score ledger: best completed tours per board configuration
//
// Persisted as a JSON object keyed by "{size}x{size}_{tour_type}", each value a
// list of at most `max_entries` scores sorted by (time, moves).

use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::format_time;
use crate::types::{BoardConfig, TourType};

/// Default number of scores kept per board configuration
pub const DEFAULT_MAX_ENTRIES: usize = 5;

/// A single completed tour
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Elapsed time in milliseconds
    pub time: u64,
    pub moves: u32,
    /// ISO-8601 completion timestamp
    pub date: String,
    #[serde(rename = "timeString")]
    pub time_string: String,
}

/// One row of the rendered leaderboard
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub config: BoardConfig,
    pub best: ScoreEntry,
}

/// Builds the persisted key for a configuration, e.g. `5x5_open`
pub fn ledger_key(config: &BoardConfig) -> String {
    format!("{}x{}_{}", config.size, config.size, config.tour_type.as_str())
}

/// Parses a persisted key back into a configuration
pub fn parse_ledger_key(key: &str) -> Result<BoardConfig, String> {
    let (dims, tour_type) = key
        .split_once('_')
        .ok_or_else(|| format!("Invalid ledger key: {}", key))?;
    let (rows, cols) = dims
        .split_once('x')
        .ok_or_else(|| format!("Invalid ledger key: {}", key))?;

    let size = rows
        .parse::<i32>()
        .map_err(|e| format!("Invalid size in ledger key '{}': {}", key, e))?;
    if cols != rows {
        return Err(format!("Non-square board in ledger key: {}", key));
    }
    let tour_type = tour_type.parse::<TourType>()?;

    BoardConfig::new(size, tour_type).map_err(|e| e.to_string())
}

#[derive(Debug, Clone)]
pub struct ScoreLedger {
    path: Option<PathBuf>,
    max_entries: usize,
    scores: BTreeMap<String, Vec<ScoreEntry>>,
}

impl ScoreLedger {
    /// Creates an empty ledger that is never written to disk
    pub fn in_memory(max_entries: usize) -> Self {
        ScoreLedger {
            path: None,
            max_entries,
            scores: BTreeMap::new(),
        }
    }

    /// Loads a ledger from a JSON file; a missing file yields an empty ledger
    pub fn load<P: AsRef<Path>>(path: P, max_entries: usize) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();
        let scores = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read ledger file: {}", e))?;
            serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse ledger file: {}", e))?
        } else {
            BTreeMap::new()
        };

        let mut ledger = ScoreLedger {
            path: Some(path),
            max_entries,
            scores,
        };
        ledger.normalize();
        info!("Loaded score ledger with {} configurations", ledger.scores.len());
        Ok(ledger)
    }

    /// Attempts to load from file, starting empty on error
    pub fn load_or_default<P: AsRef<Path>>(path: P, max_entries: usize) -> Self {
        let path = path.as_ref();
        Self::load(path, max_entries).unwrap_or_else(|e| {
            warn!("Could not load score ledger ({}), starting empty", e);
            ScoreLedger {
                path: Some(path.to_path_buf()),
                max_entries,
                scores: BTreeMap::new(),
            }
        })
    }

    /// Writes the ledger to its file; in-memory ledgers are a no-op
    pub fn save(&self) -> Result<(), String> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };
        let json = serde_json::to_string_pretty(&self.scores)
            .map_err(|e| format!("Failed to serialize ledger: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write ledger file: {}", e))
    }

    /// Records a completed tour stamped with the current time
    pub fn record(&mut self, config: &BoardConfig, elapsed_ms: u64, moves: u32) -> &ScoreEntry {
        self.record_at(config, elapsed_ms, moves, Utc::now())
    }

    /// Records a completed tour, keeping only the best `max_entries` for its key
    ///
    /// Returns the best entry for the key after the update.
    pub fn record_at(
        &mut self,
        config: &BoardConfig,
        elapsed_ms: u64,
        moves: u32,
        at: DateTime<Utc>,
    ) -> &ScoreEntry {
        let entry = ScoreEntry {
            time: elapsed_ms,
            moves,
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            time_string: format_time(elapsed_ms),
        };

        let max_entries = self.max_entries;
        let list = self.scores.entry(ledger_key(config)).or_default();
        list.push(entry);
        Self::rank(list, max_entries);
        &list[0]
    }

    /// Top scores for one configuration, best first
    pub fn entries(&self, config: &BoardConfig) -> &[ScoreEntry] {
        self.scores
            .get(&ledger_key(config))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Best score per configuration, fastest first
    ///
    /// Keys that fail to parse are skipped with a warning.
    pub fn best_per_config(&self) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self
            .scores
            .iter()
            .filter_map(|(key, list)| {
                let best = list.first()?;
                match parse_ledger_key(key) {
                    Ok(config) => Some(LeaderboardRow {
                        config,
                        best: best.clone(),
                    }),
                    Err(e) => {
                        warn!("Skipping ledger entry: {}", e);
                        None
                    }
                }
            })
            .collect();

        rows.sort_by_key(|row| row.best.time);
        rows
    }

    pub fn is_empty(&self) -> bool {
        self.scores.values().all(Vec::is_empty)
    }

    fn rank(list: &mut Vec<ScoreEntry>, max_entries: usize) {
        list.sort_by(|a, b| (a.time, a.moves).cmp(&(b.time, b.moves)));
        list.truncate(max_entries);
    }

    // Hand-edited files may be unsorted or over-long
    fn normalize(&mut self) {
        let max_entries = self.max_entries;
        for list in self.scores.values_mut() {
            Self::rank(list, max_entries);
        }
    }
}
