// Configuration module for reading Knight.toml
// Every tunable of the session, the advisor bridge and the score ledger lives here

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::{BoardConfig, TourType, MIN_BOARD_SIZE};

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardSettings,
    pub advisor: AdvisorConfig,
    pub ledger: LedgerConfig,
    pub debug: DebugConfig,
    pub survey: SurveyConfig,
}

/// Board sizes offered to players and the configuration used at startup
#[derive(Debug, Deserialize, Clone)]
pub struct BoardSettings {
    pub default_size: i32,
    pub default_tour_type: TourType,
    pub min_size: i32,
    pub max_size: i32,
}

impl BoardSettings {
    /// Checks a requested board size against the configured bounds
    pub fn allows(&self, size: i32) -> bool {
        size >= self.min_size.max(MIN_BOARD_SIZE) && size <= self.max_size
    }

    pub fn default_config(&self) -> BoardConfig {
        BoardConfig {
            size: self.default_size.max(MIN_BOARD_SIZE),
            tour_type: self.default_tour_type,
        }
    }
}

/// External move-prediction oracle
#[derive(Debug, Deserialize, Clone)]
pub struct AdvisorConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub supported_size: i32,
    pub timeout_ms: u64,
}

/// Best-score table persistence
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    pub file_path: String,
    pub max_entries_per_key: usize,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// Warnsdorff survey defaults
#[derive(Debug, Deserialize, Clone)]
pub struct SurveyConfig {
    pub default_samples: usize,
    pub default_seed: u64,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Knight.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Knight.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Knight.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Knight.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardSettings {
                default_size: 8,
                default_tour_type: TourType::Open,
                min_size: 5,
                max_size: 12,
            },
            advisor: AdvisorConfig {
                enabled: true,
                endpoint: "http://localhost:5001/predict".to_string(),
                supported_size: 5,
                timeout_ms: 3000,
            },
            ledger: LedgerConfig {
                file_path: "knight_leaderboard.json".to_string(),
                max_entries_per_key: 5,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "knight_journal.jsonl".to_string(),
            },
            survey: SurveyConfig {
                default_samples: 0,
                default_seed: 42,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load Knight.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
