// Move journal for asynchronous session logging
//
// Fire-and-forget JSONL writes so that logging never delays a game action.
// Each session action becomes one line; the replay tool reads them back.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Cell, TourType};

/// Session action recorded in the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    NewGame,
    Reset,
    Place,
    Move,
    Undo,
    Hint,
    AiHint,
}

/// Represents a single journal line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub epoch: u64,
    pub action: JournalAction,
    pub size: i32,
    pub tour_type: TourType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<Cell>,
    pub move_count: u32,
    pub visited_count: usize,
    pub timestamp: String,
}

/// Shared journal state
/// Uses Arc<Mutex<File>> so concurrent writes from spawned tasks stay line-ordered
#[derive(Clone)]
pub struct MoveJournal {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl MoveJournal {
    /// Creates a new journal
    /// If enabled is true, initializes the journal file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return MoveJournal::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                info!("Move journal enabled: {}", log_file_path);
                MoveJournal {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create journal file '{}': {}", log_file_path, e);
                MoveJournal::disabled()
            }
        }
    }

    /// Creates a disabled journal (no-op)
    pub fn disabled() -> Self {
        MoveJournal {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records an entry asynchronously (fire-and-forget)
    /// Entries are dropped with a warning when called outside a tokio runtime
    pub fn record(&self, entry: JournalEntry) {
        if !self.enabled {
            return;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime; dropping journal entry for epoch {}", entry.epoch);
                return;
            }
        };

        let file_handle = self.file.clone();
        handle.spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: JournalEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write journal entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush journal: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize journal entry: {}", e);
                }
            }
        }
    }
}
