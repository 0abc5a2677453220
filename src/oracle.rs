// External advisor bridge
//
// The prediction service is an opaque oracle: it receives the board as a grid of
// markers and answers with a relative knight offset. Every failure maps to an
// AdvisorError so that a broken oracle never affects the tour itself.

use async_trait::async_trait;
use derive_more::{Display, Error};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AdvisorConfig;
use crate::types::{BoardConfig, Cell};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum AdvisorError {
    #[display("advisor unavailable: {reason}")]
    Unavailable { reason: String },
    #[display("advisor only supports {supported}x{supported} boards, not {size}x{size}")]
    UnsupportedBoard { size: i32, supported: i32 },
    #[display("no knight on the board to advise")]
    NoPosition,
    #[display("advisor suggested off-board cell {cell}")]
    OffBoard { cell: Cell },
    #[display("advisor reply is stale; the game changed while waiting")]
    Stale,
}

impl AdvisorError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        AdvisorError::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Request body sent to the oracle
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest {
    pub board: Vec<Vec<u8>>,
}

/// Relative knight offset suggested by the oracle
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeMove {
    pub d_row: i32,
    pub d_col: i32,
}

/// Oracle reply; only `move` is required
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictResponse {
    #[serde(rename = "move")]
    pub suggested: RelativeMove,
    #[serde(default)]
    pub action_index: Option<u8>,
    #[serde(default)]
    pub model_info: Option<serde_json::Value>,
}

/// A prepared hint request, tagged with the game it belongs to
///
/// The session compares these fields against its state when the reply arrives
/// and throws the reply away if the game has moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorTicket {
    pub epoch: u64,
    pub config: BoardConfig,
    pub origin: Cell,
    pub grid: Vec<Vec<u8>>,
}

/// Source of move suggestions for a marker grid
#[async_trait]
pub trait MoveOracle: Send + Sync {
    async fn predict(&self, grid: &[Vec<u8>]) -> Result<RelativeMove, AdvisorError>;
}

/// Oracle reached over HTTP POST with a JSON body
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOracle {
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AdvisorError::unavailable(format!("failed to build client: {}", e)))?;

        Ok(HttpOracle {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MoveOracle for HttpOracle {
    async fn predict(&self, grid: &[Vec<u8>]) -> Result<RelativeMove, AdvisorError> {
        let body = PredictRequest {
            board: grid.to_vec(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Advisor request to {} failed: {}", self.endpoint, e);
                AdvisorError::unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Advisor returned HTTP {}", status);
            return Err(AdvisorError::unavailable(format!("server returned {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AdvisorError::unavailable(format!("failed to read reply: {}", e)))?;
        let reply = parse_reply(&text)?;
        debug!("Advisor suggested offset {:?}", reply);
        Ok(reply)
    }
}

/// Parses an oracle reply body
pub fn parse_reply(body: &str) -> Result<RelativeMove, AdvisorError> {
    serde_json::from_str::<PredictResponse>(body)
        .map(|reply| reply.suggested)
        .map_err(|e| AdvisorError::unavailable(format!("malformed reply: {}", e)))
}

/// Oracle used when the advisor is disabled in configuration
pub struct DisabledOracle;

#[async_trait]
impl MoveOracle for DisabledOracle {
    async fn predict(&self, _grid: &[Vec<u8>]) -> Result<RelativeMove, AdvisorError> {
        Err(AdvisorError::unavailable("advisor disabled in configuration"))
    }
}
