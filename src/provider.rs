//! Level provider gateway.
//!
//! The engine treats level acquisition as an opaque async call that may be
//! slow, fail, or be superseded by a newer request. Only the HTTP wire
//! shape lives here; the session never sees it.

use crate::game::{Board, Difficulty, Position};
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Gateway error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Level provider error: {} at {}:{}", message, file, line)]
pub struct ProviderError {
    /// Human-readable message surfaced to the player on failure.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl ProviderError {
    /// Creates a new provider error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("Transport error: {}", err))
    }
}

/// Source of new levels, keyed by difficulty.
///
/// Implementations may take unbounded time and may fail; the engine only
/// distinguishes success from failure and discards superseded completions.
#[async_trait]
pub trait LevelProvider: Send + Sync {
    /// Fetches a fresh level for the given difficulty.
    async fn get_level(&self, difficulty: Difficulty) -> Result<Board, ProviderError>;
}

/// Board shape owned by the gateway contract.
#[derive(Debug, Deserialize)]
struct LevelDto {
    id: String,
    rows: i32,
    cols: i32,
    start: [i32; 2],
    end: [i32; 2],
    #[serde(default)]
    obstacles: Vec<[i32; 2]>,
}

impl LevelDto {
    /// Converts the wire shape into a board, rejecting malformed geometry.
    ///
    /// A network peer is untrusted input, so shape violations become a
    /// gateway failure rather than a panic deeper in the engine.
    fn into_board(self) -> Result<Board, ProviderError> {
        if self.rows < 3 || self.cols < 3 {
            return Err(ProviderError::new(format!(
                "Level {} has degenerate dimensions {}x{}",
                self.id, self.cols, self.rows
            )));
        }
        let start = Position::new(self.start[0], self.start[1]);
        let end = Position::new(self.end[0], self.end[1]);
        for (label, pos) in [("start", start), ("end", end)] {
            let interior = pos.col() > 0
                && pos.col() < self.cols - 1
                && pos.row() > 0
                && pos.row() < self.rows - 1;
            if !interior {
                return Err(ProviderError::new(format!(
                    "Level {} places {} outside the interior: ({}, {})",
                    self.id,
                    label,
                    pos.col(),
                    pos.row()
                )));
            }
        }
        let obstacles = self
            .obstacles
            .into_iter()
            .map(|[col, row]| Position::new(col, row))
            .collect::<HashSet<_>>();
        Ok(Board::new(self.rows, self.cols, start, end, obstacles, self.id))
    }
}

/// HTTP client for the external level-generation service.
#[derive(Debug, Clone)]
pub struct HttpLevelProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLevelProvider {
    /// Creates a provider for the given base URL.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        info!("Creating HTTP level provider");
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl LevelProvider for HttpLevelProvider {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get_level(&self, difficulty: Difficulty) -> Result<Board, ProviderError> {
        let url = format!("{}/levels/{}", self.base_url, difficulty);
        debug!(%url, "Fetching level");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(format!(
                "Level service returned {}: {}",
                status, body
            )));
        }

        let dto: LevelDto = response.json().await?;
        debug!(level_id = %dto.id, rows = dto.rows, cols = dto.cols, "Level received");
        dto.into_board()
    }
}
