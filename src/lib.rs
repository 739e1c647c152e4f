//! Icebound - ice-slide puzzle session engine
//!
//! A player token slides across an ice grid in a chosen direction until it
//! hits a rock, a wall, or the edge of the board, trying to reach the goal
//! tile. This crate owns the game session engine:
//!
//! - **Game**: pure board geometry, the slide algorithm, and the session
//!   state machine (idle -> loading -> ready -> won)
//! - **Provider**: async level-acquisition gateway, with latest-request-wins
//!   resolution so overlapping fetches can never clobber each other
//! - **Engine**: single-task command loop that serializes intents, runs the
//!   move-animation timer, and publishes snapshots for a presentation layer
//!
//! Rendering is out of scope; the bundled binary is a thin text driver.
//!
//! # Example
//!
//! ```no_run
//! use icebound::{Difficulty, Engine, HttpLevelProvider, Intent};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = HttpLevelProvider::new(
//!     "http://127.0.0.1:3000".to_string(),
//!     Duration::from_secs(10),
//! )?;
//! let (engine, handle) = Engine::new(Arc::new(provider), Difficulty::Easy);
//! tokio::spawn(engine.run());
//!
//! handle.send(Intent::Move(icebound::Direction::Right));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod engine;
mod game;
mod provider;

// Crate-level exports - configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - async engine driver
pub use engine::{Engine, EngineHandle, Intent};

// Crate-level exports - pure game logic
pub use game::{
    Board, Difficulty, Direction, MOVE_TIME_PER_TILE, PendingMove, Position, REFERENCE_BOARD_SPAN,
    RequestGuard, RequestToken, ResetOutcome, Session, SessionState, Snapshot, slide,
};

// Crate-level exports - level provider gateway
pub use provider::{HttpLevelProvider, LevelProvider, ProviderError};
