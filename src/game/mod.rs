//! Pure game logic: board geometry, the slide algorithm, the request
//! guard, and the session state machine.

mod board;
mod guard;
mod session;
mod slide;

pub use board::{Board, Difficulty, Direction, Position};
pub use guard::{RequestGuard, RequestToken};
pub use session::{
    MOVE_TIME_PER_TILE, PendingMove, REFERENCE_BOARD_SPAN, ResetOutcome, Session, SessionState,
    Snapshot,
};
pub use slide::slide;
