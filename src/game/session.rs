//! Session state machine for one play-through.

use super::board::{Board, Difficulty, Direction, Position};
use super::guard::{RequestGuard, RequestToken};
use super::slide::slide;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Seconds of animation per tile travelled on a reference-width board.
pub const MOVE_TIME_PER_TILE: f32 = 0.15;

/// Board span that animation timing is normalized against, so traversal
/// feels constant-speed regardless of board size.
pub const REFERENCE_BOARD_SPAN: f32 = 9.0;

/// Coarse lifecycle state derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No board loaded.
    Idle,
    /// A level request is in flight; a previous board may still be shown.
    Loading,
    /// Board loaded, player not on the goal.
    Ready,
    /// Player reached the goal; moves are rejected until reset.
    Won,
}

/// A move the session has committed logically but whose visual transition
/// is still playing. The caller owns the timer and calls
/// [`Session::finish_move`] when it expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMove {
    /// Tile the player now occupies.
    pub target: Position,
    /// How long the visual transition should take.
    pub duration: Duration,
}

/// What a [`Session::reset`] amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The solved board is discarded; a fresh level request was issued and
    /// must be dispatched by the caller.
    NewLevel(RequestToken),
    /// Player moved back to the start of the current board.
    Repositioned,
    /// Nothing to reset.
    Ignored,
}

/// Read-only view published to the presentation collaborator after every
/// command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Coarse lifecycle state.
    pub state: SessionState,
    /// Current board, if one is loaded.
    pub board: Option<Board>,
    /// Player position; absent while no board is loaded.
    pub player: Option<Position>,
    /// Whether the goal has been reached.
    pub won: bool,
    /// Completed puzzles this session.
    pub win_count: u64,
    /// Whether a level request is in flight.
    pub loading: bool,
    /// Message from the most recent surfaced gateway failure.
    pub error: Option<String>,
    /// Duration of the most recently started move animation.
    pub animation_duration_seconds: f32,
}

/// Complete mutable game state for one play-through, independent of
/// rendering. Commands execute to completion before the next one is
/// accepted; the only asynchrony (level fetches, the move timer) re-enters
/// through [`Session::apply_level_outcome`] and [`Session::finish_move`].
#[derive(Debug)]
pub struct Session {
    board: Option<Board>,
    player: Position,
    animating: bool,
    won: bool,
    win_count: u64,
    difficulty: Difficulty,
    guard: RequestGuard,
    loading: bool,
    error: Option<String>,
    animation_duration_seconds: f32,
}

impl Session {
    /// Creates a session with no board loaded.
    #[instrument]
    pub fn new(difficulty: Difficulty) -> Self {
        info!(%difficulty, "Creating game session");
        Self {
            board: None,
            player: Position::new(0, 0),
            animating: false,
            won: false,
            win_count: 0,
            difficulty,
            guard: RequestGuard::new(),
            loading: false,
            error: None,
            animation_duration_seconds: 0.0,
        }
    }

    /// Difficulty the next level request will use.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Completed puzzles so far.
    pub fn win_count(&self) -> u64 {
        self.win_count
    }

    /// Whether the goal has been reached on the current board.
    pub fn won(&self) -> bool {
        self.won
    }

    /// Whether a move animation is still playing.
    pub fn animating(&self) -> bool {
        self.animating
    }

    /// Board currently loaded, if any.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Current player position. Meaningful only while a board is loaded.
    pub fn player(&self) -> Position {
        self.player
    }

    /// Allocates a request token and enters the loading state.
    ///
    /// The caller dispatches the actual gateway call and feeds its result
    /// back through [`Session::apply_level_outcome`] with the same token.
    /// Issuing a new token supersedes every outstanding request.
    #[instrument(skip(self))]
    pub fn begin_request(&mut self, difficulty: Difficulty) -> RequestToken {
        let token = self.guard.issue();
        info!(%difficulty, request = token.get(), "Requesting new level");
        self.difficulty = difficulty;
        self.loading = true;
        self.error = None;
        token
    }

    /// Applies a gateway completion, success or failure.
    ///
    /// The outcome takes effect only if `token` is still the newest issued
    /// token; stale completions of either kind are discarded without any
    /// state change.
    #[instrument(skip(self, outcome), fields(request = token.get()))]
    pub fn apply_level_outcome(&mut self, token: RequestToken, outcome: Result<Board, String>) {
        if !self.guard.is_current(token) {
            debug!(request = token.get(), "Discarding stale level outcome");
            return;
        }
        self.loading = false;
        match outcome {
            Ok(board) => {
                info!(level_id = board.level_id(), "Level loaded");
                self.player = board.start();
                self.won = false;
                self.error = None;
                self.board = Some(board);
            }
            Err(message) => {
                warn!(%message, "Level request failed");
                self.error = Some(message);
                self.board = None;
            }
        }
    }

    /// Attempts a slide in `direction`.
    ///
    /// Returns `None` without mutating anything when no board is loaded, an
    /// animation is in flight, the session is won, or the slide makes no
    /// progress. Otherwise the position update is committed immediately and
    /// the returned [`PendingMove`] tells the caller how long the visual
    /// transition lasts before it must call [`Session::finish_move`].
    #[instrument(skip(self))]
    pub fn move_player(&mut self, direction: Direction) -> Option<PendingMove> {
        let board = match &self.board {
            Some(board) => board,
            None => {
                debug!("Move ignored: no board loaded");
                return None;
            }
        };
        if self.animating {
            debug!("Move ignored: animation in flight");
            return None;
        }
        if self.won {
            debug!("Move ignored: session already won");
            return None;
        }

        let target = slide(board, self.player, direction);
        if target == self.player {
            debug!(?direction, "Move ignored: slide made no progress");
            return None;
        }

        let steps = self.player.manhattan_distance(target);
        let size_factor = board.rows().max(board.cols()) as f32 / REFERENCE_BOARD_SPAN;
        let seconds = steps.max(1) as f32 * (MOVE_TIME_PER_TILE / size_factor);

        info!(
            ?direction,
            from = ?self.player,
            to = ?target,
            steps,
            seconds,
            "Sliding player"
        );
        self.player = target;
        self.animating = true;
        self.animation_duration_seconds = seconds;
        Some(PendingMove {
            target,
            duration: Duration::from_secs_f32(seconds),
        })
    }

    /// Marks the pending move's animation as finished.
    ///
    /// If the player came to rest on the goal tile, the session flips to
    /// won and the win counter advances exactly once for this arrival.
    #[instrument(skip(self))]
    pub fn finish_move(&mut self) {
        if !self.animating {
            debug!("No animation in flight");
            return;
        }
        self.animating = false;
        let on_goal = self.board.as_ref().is_some_and(|b| b.end() == self.player);
        if on_goal {
            self.won = true;
            self.win_count += 1;
            info!(win_count = self.win_count, "Goal reached");
        }
    }

    /// Restarts the puzzle.
    ///
    /// A won session fetches a fresh board ("play again" is a new puzzle);
    /// mid-game the player is simply repositioned on the same board.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> ResetOutcome {
        if self.won {
            info!("Reset after win: requesting a new level");
            ResetOutcome::NewLevel(self.begin_request(self.difficulty))
        } else if let Some(board) = &self.board {
            info!("Reset mid-game: repositioning to start");
            self.player = board.start();
            self.won = false;
            ResetOutcome::Repositioned
        } else {
            debug!("Reset ignored: no board loaded");
            ResetOutcome::Ignored
        }
    }

    /// Switches difficulty and requests a matching level.
    ///
    /// Ignored when a request for the same difficulty is already in
    /// flight, so rapid re-selection never piles up duplicate requests.
    #[instrument(skip(self))]
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> Option<RequestToken> {
        if self.loading && difficulty == self.difficulty {
            debug!(%difficulty, "Duplicate difficulty request ignored");
            return None;
        }
        Some(self.begin_request(difficulty))
    }

    /// Current coarse lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.loading {
            SessionState::Loading
        } else if self.board.is_none() {
            SessionState::Idle
        } else if self.won {
            SessionState::Won
        } else {
            SessionState::Ready
        }
    }

    /// Captures the read-only view published after every command.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            board: self.board.clone(),
            player: self.board.as_ref().map(|_| self.player),
            won: self.won,
            win_count: self.win_count,
            loading: self.loading,
            error: self.error.clone(),
            animation_duration_seconds: self.animation_duration_seconds,
        }
    }
}
