//! Async driver around the session state machine.
//!
//! A single task owns the [`Session`] and serializes every command, so
//! handlers are atomic with respect to each other. Level fetches and the
//! move-animation timer run as fire-and-forget tasks whose completions are
//! delivered back into the same loop; stale level completions are
//! discarded by the session's request guard, and at most one animation
//! timer is ever outstanding because moves are rejected while one plays.

use crate::game::{Board, Difficulty, Direction, RequestToken, ResetOutcome, Session, Snapshot};
use crate::provider::LevelProvider;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument};

/// User intents forwarded by the presentation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Slide the player in a direction.
    Move(Direction),
    /// Restart the puzzle (new level when won, reposition otherwise).
    Reset,
    /// Switch difficulty and fetch a matching level.
    ChangeDifficulty(Difficulty),
    /// Stop the engine loop.
    Shutdown,
}

/// Completions delivered back into the engine loop.
#[derive(Debug)]
enum Completion {
    /// A level fetch finished, tagged with the token it was issued under.
    Level {
        token: RequestToken,
        outcome: Result<Board, String>,
    },
    /// The pending move's animation timer expired.
    MoveFinished,
}

/// Handle given to the presentation collaborator: send intents in, watch
/// snapshots out. No other channel into the engine exists.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    intents: mpsc::UnboundedSender<Intent>,
    snapshots: watch::Receiver<Snapshot>,
}

impl EngineHandle {
    /// Forwards a user intent. Returns false if the engine has stopped.
    pub fn send(&self, intent: Intent) -> bool {
        self.intents.send(intent).is_ok()
    }

    /// Receiver for the snapshot published after every applied command.
    pub fn snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }
}

/// Single-task game engine owning the session and the level provider.
pub struct Engine {
    session: Session,
    provider: Arc<dyn LevelProvider>,
    intents: mpsc::UnboundedReceiver<Intent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<Snapshot>,
}

impl Engine {
    /// Creates an engine and the handle the presentation layer drives it
    /// with.
    pub fn new(provider: Arc<dyn LevelProvider>, difficulty: Difficulty) -> (Self, EngineHandle) {
        let session = Session::new(difficulty);
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let engine = Self {
            session,
            provider,
            intents: intent_rx,
            completions_tx,
            completions_rx,
            snapshots: snapshot_tx,
        };
        let handle = EngineHandle {
            intents: intent_tx,
            snapshots: snapshot_rx,
        };
        (engine, handle)
    }

    /// Runs the command loop until shutdown, fetching the first level on
    /// entry.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<()> {
        info!("Starting game engine");
        let token = self.session.begin_request(self.session.difficulty());
        self.dispatch_fetch(token);
        self.publish();

        loop {
            tokio::select! {
                intent = self.intents.recv() => match intent {
                    None | Some(Intent::Shutdown) => {
                        info!("Engine shutting down");
                        break;
                    }
                    Some(intent) => self.handle_intent(intent),
                },
                Some(completion) = self.completions_rx.recv() => {
                    self.handle_completion(completion);
                }
            }
            self.publish();
        }
        Ok(())
    }

    fn handle_intent(&mut self, intent: Intent) {
        debug!(?intent, "Handling intent");
        match intent {
            Intent::Move(direction) => {
                if let Some(pending) = self.session.move_player(direction) {
                    let tx = self.completions_tx.clone();
                    let duration = pending.duration;
                    let _ = tokio::spawn(async move {
                        tokio::time::sleep(duration).await;
                        let _ = tx.send(Completion::MoveFinished);
                    });
                }
            }
            Intent::Reset => {
                if let ResetOutcome::NewLevel(token) = self.session.reset() {
                    self.dispatch_fetch(token);
                }
            }
            Intent::ChangeDifficulty(difficulty) => {
                if let Some(token) = self.session.change_difficulty(difficulty) {
                    self.dispatch_fetch(token);
                }
            }
            Intent::Shutdown => unreachable!("handled by the run loop"),
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Level { token, outcome } => {
                self.session.apply_level_outcome(token, outcome);
            }
            Completion::MoveFinished => self.session.finish_move(),
        }
    }

    /// Spawns a gateway fetch for the active difficulty. The result comes
    /// back tagged with `token`; by then a newer request may have been
    /// issued, in which case the session drops it.
    fn dispatch_fetch(&self, token: RequestToken) {
        let provider = Arc::clone(&self.provider);
        let difficulty = self.session.difficulty();
        let tx = self.completions_tx.clone();
        let _ = tokio::spawn(async move {
            let outcome = provider
                .get_level(difficulty)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Completion::Level { token, outcome });
        });
    }

    fn publish(&self) {
        let _ = self.snapshots.send(self.session.snapshot());
    }
}
