//! Icebound - stdin-driven session driver
//!
//! Thin text collaborator around the engine: forwards typed intents and
//! prints each published snapshot. Not a renderer.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use icebound::{
    Difficulty, Engine, GameConfig, HttpLevelProvider, Intent, Snapshot, Position,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            provider_url,
            difficulty,
        } => run_play(config, provider_url, difficulty).await,
    }
}

/// Runs a session, reading intents from stdin until quit or EOF.
async fn run_play(
    config_path: Option<std::path::PathBuf>,
    provider_url: Option<String>,
    difficulty: Option<Difficulty>,
) -> Result<()> {
    // Log to stderr so stdout stays clean for the game text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match config_path {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(url) = provider_url {
        config.set_provider_url(url);
    }
    if let Some(difficulty) = difficulty {
        config.set_difficulty(difficulty);
    }

    info!(provider_url = %config.provider_url(), difficulty = %config.difficulty(), "Starting session");

    let provider =
        HttpLevelProvider::new(config.provider_url().to_string(), config.request_timeout())?;
    let (engine, handle) = Engine::new(Arc::new(provider), config.difficulty());
    let engine_task = tokio::spawn(engine.run());

    // Print every published snapshot.
    let mut snapshots = handle.snapshots();
    let printer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let text = render_snapshot(&snapshots.borrow().clone());
            println!("{}", text);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let intent = match parse_intent(line.trim()) {
            Some(intent) => intent,
            None => {
                if !line.trim().is_empty() {
                    warn!(input = %line.trim(), "Unrecognized input");
                    println!("commands: up/down/left/right, reset, easy/medium/hard/extreme, quit");
                }
                continue;
            }
        };
        let shutdown = intent == Intent::Shutdown;
        if !handle.send(intent) || shutdown {
            break;
        }
    }
    let _ = handle.send(Intent::Shutdown);

    engine_task.await??;
    printer.abort();
    Ok(())
}

/// Maps a typed line onto a user intent.
fn parse_intent(input: &str) -> Option<Intent> {
    use icebound::Direction;
    match input {
        "up" | "u" | "w" => Some(Intent::Move(Direction::Up)),
        "down" | "d" | "s" => Some(Intent::Move(Direction::Down)),
        "left" | "l" | "a" => Some(Intent::Move(Direction::Left)),
        "right" | "r" => Some(Intent::Move(Direction::Right)),
        "reset" => Some(Intent::Reset),
        "quit" | "q" => Some(Intent::Shutdown),
        other => other
            .parse::<Difficulty>()
            .ok()
            .map(Intent::ChangeDifficulty),
    }
}

/// Formats a snapshot as plain text lines.
fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = format!(
        "state={:?} wins={} loading={}",
        snapshot.state, snapshot.win_count, snapshot.loading
    );
    if let Some(error) = &snapshot.error {
        out.push_str(&format!("\nerror: {}", error));
    }
    let (board, player) = match (&snapshot.board, snapshot.player) {
        (Some(board), Some(player)) => (board, player),
        _ => return out,
    };
    out.push('\n');
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let pos = Position::new(col, row);
            let glyph = if pos == player {
                'P'
            } else if pos == board.end() {
                'E'
            } else if board.is_obstacle(pos) {
                'O'
            } else if board.is_wall(pos) {
                '#'
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
