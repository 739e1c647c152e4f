//! Pure movement engine.
//!
//! A slide walks one tile at a time in a fixed direction until the next
//! tile is blocked. Termination is guaranteed because every board carries
//! an impassable outer ring, so any direction hits a wall after at most
//! `max(rows, cols)` steps.

use super::board::{Board, Direction, Position};

/// Computes where a slide from `from` in `direction` comes to rest.
///
/// Returns the last unblocked tile reached, which equals `from` when the
/// very first step is already blocked.
pub fn slide(board: &Board, from: Position, direction: Direction) -> Position {
    let mut current = from;
    loop {
        let next = current.step(direction);
        if board.is_blocked(next) {
            return current;
        }
        current = next;
    }
}
