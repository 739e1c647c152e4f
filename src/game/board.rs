//! Level geometry and tile classification.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Grid position as a (column, row) pair.
///
/// Components are signed so that stepping past the edge of a board is
/// representable; classification treats such positions as out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    col: i32,
    row: i32,
}

impl Position {
    /// Creates a new position.
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Zero-based column index.
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Zero-based row index.
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Position shifted by one step in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta();
        Self::new(self.col + dc, self.row + dr)
    }

    /// Manhattan distance between two positions.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

/// Cardinal movement directions available to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// Unit (column, row) delta for one step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Level difficulty requested from the level provider.
///
/// Purely a parameter of the acquisition request; the board shape is
/// whatever the provider returns for it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Small boards, few rocks.
    Easy,
    /// Mid-sized boards.
    Medium,
    /// Large boards, dense rocks.
    Hard,
    /// Largest boards the provider generates.
    Extreme,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

/// Immutable description of one level.
///
/// The outer ring of the grid (row 0, last row, column 0, last column) is
/// impassable except at `start` and `end`, which are always passable
/// regardless of where they sit. Obstacle membership at `start` or `end` is
/// a precondition violation by the level provider and is not defended
/// against here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: i32,
    cols: i32,
    start: Position,
    end: Position,
    obstacles: HashSet<Position>,
    level_id: String,
}

impl Board {
    /// Creates a board from provider-supplied geometry.
    ///
    /// Callers are expected to hand in positive dimensions and a strictly
    /// interior `start`/`end`; the HTTP gateway validates this before
    /// constructing a board from untrusted input.
    pub fn new(
        rows: i32,
        cols: i32,
        start: Position,
        end: Position,
        obstacles: HashSet<Position>,
        level_id: String,
    ) -> Self {
        Self {
            rows,
            cols,
            start,
            end,
            obstacles,
            level_id,
        }
    }

    /// Number of rows in the grid.
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns in the grid.
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// Tile the player starts on.
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Goal tile.
    pub const fn end(&self) -> Position {
        self.end
    }

    /// Rock positions in the interior.
    pub fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    /// Opaque identifier correlating this board to the request that
    /// produced it.
    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    /// Whether `pos` holds a rock.
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Whether `pos` lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.col() >= 0 && pos.col() < self.cols && pos.row() >= 0 && pos.row() < self.rows
    }

    /// Whether `pos` is an impassable ring tile.
    ///
    /// `start` and `end` win over wall classification even when they sit on
    /// the ring.
    pub fn is_wall(&self, pos: Position) -> bool {
        if pos == self.start || pos == self.end {
            return false;
        }
        self.in_bounds(pos)
            && (pos.col() == 0
                || pos.row() == 0
                || pos.col() == self.cols - 1
                || pos.row() == self.rows - 1)
    }

    /// Whether a slide must stop before entering `pos`.
    pub fn is_blocked(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.is_obstacle(pos) || self.is_wall(pos)
    }
}
