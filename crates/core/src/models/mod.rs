//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest position on the track.
pub const MIN_POSITION: i32 = 0;
/// Highest position on the track.
pub const MAX_POSITION: i32 = 18;
/// Position of a player that has not been placed on the board yet.
pub const UNPLACED: i32 = -1;
/// Number of positions on the track.
pub const BOARD_SIZE: usize = (MAX_POSITION - MIN_POSITION + 1) as usize;
/// Tile id marking a trick-or-treat event tile.
pub const EVENT_TILE_ID: &str = "N";

/// Opaque unique player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A participant with a token on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier.
    pub id: PlayerId,
    /// Display name, never blank.
    pub name: String,
    /// Track position, or [`UNPLACED`].
    pub position: i32,
}

impl Player {
    /// Whether the token has entered the track.
    pub fn is_placed(&self) -> bool {
        self.position >= MIN_POSITION
    }

    /// Position label for player cards; blank while unplaced.
    pub fn position_label(&self) -> String {
        if self.is_placed() {
            self.position.to_string()
        } else {
            String::new()
        }
    }
}

/// One trivia entry attached to a location tile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionDetail {
    /// Prompt shown when the popup opens.
    pub question: String,
    /// Answer revealed on a correct response.
    #[serde(default)]
    pub answer: String,
    /// Reward text revealed alongside the answer.
    #[serde(default)]
    pub bonus: Option<String>,
    /// Penalty text revealed on a wrong response.
    #[serde(default)]
    pub drawback: Option<String>,
}

/// Clamp a value onto the track.
pub fn clamp_position(position: i32) -> i32 {
    position.clamp(MIN_POSITION, MAX_POSITION)
}
