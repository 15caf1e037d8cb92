#![warn(clippy::all, missing_docs)]

//! Core game logic for the Trilha trivia board game.
//!
//! This crate hosts the board data models, tile resolution, player
//! movement rules and popup state machine used by the terminal UI and
//! any future frontends.

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod movement;
pub mod popup;
pub mod registry;
pub mod resolver;
pub mod resource;

pub use config::AppConfig;
pub use error::{DataError, MovementError, PopupError, RegistryError};
pub use game::{Landing, TriviaGame};
pub use models::{Player, PlayerId, QuestionDetail};
pub use popup::{PopupState, Reveal};
pub use resolver::{EventKind, ResolvedTile, TileClass, TilePolicy, TileResolver};
pub use resource::{BoardData, ResourceLoader};
