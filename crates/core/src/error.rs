#![allow(missing_docs)]

//! Typed errors for rejected actions and invalid static data.

use thiserror::Error;

use crate::models::PlayerId;

/// Problems found while validating the static board data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("tile id must not be blank")]
    BlankTileId,
    #[error("tile {0} is listed more than once")]
    DuplicateTile(String),
    #[error("location tile {0} has no questions")]
    EmptyQuestions(String),
    #[error("position {0} is outside the board")]
    PositionOutOfRange(i32),
    #[error("position {0} is mapped more than once")]
    DuplicatePosition(i32),
    #[error("position {0} has no tile mapping")]
    MissingPosition(i32),
}

/// Player registry lookups that failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

/// Movement actions rejected by the controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MovementError {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("player {active} is already moving")]
    Locked { active: PlayerId },
    #[error("no movement to confirm")]
    NothingToConfirm,
    #[error("close the popup before moving")]
    PopupOpen,
}

impl From<RegistryError> for MovementError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownPlayer(id) => MovementError::UnknownPlayer(id),
        }
    }
}

/// Outcome actions rejected by the popup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PopupError {
    #[error("the open popup has no question to answer")]
    NoQuestion,
    #[error("the answer has already been revealed")]
    AlreadyRevealed,
}
