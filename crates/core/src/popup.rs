//! Popup presenter: the single modal opened after a confirmed move.
//!
//! ```text
//! Closed -> NotFound | Event | Special | Question(Hidden)
//! Question(Hidden) -> Question(Correct)            mark_correct
//! Question(Hidden) -> Question(Incorrect)          mark_incorrect, player steps back
//! any -> Closed                                    close
//! ```

use tracing::{debug, info, warn};

use crate::{
    error::PopupError,
    models::{PlayerId, QuestionDetail},
    registry::PlayerRegistry,
    resolver::{EventKind, ResolvedTile},
};

/// How much of a regular question has been revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reveal {
    /// Waiting for the table to judge the answer.
    #[default]
    Hidden,
    /// Answer and bonus shown.
    Correct,
    /// Drawback shown; the player stepped back.
    Incorrect,
}

/// What the popup currently displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    /// No popup.
    #[default]
    Closed,
    /// Tile id missing from the catalog; only closing is possible.
    NotFound {
        /// Tile id that failed to resolve.
        tile_id: String,
    },
    /// Trick-or-treat result.
    Event {
        /// Drawn outcome.
        kind: EventKind,
    },
    /// Special tile text; acknowledged by closing.
    Special {
        /// Special tile id.
        tile_id: String,
        /// Detail carrying the tile text as its question.
        detail: QuestionDetail,
    },
    /// Regular trivia question.
    Question {
        /// Location tile id.
        tile_id: String,
        /// Drawn question.
        detail: QuestionDetail,
        /// Reveal progress.
        reveal: Reveal,
    },
}

impl PopupState {
    /// Whether a popup is showing.
    pub fn is_open(&self) -> bool {
        !matches!(self, PopupState::Closed)
    }

    /// Whether the popup shows a special tile.
    pub fn is_special(&self) -> bool {
        matches!(self, PopupState::Special { .. })
    }

    /// Whether correct/incorrect actions are available.
    pub fn awaits_answer(&self) -> bool {
        matches!(
            self,
            PopupState::Question {
                reveal: Reveal::Hidden,
                ..
            }
        )
    }
}

/// Holds the popup state and the player it was opened for.
#[derive(Debug, Clone, Default)]
pub struct PopupPresenter {
    state: PopupState,
    player: Option<PlayerId>,
}

impl PopupPresenter {
    /// Closed presenter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &PopupState {
        &self.state
    }

    /// Player the open popup belongs to.
    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    /// Show resolved content for `player`. Returns whether a popup opened.
    pub fn open(&mut self, resolved: ResolvedTile, player: PlayerId) -> bool {
        let state = match resolved {
            ResolvedTile::Nothing => return false,
            ResolvedTile::NotFound { tile_id } => PopupState::NotFound { tile_id },
            ResolvedTile::Event(kind) => PopupState::Event { kind },
            ResolvedTile::Special { tile_id, detail } => PopupState::Special { tile_id, detail },
            ResolvedTile::Question { tile_id, detail } => PopupState::Question {
                tile_id,
                detail,
                reveal: Reveal::Hidden,
            },
        };
        if self.state.is_open() {
            debug!("Replacing open popup");
        }
        info!(player_id = %player, state = ?state, "Popup opened");
        self.state = state;
        self.player = Some(player);
        true
    }

    /// Reveal the answer and bonus. No player is affected.
    pub fn mark_correct(&mut self) -> Result<&QuestionDetail, PopupError> {
        let reveal = self.hidden_reveal()?;
        *reveal = Reveal::Correct;
        info!(player_id = ?self.player, "Answer marked correct");
        match &self.state {
            PopupState::Question { detail, .. } => Ok(detail),
            _ => Err(PopupError::NoQuestion),
        }
    }

    /// Reveal the drawback and move the popup's player one tile back.
    ///
    /// Returns the player's new position, or `None` when that player has
    /// since left the game.
    pub fn mark_incorrect(
        &mut self,
        registry: &mut PlayerRegistry,
    ) -> Result<Option<i32>, PopupError> {
        let reveal = self.hidden_reveal()?;
        *reveal = Reveal::Incorrect;
        let Some(player) = self.player else {
            return Ok(None);
        };
        match registry.step_back(player) {
            Ok(position) => {
                info!(player_id = %player, position, "Answer marked incorrect");
                Ok(Some(position))
            }
            Err(err) => {
                warn!(%err, "Incorrect answer for a departed player");
                Ok(None)
            }
        }
    }

    /// Close unconditionally. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.state.is_open() {
            debug!("Popup closed");
        }
        self.state = PopupState::Closed;
        self.player = None;
    }

    fn hidden_reveal(&mut self) -> Result<&mut Reveal, PopupError> {
        match &mut self.state {
            PopupState::Question { reveal, .. } if *reveal == Reveal::Hidden => Ok(reveal),
            PopupState::Question { .. } => Err(PopupError::AlreadyRevealed),
            _ => Err(PopupError::NoQuestion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> ResolvedTile {
        ResolvedTile::Question {
            tile_id: "3".to_string(),
            detail: QuestionDetail {
                question: "Em que ano foi inaugurado?".to_string(),
                answer: "1910".to_string(),
                bonus: Some("Avance uma casa".to_string()),
                drawback: Some("Volte uma casa".to_string()),
            },
        }
    }

    fn placed(registry: &mut PlayerRegistry, name: &str, position: i32) -> PlayerId {
        let id = registry.add(name).expect("added");
        registry.set_position(id, position).expect("known");
        id
    }

    #[test]
    fn close_is_idempotent() {
        let mut popup = PopupPresenter::new();
        popup.close();
        assert_eq!(popup.state(), &PopupState::Closed);
        assert!(popup.open(question(), PlayerId::new()));
        popup.close();
        popup.close();
        assert_eq!(popup.state(), &PopupState::Closed);
        assert!(popup.player().is_none());
    }

    #[test]
    fn nothing_keeps_popup_closed() {
        let mut popup = PopupPresenter::new();
        assert!(!popup.open(ResolvedTile::Nothing, PlayerId::new()));
        assert!(!popup.state().is_open());
    }

    #[test]
    fn correct_reveals_without_moving_anyone() {
        let mut registry = PlayerRegistry::new();
        let ana = placed(&mut registry, "Ana", 3);
        let mut popup = PopupPresenter::new();
        popup.open(question(), ana);
        assert!(popup.state().awaits_answer());

        let detail = popup.mark_correct().expect("hidden question");
        assert_eq!(detail.answer, "1910");
        assert_eq!(registry.position(ana), Ok(3));
        assert!(matches!(
            popup.state(),
            PopupState::Question {
                reveal: Reveal::Correct,
                ..
            }
        ));
        assert_eq!(popup.mark_correct(), Err(PopupError::AlreadyRevealed));
    }

    #[test]
    fn incorrect_moves_only_the_popup_player_back() {
        let mut registry = PlayerRegistry::new();
        let ana = placed(&mut registry, "Ana", 3);
        let bia = placed(&mut registry, "Bia", 3);
        let mut popup = PopupPresenter::new();
        popup.open(question(), ana);

        assert_eq!(popup.mark_incorrect(&mut registry), Ok(Some(2)));
        assert_eq!(registry.position(ana), Ok(2));
        assert_eq!(registry.position(bia), Ok(3));

        // Terminal: a second outcome neither reveals nor moves again.
        assert_eq!(
            popup.mark_incorrect(&mut registry),
            Err(PopupError::AlreadyRevealed)
        );
        assert_eq!(popup.mark_correct(), Err(PopupError::AlreadyRevealed));
        assert_eq!(registry.position(ana), Ok(2));
    }

    #[test]
    fn incorrect_floors_at_first_tile() {
        let mut registry = PlayerRegistry::new();
        let ana = placed(&mut registry, "Ana", 0);
        let mut popup = PopupPresenter::new();
        popup.open(question(), ana);
        assert_eq!(popup.mark_incorrect(&mut registry), Ok(Some(0)));
    }

    #[test]
    fn incorrect_for_departed_player_still_reveals() {
        let mut registry = PlayerRegistry::new();
        let ana = placed(&mut registry, "Ana", 4);
        let mut popup = PopupPresenter::new();
        popup.open(question(), ana);
        registry.remove(ana);
        assert_eq!(popup.mark_incorrect(&mut registry), Ok(None));
        assert!(matches!(
            popup.state(),
            PopupState::Question {
                reveal: Reveal::Incorrect,
                ..
            }
        ));
    }

    #[test]
    fn non_question_popups_reject_outcomes() {
        let mut registry = PlayerRegistry::new();
        let ana = placed(&mut registry, "Ana", 5);
        let mut popup = PopupPresenter::new();

        popup.open(
            ResolvedTile::Special {
                tile_id: "9".to_string(),
                detail: QuestionDetail {
                    question: "Casa da Aranha".to_string(),
                    ..QuestionDetail::default()
                },
            },
            ana,
        );
        assert!(popup.state().is_special());
        assert_eq!(popup.mark_correct(), Err(PopupError::NoQuestion));

        popup.open(ResolvedTile::Event(EventKind::Travessura), ana);
        assert_eq!(
            popup.mark_incorrect(&mut registry),
            Err(PopupError::NoQuestion)
        );

        popup.open(
            ResolvedTile::NotFound {
                tile_id: "77".to_string(),
            },
            ana,
        );
        assert_eq!(
            popup.mark_incorrect(&mut registry),
            Err(PopupError::NoQuestion)
        );
        assert_eq!(registry.position(ana), Ok(5));
    }
}
