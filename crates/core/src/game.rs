//! Root game store wiring the registry, movement controller, resolver and popup.

use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::{
    board::Illustrations,
    error::{MovementError, PopupError},
    models::{Player, PlayerId, QuestionDetail},
    movement::{MovementController, PendingMovement},
    popup::{PopupPresenter, PopupState},
    registry::PlayerRegistry,
    resolver::{TileClass, TileResolver},
};

/// Result of confirming a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    /// Player that moved.
    pub player_id: PlayerId,
    /// Position landed on.
    pub position: i32,
    /// Whether a popup opened.
    pub popup_opened: bool,
}

/// All mutable game state plus the static board data.
///
/// Each public method corresponds to one user action and completes every
/// registry and popup transition before returning.
#[derive(Debug)]
pub struct TriviaGame {
    resolver: TileResolver,
    illustrations: Illustrations,
    registry: PlayerRegistry,
    movement: MovementController,
    popup: PopupPresenter,
    rng: StdRng,
}

impl TriviaGame {
    /// Start a game with an explicit random source.
    pub fn new(resolver: TileResolver, illustrations: Illustrations, rng: StdRng) -> Self {
        Self {
            resolver,
            illustrations,
            registry: PlayerRegistry::new(),
            movement: MovementController::new(),
            popup: PopupPresenter::new(),
            rng,
        }
    }

    /// Start a game seeded from `seed`, or from OS entropy when `None`.
    pub fn with_seed(
        resolver: TileResolver,
        illustrations: Illustrations,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(resolver, illustrations, rng)
    }

    /// Static board data.
    pub fn resolver(&self) -> &TileResolver {
        &self.resolver
    }

    /// Tile artwork labels.
    pub fn illustrations(&self) -> &Illustrations {
        &self.illustrations
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        self.registry.players()
    }

    /// Read-only registry view.
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Pending movement, if any.
    pub fn pending(&self) -> Option<&PendingMovement> {
        self.movement.pending()
    }

    /// Whether movement controls for `id` are enabled.
    pub fn can_move(&self, id: PlayerId) -> bool {
        !self.popup.state().is_open() && self.movement.can_move(id)
    }

    /// Whether `id` may confirm right now.
    pub fn can_confirm(&self, id: PlayerId) -> bool {
        !self.popup.state().is_open() && self.movement.can_confirm(id)
    }

    /// Current popup.
    pub fn popup(&self) -> &PopupState {
        self.popup.state()
    }

    /// Player the popup was opened for.
    pub fn popup_player(&self) -> Option<&Player> {
        self.popup.player().and_then(|id| self.registry.get(id))
    }

    /// Label drawn on a tile.
    pub fn tile_label(&self, position: i32) -> String {
        self.illustrations.label(self.resolver.index(), position)
    }

    /// Kind of tile at a position.
    pub fn tile_class(&self, position: i32) -> TileClass {
        self.resolver.classify(position)
    }

    /// Add a player; blank names are ignored.
    pub fn add_player(&mut self, name: &str) -> Option<PlayerId> {
        self.registry.add(name)
    }

    /// Remove a player, releasing its pending movement.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.movement.forget(id);
        self.registry.remove(id)
    }

    /// Step a player forward.
    pub fn increment(&mut self, id: PlayerId) -> Result<PendingMovement, MovementError> {
        self.ensure_popup_closed()?;
        self.movement.increment(&mut self.registry, id)
    }

    /// Step a player back.
    pub fn decrement(&mut self, id: PlayerId) -> Result<PendingMovement, MovementError> {
        self.ensure_popup_closed()?;
        self.movement.decrement(&mut self.registry, id)
    }

    /// Commit the pending movement and open the popup for the landing tile.
    pub fn confirm(&mut self, id: PlayerId) -> Result<Landing, MovementError> {
        self.ensure_popup_closed()?;
        let confirmed = self.movement.confirm(&self.registry, id)?;
        let resolved = self.resolver.resolve(confirmed.position, &mut self.rng);
        let popup_opened = self.popup.open(resolved, confirmed.player_id);
        info!(
            player_id = %confirmed.player_id,
            position = confirmed.position,
            popup_opened,
            "Player landed"
        );
        Ok(Landing {
            player_id: confirmed.player_id,
            position: confirmed.position,
            popup_opened,
        })
    }

    /// Roll back the pending movement, if any.
    pub fn cancel(&mut self) -> Option<PlayerId> {
        self.movement.cancel(&mut self.registry)
    }

    /// Judge the open question correct.
    pub fn mark_correct(&mut self) -> Result<&QuestionDetail, PopupError> {
        self.popup.mark_correct()
    }

    /// Judge the open question wrong, moving its player back one tile.
    pub fn mark_incorrect(&mut self) -> Result<Option<i32>, PopupError> {
        self.popup.mark_incorrect(&mut self.registry)
    }

    /// Close the popup.
    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    // The single popup must be resolved before anyone moves again.
    fn ensure_popup_closed(&self) -> Result<(), MovementError> {
        if self.popup.state().is_open() {
            Err(MovementError::PopupOpen)
        } else {
            Ok(())
        }
    }
}
