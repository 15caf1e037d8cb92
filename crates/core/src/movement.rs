//! Movement controller: uncommitted position changes with confirm/cancel.
//!
//! Only one player may have a pending movement at a time. The lock lives in
//! [`MovementController::pending`] so callers driving the API directly are
//! held to it too, not just the UI.

use tracing::{debug, info};

use crate::{
    error::MovementError,
    models::{clamp_position, PlayerId, MAX_POSITION},
    registry::PlayerRegistry,
};

/// Largest magnitude the accumulated delta may reach.
pub const MAX_DELTA: i32 = MAX_POSITION;

/// A proposed move that has not been confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMovement {
    /// Player being moved.
    pub player_id: PlayerId,
    /// Net change between the origin and the displayed position.
    pub accumulated_delta: i32,
    /// Position held before the first step, restored on cancel.
    pub origin_position: i32,
}

/// A committed move, ready to be resolved against the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedMove {
    /// Player that moved.
    pub player_id: PlayerId,
    /// Position the player landed on.
    pub position: i32,
    /// Net change of the move.
    pub delta: i32,
}

/// Tracks the single pending movement.
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    pending: Option<PendingMovement>,
}

impl MovementController {
    /// Controller with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending movement, if any.
    pub fn pending(&self) -> Option<&PendingMovement> {
        self.pending.as_ref()
    }

    /// Player holding the movement lock.
    pub fn active_mover(&self) -> Option<PlayerId> {
        self.pending.map(|pending| pending.player_id)
    }

    /// Whether movement controls for `id` are usable.
    pub fn can_move(&self, id: PlayerId) -> bool {
        self.active_mover().map_or(true, |active| active == id)
    }

    /// Whether `id` has a non-zero pending movement to confirm.
    pub fn can_confirm(&self, id: PlayerId) -> bool {
        self.pending
            .is_some_and(|pending| pending.player_id == id && pending.accumulated_delta != 0)
    }

    /// Step a player one tile forward.
    pub fn increment(
        &mut self,
        registry: &mut PlayerRegistry,
        id: PlayerId,
    ) -> Result<PendingMovement, MovementError> {
        self.step(registry, id, 1)
    }

    /// Step a player one tile back.
    pub fn decrement(
        &mut self,
        registry: &mut PlayerRegistry,
        id: PlayerId,
    ) -> Result<PendingMovement, MovementError> {
        self.step(registry, id, -1)
    }

    fn step(
        &mut self,
        registry: &mut PlayerRegistry,
        id: PlayerId,
        direction: i32,
    ) -> Result<PendingMovement, MovementError> {
        if let Some(active) = self.active_mover() {
            if active != id {
                return Err(MovementError::Locked { active });
            }
        }
        let current = registry.position(id)?;
        let origin_position = self
            .pending
            .map_or(current, |pending| pending.origin_position);
        // Out-of-range steps clamp silently.
        let position = registry.set_position(id, current + direction)?;
        let pending = PendingMovement {
            player_id: id,
            accumulated_delta: (position - origin_position).clamp(-MAX_DELTA, MAX_DELTA),
            origin_position,
        };
        debug!(
            player_id = %id,
            position,
            delta = pending.accumulated_delta,
            "Movement pending"
        );
        self.pending = Some(pending);
        Ok(pending)
    }

    /// Commit the pending movement of `id`, leaving its position in place.
    pub fn confirm(
        &mut self,
        registry: &PlayerRegistry,
        id: PlayerId,
    ) -> Result<ConfirmedMove, MovementError> {
        let pending = match self.pending {
            Some(pending) if pending.player_id == id => pending,
            Some(pending) => {
                return Err(MovementError::Locked {
                    active: pending.player_id,
                })
            }
            None => return Err(MovementError::NothingToConfirm),
        };
        if pending.accumulated_delta == 0 {
            return Err(MovementError::NothingToConfirm);
        }
        let position = registry.position(id)?;
        self.pending = None;
        info!(player_id = %id, position, delta = pending.accumulated_delta, "Movement confirmed");
        Ok(ConfirmedMove {
            player_id: id,
            position,
            delta: pending.accumulated_delta,
        })
    }

    /// Roll the pending player back to its origin. No-op when nothing is pending.
    pub fn cancel(&mut self, registry: &mut PlayerRegistry) -> Option<PlayerId> {
        let pending = self.pending.take()?;
        let restored = clamp_position(pending.origin_position);
        match registry.set_position(pending.player_id, restored) {
            Ok(position) => {
                info!(player_id = %pending.player_id, position, "Movement cancelled");
            }
            Err(err) => debug!(%err, "Cancelled movement for a departed player"),
        }
        Some(pending.player_id)
    }

    /// Drop the pending movement of a player that left the game.
    pub fn forget(&mut self, id: PlayerId) {
        if self.active_mover() == Some(id) {
            self.pending = None;
        }
    }
}
