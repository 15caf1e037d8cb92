//! Player registry: the mutable list of players in join order.

use tracing::{debug, info};

use crate::{
    error::RegistryError,
    models::{clamp_position, Player, PlayerId, MIN_POSITION, UNPLACED},
};

/// Ordered set of players. The only owner of player positions.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unplaced player. Blank names are ignored and yield `None`.
    pub fn add(&mut self, name: &str) -> Option<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring blank player name");
            return None;
        }
        let player = Player {
            id: PlayerId::new(),
            name: name.to_string(),
            position: UNPLACED,
        };
        let id = player.id;
        info!(player_id = %id, name, "Player added");
        self.players.push(player);
        Some(id)
    }

    /// Remove a player, returning it when present.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|player| player.id == id)?;
        let player = self.players.remove(index);
        info!(player_id = %id, name = %player.name, "Player removed");
        Some(player)
    }

    /// Look up a player.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Current position of a player.
    pub fn position(&self, id: PlayerId) -> Result<i32, RegistryError> {
        self.get(id)
            .map(|player| player.position)
            .ok_or(RegistryError::UnknownPlayer(id))
    }

    /// Place a player, clamping onto the track. Returns the stored position.
    pub fn set_position(&mut self, id: PlayerId, position: i32) -> Result<i32, RegistryError> {
        let player = self
            .players
            .iter_mut()
            .find(|player| player.id == id)
            .ok_or(RegistryError::UnknownPlayer(id))?;
        player.position = clamp_position(position);
        debug!(player_id = %id, position = player.position, "Position set");
        Ok(player.position)
    }

    /// Move a player one space back, floored at the first tile.
    pub fn step_back(&mut self, id: PlayerId) -> Result<i32, RegistryError> {
        let current = self.position(id)?;
        self.set_position(id, (current - 1).max(MIN_POSITION))
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Players standing on a position, in join order.
    pub fn players_at(&self, position: i32) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(move |player| player.position == position)
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether nobody has joined.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_POSITION;

    #[test]
    fn adds_players_unplaced_in_order() {
        let mut registry = PlayerRegistry::new();
        let ana = registry.add("  Ana ").expect("added");
        let bia = registry.add("Bia").expect("added");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.players()[0].id, ana);
        assert_eq!(registry.players()[0].name, "Ana");
        assert_eq!(registry.players()[1].id, bia);
        assert_eq!(registry.position(ana), Ok(UNPLACED));
    }

    #[test]
    fn blank_names_are_ignored() {
        let mut registry = PlayerRegistry::new();
        assert!(registry.add("").is_none());
        assert!(registry.add("   ").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn removal_only_touches_target() {
        let mut registry = PlayerRegistry::new();
        let ana = registry.add("Ana").expect("added");
        let bia = registry.add("Bia").expect("added");
        let removed = registry.remove(ana).expect("present");
        assert_eq!(removed.name, "Ana");
        assert!(registry.get(ana).is_none());
        assert!(registry.get(bia).is_some());
        assert!(registry.remove(ana).is_none());
    }

    #[test]
    fn positions_are_clamped() {
        let mut registry = PlayerRegistry::new();
        let ana = registry.add("Ana").expect("added");
        assert_eq!(registry.set_position(ana, 25), Ok(MAX_POSITION));
        assert_eq!(registry.set_position(ana, -4), Ok(MIN_POSITION));
        assert_eq!(registry.step_back(ana), Ok(MIN_POSITION));
        registry.set_position(ana, 6).expect("known");
        assert_eq!(registry.step_back(ana), Ok(5));
    }

    #[test]
    fn unknown_players_are_reported() {
        let mut registry = PlayerRegistry::new();
        let ghost = PlayerId::new();
        assert_eq!(
            registry.set_position(ghost, 3),
            Err(RegistryError::UnknownPlayer(ghost))
        );
        assert_eq!(
            registry.step_back(ghost),
            Err(RegistryError::UnknownPlayer(ghost))
        );
    }

    #[test]
    fn lists_players_on_a_tile() {
        let mut registry = PlayerRegistry::new();
        let ana = registry.add("Ana").expect("added");
        let bia = registry.add("Bia").expect("added");
        registry.add("Caio").expect("added");
        registry.set_position(ana, 3).expect("known");
        registry.set_position(bia, 3).expect("known");
        let names: Vec<&str> = registry.players_at(3).map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia"]);
        assert_eq!(registry.players_at(UNPLACED).count(), 1);
    }
}
