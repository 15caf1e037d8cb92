//! Board geometry: which tile sits at each position and how the track is drawn.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::{
    catalog::tile_id_from_any,
    error::DataError,
    models::{BOARD_SIZE, MAX_POSITION, MIN_POSITION},
};

/// Track positions grouped into display rows, top to bottom.
///
/// The first column climbs from 0 to 6, the top row runs right to 12 and
/// the last column descends to 18.
pub const BOARD_ROWS: [&[i32]; 7] = [
    &[6, 7, 8, 9, 10, 11, 12],
    &[5, 13],
    &[4, 14],
    &[3, 15],
    &[2, 16],
    &[1, 17],
    &[0, 18],
];

#[derive(Debug, Deserialize)]
struct RawPositions {
    #[serde(rename = "tilePositions")]
    tile_positions: Vec<TilePosition>,
}

/// One `(tileId, position)` pair from `tile-position.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TilePosition {
    /// Tile placed at the position.
    #[serde(rename = "tileId", deserialize_with = "tile_id_from_any")]
    pub tile_id: String,
    /// Track position.
    pub position: i32,
}

/// Read-only mapping from track position to tile id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIndex {
    tiles: BTreeMap<i32, String>,
}

impl PositionIndex {
    /// Build an index, requiring every board position exactly once.
    pub fn new(pairs: Vec<TilePosition>) -> Result<Self, DataError> {
        let mut tiles = BTreeMap::new();
        for pair in pairs {
            if !(MIN_POSITION..=MAX_POSITION).contains(&pair.position) {
                return Err(DataError::PositionOutOfRange(pair.position));
            }
            let tile_id = pair.tile_id.trim().to_string();
            if tile_id.is_empty() {
                return Err(DataError::BlankTileId);
            }
            if tiles.insert(pair.position, tile_id).is_some() {
                return Err(DataError::DuplicatePosition(pair.position));
            }
        }
        if let Some(missing) = (MIN_POSITION..=MAX_POSITION).find(|pos| !tiles.contains_key(pos)) {
            return Err(DataError::MissingPosition(missing));
        }
        debug_assert_eq!(tiles.len(), BOARD_SIZE);
        Ok(Self { tiles })
    }

    /// Parse `tile-position.json` content.
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let raw: RawPositions = serde_json::from_str(content)?;
        Ok(Self::new(raw.tile_positions)?)
    }

    /// Tile id at a position, if mapped.
    pub fn tile_at(&self, position: i32) -> Option<&str> {
        self.tiles.get(&position).map(String::as_str)
    }

    /// Iterate `(position, tile_id)` in position order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.tiles.iter().map(|(pos, id)| (*pos, id.as_str()))
    }
}

/// Optional artwork labels for tiles; tiles without one show a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Illustrations {
    by_tile: HashMap<String, String>,
}

impl Illustrations {
    /// Parse `illustrations.json` content.
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Artwork for a tile id.
    pub fn for_tile(&self, tile_id: &str) -> Option<&str> {
        self.by_tile.get(tile_id).map(String::as_str)
    }

    /// Label drawn on the tile at `position`: its artwork or `position + 1`.
    pub fn label(&self, index: &PositionIndex, position: i32) -> String {
        index
            .tile_at(position)
            .and_then(|tile_id| self.for_tile(tile_id))
            .map(str::to_string)
            .unwrap_or_else(|| (position + 1).to_string())
    }
}
