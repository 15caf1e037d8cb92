//! Tile catalog: trivia content for location tiles and texts for special tiles.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer};

use crate::{error::DataError, models::QuestionDetail};

/// Tile carrying one or more trivia questions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationTile {
    /// Identifier referenced by the position index.
    #[serde(deserialize_with = "tile_id_from_any")]
    pub tile_id: String,
    /// Questions keyed by an arbitrary label.
    pub questions: BTreeMap<String, QuestionDetail>,
}

impl LocationTile {
    /// All questions in key order.
    pub fn question_list(&self) -> Vec<&QuestionDetail> {
        self.questions.values().collect()
    }
}

/// Tile whose only content is a fixed drawback text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecialTile {
    /// Identifier referenced by the position index.
    #[serde(deserialize_with = "tile_id_from_any")]
    pub tile_id: String,
    /// Text shown as the tile's content.
    pub drawback: String,
}

/// Entry found by [`TileCatalog::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry<'a> {
    /// Trivia tile.
    Location(&'a LocationTile),
    /// Fixed-text tile.
    Special(&'a SpecialTile),
}

/// Read-only catalog of every tile with content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TileCatalog {
    #[serde(default)]
    locale_tiles: Vec<LocationTile>,
    #[serde(default)]
    special_tiles: Vec<SpecialTile>,
}

impl TileCatalog {
    /// Build and validate a catalog.
    pub fn new(
        locale_tiles: Vec<LocationTile>,
        special_tiles: Vec<SpecialTile>,
    ) -> Result<Self, DataError> {
        let catalog = Self {
            locale_tiles,
            special_tiles,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse `questions.json` content.
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let catalog: Self = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Location tiles in file order.
    pub fn location_tiles(&self) -> &[LocationTile] {
        &self.locale_tiles
    }

    /// Special tiles in file order.
    pub fn special_tiles(&self) -> &[SpecialTile] {
        &self.special_tiles
    }

    /// Find a tile, preferring location tiles over special tiles.
    pub fn lookup(&self, tile_id: &str) -> Option<CatalogEntry<'_>> {
        if let Some(tile) = self.locale_tiles.iter().find(|tile| tile.tile_id == tile_id) {
            return Some(CatalogEntry::Location(tile));
        }
        self.special_tiles
            .iter()
            .find(|tile| tile.tile_id == tile_id)
            .map(CatalogEntry::Special)
    }

    fn validate(&self) -> Result<(), DataError> {
        // Ids may repeat across the two lists; location tiles win on lookup.
        let mut seen = HashSet::new();
        for tile in &self.locale_tiles {
            check_id(&tile.tile_id)?;
            if !seen.insert(tile.tile_id.as_str()) {
                return Err(DataError::DuplicateTile(tile.tile_id.clone()));
            }
            if tile.questions.is_empty() {
                return Err(DataError::EmptyQuestions(tile.tile_id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for tile in &self.special_tiles {
            check_id(&tile.tile_id)?;
            if !seen.insert(tile.tile_id.as_str()) {
                return Err(DataError::DuplicateTile(tile.tile_id.clone()));
            }
        }
        Ok(())
    }
}

fn check_id(tile_id: &str) -> Result<(), DataError> {
    if tile_id.trim().is_empty() {
        Err(DataError::BlankTileId)
    } else {
        Ok(())
    }
}

/// Accept a tile id written as either a JSON string or a number.
pub(crate) fn tile_id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text.trim().to_string(),
        RawId::Number(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "locale_tiles": [
            {"tile_id": 3, "questions": {
                "a": {"question": "Q1", "answer": "A1", "bonus": "B1", "drawback": null},
                "b": {"question": "Q2", "answer": "A2", "bonus": null, "drawback": "D2"}
            }},
            {"tile_id": "7", "questions": {"only": {"question": "Q7", "answer": "A7"}}}
        ],
        "special_tiles": [
            {"tile_id": "9", "drawback": "Volte duas casas"},
            {"tile_id": "3", "drawback": "shadowed"}
        ]
    }"#;

    #[test]
    fn parses_numeric_and_text_ids() -> anyhow::Result<()> {
        let catalog = TileCatalog::from_json(SAMPLE)?;
        assert_eq!(catalog.location_tiles().len(), 2);
        assert_eq!(catalog.location_tiles()[0].tile_id, "3");
        assert_eq!(catalog.location_tiles()[0].question_list().len(), 2);
        assert_eq!(catalog.special_tiles()[0].tile_id, "9");
        Ok(())
    }

    #[test]
    fn location_tiles_take_precedence() -> anyhow::Result<()> {
        let catalog = TileCatalog::from_json(SAMPLE)?;
        assert!(matches!(
            catalog.lookup("3"),
            Some(CatalogEntry::Location(tile)) if tile.tile_id == "3"
        ));
        assert!(matches!(
            catalog.lookup("9"),
            Some(CatalogEntry::Special(tile)) if tile.drawback == "Volte duas casas"
        ));
        assert!(catalog.lookup("42").is_none());
        assert!(catalog.lookup("N").is_none());
        Ok(())
    }

    #[test]
    fn special_tiles_are_optional() -> anyhow::Result<()> {
        let catalog = TileCatalog::from_json(
            r#"{"locale_tiles": [{"tile_id": "1", "questions": {"x": {"question": "Q"}}}]}"#,
        )?;
        assert!(catalog.special_tiles().is_empty());
        Ok(())
    }

    #[test]
    fn rejects_location_tile_without_questions() {
        let err = TileCatalog::new(
            vec![LocationTile {
                tile_id: "1".to_string(),
                questions: BTreeMap::new(),
            }],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, DataError::EmptyQuestions("1".to_string()));
    }

    #[test]
    fn rejects_duplicate_ids_within_a_list() {
        let special = |id: &str| SpecialTile {
            tile_id: id.to_string(),
            drawback: "x".to_string(),
        };
        let err = TileCatalog::new(Vec::new(), vec![special("9"), special("9")]).unwrap_err();
        assert_eq!(err, DataError::DuplicateTile("9".to_string()));

        let err = TileCatalog::new(Vec::new(), vec![special("  ")]).unwrap_err();
        assert_eq!(err, DataError::BlankTileId);
    }
}
