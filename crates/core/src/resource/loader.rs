use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    board::{Illustrations, PositionIndex},
    catalog::TileCatalog,
    resolver::{TilePolicy, TileResolver},
};

/// Trivia content file name.
pub const QUESTIONS_FILE: &str = "questions.json";
/// Position mapping file name.
pub const POSITIONS_FILE: &str = "tile-position.json";
/// Tile artwork file name.
pub const ILLUSTRATIONS_FILE: &str = "illustrations.json";

const BUNDLED_QUESTIONS: &str = include_str!("../../data/questions.json");
const BUNDLED_POSITIONS: &str = include_str!("../../data/tile-position.json");
const BUNDLED_ILLUSTRATIONS: &str = include_str!("../../data/illustrations.json");

/// Where a data file was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Copy compiled into the binary.
    Bundled,
    /// File inside the configured data directory.
    File(PathBuf),
}

/// Everything read once at startup.
#[derive(Debug, Clone)]
pub struct BoardData {
    /// Tile content.
    pub catalog: TileCatalog,
    /// Position to tile mapping.
    pub index: PositionIndex,
    /// Tile artwork labels.
    pub illustrations: Illustrations,
}

impl BoardData {
    /// Split into a resolver using `policy` and the artwork labels.
    pub fn into_parts(self, policy: TilePolicy) -> (TileResolver, Illustrations) {
        (
            TileResolver::new(self.index, self.catalog, policy),
            self.illustrations,
        )
    }
}

/// Reads board data from a directory, falling back to the bundled copies.
#[derive(Debug, Clone, Default)]
pub struct ResourceLoader {
    data_dir: Option<PathBuf>,
}

impl ResourceLoader {
    /// Loader for an optional data directory.
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self { data_dir }
    }

    /// Loader that only uses the bundled data.
    pub fn bundled() -> Self {
        Self::default()
    }

    /// Configured data directory.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Read and validate all board files.
    pub fn load(&self) -> Result<BoardData> {
        let (content, source) = self.read(QUESTIONS_FILE, BUNDLED_QUESTIONS)?;
        let catalog = TileCatalog::from_json(&content)
            .with_context(|| format!("failed to parse {QUESTIONS_FILE} from {source:?}"))?;

        let (content, source) = self.read(POSITIONS_FILE, BUNDLED_POSITIONS)?;
        let index = PositionIndex::from_json(&content)
            .with_context(|| format!("failed to parse {POSITIONS_FILE} from {source:?}"))?;

        let (content, source) = self.read(ILLUSTRATIONS_FILE, BUNDLED_ILLUSTRATIONS)?;
        let illustrations = Illustrations::from_json(&content)
            .with_context(|| format!("failed to parse {ILLUSTRATIONS_FILE} from {source:?}"))?;

        info!(
            location_tiles = catalog.location_tiles().len(),
            special_tiles = catalog.special_tiles().len(),
            "Board data loaded"
        );
        Ok(BoardData {
            catalog,
            index,
            illustrations,
        })
    }

    fn read(&self, name: &str, bundled: &'static str) -> Result<(String, DataSource)> {
        let Some(dir) = self.data_dir.as_ref() else {
            return Ok((bundled.to_string(), DataSource::Bundled));
        };
        let path = dir.join(name);
        if !path.is_file() {
            warn!("Using bundled {}, not found in {}", name, dir.display());
            return Ok((bundled.to_string(), DataSource::Bundled));
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok((content, DataSource::File(path)))
    }
}
