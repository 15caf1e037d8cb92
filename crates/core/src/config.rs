//! Application configuration layered from defaults, a TOML file and the environment.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{resolver::TilePolicy, resource::ResourceLoader};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "trilha";
/// Prefix for environment overrides, e.g. `TRILHA_SEED=7`.
pub const ENV_PREFIX: &str = "TRILHA";

const DEFAULT_CONFIG: &str = r#"# Trilha configuration

# Directory with questions.json, tile-position.json and illustrations.json.
# Files missing there fall back to the bundled board.
# data_dir = "/path/to/board"

# What the "N" tiles do: "event" opens a trick-or-treat draw, "quiet" opens nothing.
tile_policy = "event"

# Fixed seed for question and event draws.
# seed = 42
"#;

/// Runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory overriding the bundled board data.
    pub data_dir: Option<PathBuf>,
    /// Behaviour of `"N"` tiles.
    pub tile_policy: TilePolicy,
    /// Seed for the random source; entropy when unset.
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load from the default config file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from `path` (optional on disk) and the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .set_default("tile_policy", TilePolicy::default().to_string())?
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))?;
        info!(
            policy = %config.tile_policy,
            seeded = config.seed.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Data loader for the configured directory.
    pub fn resource_loader(&self) -> ResourceLoader {
        ResourceLoader::new(self.data_dir.clone())
    }
}

/// Location of `config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the commented default config when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_config_at(&config_path())
}

fn ensure_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_round_trips() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("nested").join("config.toml");
        ensure_config_at(&path)?;
        assert!(path.is_file());

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.tile_policy, TilePolicy::Event);
        assert!(config.data_dir.is_none());
        Ok(())
    }

    #[test]
    fn existing_file_is_left_alone() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "tile_policy = \"quiet\"\nseed = 7\n")?;
        ensure_config_at(&path)?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.tile_policy, TilePolicy::Quiet);
        assert_eq!(config.seed, Some(7));
        Ok(())
    }

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let temp = tempdir()?;
        let config = AppConfig::load_from(&temp.path().join("absent.toml"))?;
        assert_eq!(config.tile_policy, TilePolicy::Event);
        assert!(config.resource_loader().data_dir().is_none());
        Ok(())
    }

    #[test]
    fn rejects_unknown_policy() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "tile_policy = \"loud\"\n")?;
        assert!(AppConfig::load_from(&path).is_err());
        Ok(())
    }
}
