// settings.rs - Persisted generation settings

use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dungeon::GenerateOptions;
use crate::error_handling::Result;
use crate::types::{Seed, StrategyType};

pub const DEFAULT_SEED: Seed = 1974;
pub const DEFAULT_MAX_ROOMS: usize = 50;

/// What the next regeneration should use. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DungeonSettings {
    pub seed: Seed,
    pub strategy: StrategyType,
    pub max_rooms: usize,
}

impl Default for DungeonSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            strategy: StrategyType::Random,
            max_rooms: DEFAULT_MAX_ROOMS,
        }
    }
}

impl DungeonSettings {
    /// Read settings from `path`; a missing file yields the defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let settings = serde_json::from_str(&contents)?;
                debug!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Generation options for a fresh dungeon. The builder allows two
    /// attempts per room once the room count has been validated.
    pub fn generate_options(&self) -> Result<GenerateOptions> {
        GenerateOptions::builder()
            .seed(self.seed)
            .strategy(self.strategy)
            .max_rooms(self.max_rooms)
            .build()
    }
}
