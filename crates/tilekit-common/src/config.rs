//! Layered configuration for tilekit scenarios.
//!
//! Loads [`TileKitConfig`] from a TOML file (`tilekit.toml`) with environment
//! variable overrides via `TILEKIT_*` prefixed variables. The resulting value
//! is passed explicitly to every planner; nothing in the library reads the
//! environment on its own.

use crate::types::{ChipArchitecture, DestAccumulation, DestSync};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tile row counts the hardware can address.
const VALID_TILE_ROWS: &[usize] = &[1, 2, 4, 8, 16, 32];

/// Tile column counts the hardware can address.
const VALID_TILE_COLS: &[usize] = &[16, 32];

/// Scenario configuration loaded from TOML with environment variable overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileKitConfig {
    /// Target chip architecture.
    /// Override: `TILEKIT_ARCH`
    pub arch: ChipArchitecture,

    /// Rows per tile.
    /// Override: `TILEKIT_TILE_ROWS`
    pub tile_rows: usize,

    /// Columns per tile.
    /// Override: `TILEKIT_TILE_COLS`
    pub tile_cols: usize,

    /// Dest register synchronisation mode.
    /// Override: `TILEKIT_DEST_SYNC`
    pub dest_sync: DestSync,

    /// 32-bit dest accumulation.
    /// Override: `TILEKIT_DEST_ACC`
    pub dest_acc: DestAccumulation,

    /// Tiles of 16-bit datums per bank in full sync mode.
    /// Override: `TILEKIT_DEST_TILES_PER_BANK`
    pub dest_tiles_per_bank: usize,
}

impl Default for TileKitConfig {
    fn default() -> Self {
        Self {
            arch: ChipArchitecture::Wormhole,
            tile_rows: 32,
            tile_cols: 32,
            dest_sync: DestSync::Half,
            dest_acc: DestAccumulation::No,
            dest_tiles_per_bank: 8,
        }
    }
}

/// Errors that can occur when loading or validating a [`TileKitConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid environment override {key}={value}: {reason}")]
    EnvOverride { key: String, value: String, reason: String },
}

impl TileKitConfig {
    /// Generate a default configuration TOML string.
    pub fn default_toml() -> String {
        let cfg = Self::default();
        toml::to_string_pretty(&cfg).expect("default config should serialize")
    }

    /// Load configuration from a TOML file, then apply environment variable
    /// overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut cfg: TileKitConfig = toml::from_str(toml_str)?;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load only from environment variables, starting from defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the configuration, returning an error with a descriptive
    /// message on failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_TILE_ROWS.contains(&self.tile_rows) {
            return Err(ConfigError::Validation(format!(
                "tile_rows must be one of {VALID_TILE_ROWS:?}, got {}",
                self.tile_rows
            )));
        }
        if !VALID_TILE_COLS.contains(&self.tile_cols) {
            return Err(ConfigError::Validation(format!(
                "tile_cols must be one of {VALID_TILE_COLS:?}, got {}",
                self.tile_cols
            )));
        }
        if self.dest_tiles_per_bank == 0 {
            return Err(ConfigError::Validation("dest_tiles_per_bank must be > 0".into()));
        }
        if !self.dest_tiles_per_bank.is_power_of_two() {
            return Err(ConfigError::Validation(format!(
                "dest_tiles_per_bank must be a power of two, got {}",
                self.dest_tiles_per_bank
            )));
        }
        // Halved once for 32-bit datums and once for half sync.
        if self.dest_tiles_per_bank < 4 {
            return Err(ConfigError::Validation(format!(
                "dest_tiles_per_bank must be >= 4, got {}",
                self.dest_tiles_per_bank
            )));
        }
        if self.dest_tiles_per_bank > 16 {
            return Err(ConfigError::Validation(format!(
                "dest_tiles_per_bank must be <= 16, got {}",
                self.dest_tiles_per_bank
            )));
        }
        Ok(())
    }

    /// Apply `TILEKIT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("TILEKIT_ARCH") {
            self.arch = val.parse::<ChipArchitecture>().map_err(|reason| {
                ConfigError::EnvOverride { key: "TILEKIT_ARCH".into(), value: val.clone(), reason }
            })?;
        }

        if let Ok(val) = std::env::var("TILEKIT_TILE_ROWS") {
            self.tile_rows = val.parse::<usize>().map_err(|e| ConfigError::EnvOverride {
                key: "TILEKIT_TILE_ROWS".into(),
                value: val.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Ok(val) = std::env::var("TILEKIT_TILE_COLS") {
            self.tile_cols = val.parse::<usize>().map_err(|e| ConfigError::EnvOverride {
                key: "TILEKIT_TILE_COLS".into(),
                value: val.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Ok(val) = std::env::var("TILEKIT_DEST_SYNC") {
            self.dest_sync = val.parse::<DestSync>().map_err(|reason| ConfigError::EnvOverride {
                key: "TILEKIT_DEST_SYNC".into(),
                value: val.clone(),
                reason,
            })?;
        }

        if let Ok(val) = std::env::var("TILEKIT_DEST_ACC") {
            self.dest_acc =
                val.parse::<DestAccumulation>().map_err(|reason| ConfigError::EnvOverride {
                    key: "TILEKIT_DEST_ACC".into(),
                    value: val.clone(),
                    reason,
                })?;
        }

        if let Ok(val) = std::env::var("TILEKIT_DEST_TILES_PER_BANK") {
            self.dest_tiles_per_bank =
                val.parse::<usize>().map_err(|e| ConfigError::EnvOverride {
                    key: "TILEKIT_DEST_TILES_PER_BANK".into(),
                    value: val.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }
}
