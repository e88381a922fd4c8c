use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{Player, Variant, CLASSIC_MAX_DIM, MAX_DIM};

/// Game settings chosen on the setup screen, loadable from TOML.
///
/// ```toml
/// rows = 8
/// cols = 8
/// variant = "void-expansion"
/// starting_player = "red"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: u8,
    pub cols: u8,
    pub variant: Variant,
    pub starting_player: Player,
    /// Upper bound for `rows` and `cols`.
    pub max_dim: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 6,
            cols: 6,
            variant: Variant::Normal,
            starting_player: Player::Blue,
            max_dim: MAX_DIM,
        }
    }
}

impl GameConfig {
    /// Default settings with the classic 10x10 size limit.
    pub fn classic() -> Self {
        GameConfig {
            max_dim: CLASSIC_MAX_DIM,
            ..Self::default()
        }
    }

    /// Default settings at the given size.
    pub fn with_size(rows: u8, cols: u8) -> Self {
        GameConfig {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dim == 0 || self.max_dim > MAX_DIM {
            return Err(ConfigError::MaxDim(self.max_dim));
        }
        for (name, value) in [("rows", self.rows), ("cols", self.cols)] {
            if value == 0 || value > self.max_dim {
                return Err(ConfigError::Dimension {
                    name,
                    value,
                    max: self.max_dim,
                });
            }
        }
        Ok(())
    }
}
