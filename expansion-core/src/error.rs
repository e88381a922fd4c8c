use std::path::PathBuf;

use crate::{Phase, Player, Pos};

/// Reasons the engine refuses a command.
///
/// A rejected command never mutates the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("action requires the {expected} phase but the game is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("placement moves are only legal in the void-expansion variant")]
    PlacementDisabled,

    #[error("cell {pos} does not hold a {player} piece")]
    NotOwnCell { pos: Pos, player: Player },

    #[error("group at {0} has no empty neighbor to expand into")]
    NoFrontier(Pos),

    #[error("cell {0} is occupied")]
    Occupied(Pos),

    #[error("cell {pos} touches an existing {player} group")]
    NotIsolated { pos: Pos, player: Player },

    #[error("invalid board: {0}")]
    Config(String),
}

/// Errors that can occur when building or loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be between 1 and {max}, got {value}")]
    Dimension {
        name: &'static str,
        value: u8,
        max: u8,
    },

    #[error("dimension bound must be between 1 and {max}, got {0}", max = crate::MAX_DIM)]
    MaxDim(u8),

    #[error("board settings are locked during {0}")]
    Locked(Phase),

    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Errors from parsing cell keys and shared setup strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("malformed cell key {0:?}, expected \"row,col\"")]
    BadKey(String),

    #[error("unknown cell symbol {0:?}, expected 'B', 'R' or '*'")]
    BadSymbol(char),

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board must be 1-{max} by 1-{max}, got {rows}x{cols}", max = crate::MAX_DIM)]
    Dimensions { rows: usize, cols: usize },
}
