use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that are not gameplay outcomes.
///
/// Collisions and timer deaths are reported through
/// [`TickOutcome`](crate::game::TickOutcome), never through this type.
#[derive(Debug, Error)]
pub enum GameError {
    /// No cell outside the snake is left for a new consumable.
    #[error("board saturated: no free cell left on the {width}x{height} grid")]
    BoardSaturated { width: u16, height: u16 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] GameError),
}
