//! Error types for the grid model, the search engine and the terminal shell.
//!
//! An unreachable goal and a cancelled run are not errors: they are reported through
//! [SearchOutcome](crate::search::SearchOutcome).

use std::path::PathBuf;

use thiserror::Error;

/// Failures constructing or parsing a [PathingGrid](crate::pathing_grid::PathingGrid).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row")]
    EmptyGrid,

    #[error("grid of {rows} rows exceeds the maximum of {max}")]
    TooLarge { rows: usize, max: usize },

    #[error("invalid grid text at row {row}: {reason}")]
    Parse { row: usize, reason: String },
}

/// Requests the search engine refuses to start.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("no start cell has been placed")]
    MissingStart,

    #[error("no end cell has been placed")]
    MissingEnd,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] GridError),
}
