//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: sugarscape_core::config::ConfigError,
    },

    /// The capacity map file could not be read.
    #[error("failed to read capacity map {}: {source}", path.display())]
    MapIo {
        /// The map file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The capacity map was malformed or landscape construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: sugarscape_world::WorldError,
    },

    /// Building the initial population failed.
    #[error("spawn error: {source}")]
    Spawn {
        /// The underlying spawn error.
        #[from]
        source: sugarscape_core::spawn::SpawnError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: sugarscape_core::runner::RunnerError,
    },

    /// Writing reports failed.
    #[error("report output error: {source}")]
    Report {
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
