//! Error taxonomy for the miner.
//!
//! Every fatal condition unwinds to [`GenerationCoordinator::run`], which
//! records the failure and stops. Replay inconsistencies are not errors:
//! the evaluator logs and clamps them.
//!
//! [`GenerationCoordinator::run`]: crate::pipeline::GenerationCoordinator::run

use std::path::{Path, PathBuf};

/// Errors that can occur while mining.
#[derive(Debug, thiserror::Error)]
pub enum MinerError {
    #[error("ConfigurationError: {0}")]
    Configuration(String),
    #[error("IOError: path={path}, {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("LogFormatError: {0}")]
    LogFormat(String),
    #[error("SerializationError: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("PartialGenerationError: generation={generation}, written={written}, expected={expected}")]
    PartialGeneration {
        generation: usize,
        written: usize,
        expected: usize,
    },
    #[error("BuilderContractError: expected={expected}, actual={actual}")]
    BuilderContract { expected: usize, actual: usize },
    #[error("Cancelled: generation={0}")]
    Cancelled(usize),
}

impl MinerError {
    /// Wraps an I/O error together with the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinerError>;
