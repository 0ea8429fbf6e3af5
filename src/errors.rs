//! Error types surfaced to the host

use crate::signature::ParamKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure signalled by a native method; passed through untouched
pub type NativeError = anyhow::Error;

/// Result type returned by bound native targets
pub type NativeResult<T> = Result<T, NativeError>;

/// Errors raised while registering or invoking a primitive
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{primitive}: wrong number of arguments: expected {expected}, got {got}")]
    ArityMismatch {
        primitive: String,
        expected: usize,
        got: usize,
    },

    #[error("{primitive}: wrong type argument in position {position}: expected {expected}, found {found}")]
    ArgumentTypeMismatch {
        primitive: String,
        /// 1-based argument index
        position: usize,
        expected: ParamKind,
        found: String,
    },

    #[error("unbound primitive: {module}/{name}")]
    UnknownBinding { module: String, name: String },

    #[error("primitive {module}/{name} is already registered")]
    NameCollision { module: String, name: String },

    #[error("{primitive}: result {value} does not fit a host integer")]
    ResultOutOfRange { primitive: String, value: u64 },

    #[error(transparent)]
    Native(#[from] NativeError),
}

impl BridgeError {
    /// Argument position for type errors
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::ArgumentTypeMismatch { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Errors loading bridge configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
