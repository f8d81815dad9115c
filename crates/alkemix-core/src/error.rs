//! Error types for alkemix-core.

use crate::graph::SourceId;
use thiserror::Error;

/// Error type for alkemix-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Bytes could not be interpreted as audio.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The render backend could not be constructed or resumed.
    #[error("Audio backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A graph handle that no longer (or never) existed.
    #[error("Unknown graph node: {0}")]
    UnknownNode(String),

    /// Source nodes are single-use.
    #[error("Source {0} was already started")]
    SourceAlreadyStarted(SourceId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "cpal")]
impl From<cpal::DefaultStreamConfigError> for Error {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        Error::BackendUnavailable(e.to_string())
    }
}

#[cfg(feature = "cpal")]
impl From<cpal::BuildStreamError> for Error {
    fn from(e: cpal::BuildStreamError) -> Self {
        Error::BackendUnavailable(e.to_string())
    }
}

#[cfg(feature = "cpal")]
impl From<cpal::PlayStreamError> for Error {
    fn from(e: cpal::PlayStreamError) -> Self {
        Error::BackendUnavailable(e.to_string())
    }
}

#[cfg(feature = "cpal")]
impl From<cpal::PauseStreamError> for Error {
    fn from(e: cpal::PauseStreamError) -> Self {
        Error::BackendUnavailable(e.to_string())
    }
}
