//! Centralized error type for the alkemix umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use crate::source::FetchError;
use alkemix_export::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Source bytes could not be obtained.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Core(#[from] alkemix_core::Error),

    #[error("Export: {0}")]
    Export(#[from] ExportError),
}

impl Error {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch(_))
    }

    /// The bytes were fetched but are not usable audio.
    pub fn is_decode(&self) -> bool {
        matches!(
            self.core(),
            Some(alkemix_core::Error::Decode(_))
        )
    }

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(
            self.core(),
            Some(alkemix_core::Error::BackendUnavailable(_))
        )
    }

    fn core(&self) -> Option<&alkemix_core::Error> {
        match self {
            Error::Core(e) | Error::Export(ExportError::Core(e)) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
