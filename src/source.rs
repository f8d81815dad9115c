//! Where track bytes come from.
//!
//! The mixer never reads files or sockets itself; it asks a [`SourceSupplier`]
//! for the encoded bytes behind a [`SourceLocator`] exactly once, when the
//! track is added.

use alkemix_core::SourceLocator;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("Failed to read source {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: io::Error,
    },
}

/// Resolves a locator to encoded audio bytes.
pub trait SourceSupplier: Send {
    fn fetch(&self, locator: &SourceLocator) -> Result<Vec<u8>, FetchError>;
}

impl<F> SourceSupplier for F
where
    F: Fn(&SourceLocator) -> Result<Vec<u8>, FetchError> + Send,
{
    fn fetch(&self, locator: &SourceLocator) -> Result<Vec<u8>, FetchError> {
        self(locator)
    }
}

/// Reads locators as filesystem paths, optionally relative to a root.
#[derive(Debug, Clone, Default)]
pub struct FileSupplier {
    root: Option<PathBuf>,
}

impl FileSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locators against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, locator: &SourceLocator) -> PathBuf {
        let path = Path::new(locator.as_str());
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SourceSupplier for FileSupplier {
    fn fetch(&self, locator: &SourceLocator) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(locator);
        std::fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound(locator.to_string()),
            _ => FetchError::Io {
                locator: locator.to_string(),
                source: e,
            },
        })
    }
}

/// In-memory sources keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct MemorySupplier {
    sources: HashMap<String, Vec<u8>>,
}

impl MemorySupplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(locator, bytes);
        self
    }

    /// Returns the bytes previously stored under `locator`.
    pub fn insert(&mut self, locator: impl Into<String>, bytes: Vec<u8>) -> Option<Vec<u8>> {
        self.sources.insert(locator.into(), bytes)
    }

    pub fn remove(&mut self, locator: &str) -> Option<Vec<u8>> {
        self.sources.remove(locator)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SourceSupplier for MemorySupplier {
    fn fetch(&self, locator: &SourceLocator) -> Result<Vec<u8>, FetchError> {
        self.sources
            .get(locator.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(locator.to_string()))
    }
}
