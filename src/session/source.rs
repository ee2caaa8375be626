//! Where a session gets its artifact from

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::SearchError;

/// Asynchronous provider of the serialized artifact.
///
/// Hosts plug in whatever transport they have (a static file, an HTTP
/// fetch, bytes embedded in the binary). The session only needs the bytes.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>, SearchError>;

    /// Short human-readable origin, used in log lines
    fn describe(&self) -> String;
}

/// Artifact read from the filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ArtifactSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, SearchError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| SearchError::Fetch(format!("{}: {}", self.path.display(), e)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Artifact already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }
}

#[async_trait]
impl ArtifactSource for MemorySource {
    async fn fetch(&self) -> Result<Vec<u8>, SearchError> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} bytes)", self.bytes.len())
    }
}
