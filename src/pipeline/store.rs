//! Persistence of audit documents.

use crate::config::OutputConfig;
use crate::error::{NotetakerError, Result};
use crate::pipeline::audit::AuditDocument;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

/// Destination for finished audit documents.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Store `document` under `filename`, returning where it went.
    async fn persist(&self, document: &AuditDocument, filename: &str) -> Result<PathBuf>;
}

/// Writes each document as JSON into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    directory: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pretty: true,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            pretty: config.pretty,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resolve `filename` inside the store directory.
    ///
    /// Only a bare file name is accepted, so documents never land outside it.
    pub fn target_path(&self, filename: &str) -> Result<PathBuf> {
        let name = Path::new(filename);
        let mut components = name.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.directory.join(name)),
            _ => Err(NotetakerError::Persistence {
                path: filename.to_string(),
                message: "output filename must be a plain file name".to_string(),
            }),
        }
    }

    fn encode(&self, document: &AuditDocument) -> Result<Vec<u8>> {
        if !self.pretty {
            return Ok(serde_json::to_vec(document)?);
        }
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        document.serialize(&mut serializer)?;
        Ok(buffer)
    }
}

#[async_trait]
impl AuditStore for JsonFileStore {
    async fn persist(&self, document: &AuditDocument, filename: &str) -> Result<PathBuf> {
        let path = self.target_path(filename)?;
        let bytes = self.encode(document)?;
        let persistence_error = |e: std::io::Error| NotetakerError::Persistence {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(persistence_error)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(persistence_error)?;

        Ok(path)
    }
}

/// Keeps documents in memory. For tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<(String, AuditDocument)>>,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every persist call fails.
    pub fn failing() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Stored (filename, document) pairs in persist order.
    pub fn documents(&self) -> Vec<(String, AuditDocument)> {
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn persist(&self, document: &AuditDocument, filename: &str) -> Result<PathBuf> {
        if self.fail {
            return Err(NotetakerError::Persistence {
                path: filename.to_string(),
                message: "memory store configured to fail".to_string(),
            });
        }
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((filename.to_string(), document.clone()));
        Ok(PathBuf::from(filename))
    }
}
