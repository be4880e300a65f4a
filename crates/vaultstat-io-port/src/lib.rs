//! # vaultstat-io-port
//!
//! **Tier 1 (Ports)**
//!
//! Host-abstracted access to a vault. The core never touches the filesystem
//! directly; it goes through [`Vault`].

mod memory;

use async_trait::async_trait;
use thiserror::Error;
use vaultstat_types::{DocumentKind, ParsedStructure};

pub use memory::MemoryVault;

/// Errors a [`Vault`] implementation can report.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("failed to read {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{key} is not valid UTF-8")]
    Encoding { key: String },

    #[error("structure unavailable for {key}: {message}")]
    Structure { key: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}

/// A live file in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub key: String,
    pub size: u64,
}

impl FileHandle {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_key(&self.key)
    }
}

/// The host side of the engine: corpus enumeration, content and structure.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Every key currently in the vault.
    async fn list(&self) -> Result<Vec<String>, VaultError>;

    /// Keys below the directory `dir`; empty when `dir` is not a directory.
    async fn list_under(&self, dir: &str) -> Result<Vec<String>, VaultError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let mut keys = self.list().await?;
        keys.retain(|key| key.starts_with(&prefix));
        Ok(keys)
    }

    /// Resolve a key to a live file, or `None` when nothing exists there.
    async fn resolve(&self, key: &str) -> Result<Option<FileHandle>, VaultError>;

    /// Raw text content of a file.
    async fn read(&self, file: &FileHandle) -> Result<String, VaultError>;

    /// Parsed structure of a document, or `None` when it is not (yet) known.
    async fn file_cache(&self, file: &FileHandle) -> Result<Option<ParsedStructure>, VaultError>;
}
