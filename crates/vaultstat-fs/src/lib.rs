//! # vaultstat-fs
//!
//! **Tier 2 (Adapters)**
//!
//! A [`Vault`] over a directory on disk.
//!
//! ## What belongs here
//! * Vault listing with ignore-file support
//! * Key to path mapping
//! * Markdown structure extraction
//!
//! ## What does NOT belong here
//! * Counting and aggregation (use vaultstat-collect / vaultstat-engine)
//! * Change watching (the CLI owns the watcher)

mod markdown;

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ignore::WalkBuilder;
use vaultstat_io_port::{FileHandle, Vault, VaultError};
use vaultstat_path::{normalize_key, segments};
use vaultstat_types::{DocumentKind, ParsedStructure};

pub use markdown::parse_structure;

/// List every file under `root` as a sorted vault key.
///
/// Hidden entries are skipped, as are paths matched by ignore files.
pub fn list_keys(root: &Path) -> Result<Vec<String>> {
    list_keys_under(root, root)
}

/// Like [`list_keys`], restricted to the directory `start` inside `root`.
/// Keys stay relative to `root`.
pub fn list_keys_under(root: &Path, start: &Path) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut builder = WalkBuilder::new(start);
    builder.hidden(true);
    builder.git_global(false);
    builder.require_git(false);
    builder.follow_links(false);

    for entry in builder.build() {
        let entry = entry.with_context(|| format!("walking {}", start.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if let Some(key) = key_for(root, entry.path()) {
            keys.push(key);
        }
    }

    keys.sort();
    Ok(keys)
}

/// The vault key of `path`, or `None` when it is outside `root` or not UTF-8.
#[must_use]
pub fn key_for(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let key = normalize_key(rel.to_str()?);
    (!key.is_empty()).then_some(key)
}

/// A vault rooted at a directory.
///
/// The text a structure was parsed from is kept until the next [`Vault::read`]
/// of that key, so words are counted against the same content the regions
/// describe.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
    parsed: Mutex<HashMap<String, String>>,
}

impl FsVault {
    /// Open the directory at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .with_context(|| format!("vault root {} not found", root.display()))?;
        anyhow::ensure!(root.is_dir(), "vault root {} is not a directory", root.display());
        Ok(Self::at(root))
    }

    fn at(root: PathBuf) -> Self {
        Self {
            root,
            parsed: Mutex::new(HashMap::new()),
        }
    }

    fn parsed(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.parsed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The vault key of an absolute path inside the root.
    #[must_use]
    pub fn key_for(&self, path: &Path) -> Option<String> {
        key_for(&self.root, path)
    }

    /// The path of `key`, or `None` for keys that would escape the root or
    /// that [`list_keys`] never yields (hidden segments).
    #[must_use]
    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for seg in segments(key) {
            if seg.starts_with('.') {
                return None;
            }
            path.push(seg);
        }
        (path != self.root).then_some(path)
    }

    async fn read_text(&self, key: &str) -> Result<String, VaultError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| VaultError::io(key, ErrorKind::NotFound.into()))?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::InvalidData => Err(VaultError::Encoding {
                key: key.to_string(),
            }),
            Err(err) => Err(VaultError::io(key, err)),
        }
    }
}

#[async_trait]
impl Vault for FsVault {
    async fn list(&self) -> Result<Vec<String>, VaultError> {
        let root = self.root.clone();
        let listed = tokio::task::spawn_blocking(move || list_keys(&root))
            .await
            .map_err(|err| VaultError::Other(format!("listing task failed: {err}")))?;
        listed.map_err(|err| VaultError::Other(format!("{err:#}")))
    }

    async fn list_under(&self, dir: &str) -> Result<Vec<String>, VaultError> {
        let Some(start) = self.path_for(dir) else {
            return Ok(Vec::new());
        };
        match tokio::fs::metadata(&start).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(Vec::new()),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(VaultError::io(dir, err)),
        }
        let root = self.root.clone();
        let listed = tokio::task::spawn_blocking(move || list_keys_under(&root, &start))
            .await
            .map_err(|err| VaultError::Other(format!("listing task failed: {err}")))?;
        listed.map_err(|err| VaultError::Other(format!("{err:#}")))
    }

    async fn resolve(&self, key: &str) -> Result<Option<FileHandle>, VaultError> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(FileHandle::new(key, meta.len()))),
            Ok(_) => Ok(None),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(VaultError::io(key, err)),
        }
    }

    async fn read(&self, file: &FileHandle) -> Result<String, VaultError> {
        if let Some(text) = self.parsed().remove(&file.key) {
            return Ok(text);
        }
        self.read_text(&file.key).await
    }

    async fn file_cache(&self, file: &FileHandle) -> Result<Option<ParsedStructure>, VaultError> {
        if file.kind() != DocumentKind::Document {
            return Ok(None);
        }
        match self.read_text(&file.key).await {
            Ok(text) => {
                let structure = parse_structure(&text);
                self.parsed().insert(file.key.clone(), text);
                Ok(Some(structure))
            }
            Err(VaultError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
