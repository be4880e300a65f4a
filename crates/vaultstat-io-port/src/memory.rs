use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use vaultstat_types::{LinkRef, ParsedStructure, Region, TagRef};

use crate::{FileHandle, Vault, VaultError};

#[derive(Debug, Clone, Default)]
struct Entry {
    content: String,
    size: u64,
    structure: Option<ParsedStructure>,
    fail_resolve: bool,
    fail_read: bool,
    fail_structure: bool,
}

/// An in-memory [`Vault`] with failure injection.
#[derive(Debug, Default)]
pub struct MemoryVault {
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a document with explicit structure.
    pub fn insert_document(
        &self,
        key: impl Into<String>,
        content: impl Into<String>,
        structure: Option<ParsedStructure>,
    ) {
        let content = content.into();
        let entry = Entry {
            size: content.len() as u64,
            content,
            structure,
            ..Entry::default()
        };
        self.entries().insert(key.into(), entry);
    }

    /// Insert a document whose whole text is one paragraph region.
    pub fn insert_note(&self, key: impl Into<String>, text: &str) {
        self.insert_note_with(key, text, 0, &[]);
    }

    /// Like [`insert_note`](Self::insert_note), with `links` link entries and
    /// the given tags.
    pub fn insert_note_with(&self, key: impl Into<String>, text: &str, links: usize, tags: &[&str]) {
        let structure = ParsedStructure {
            regions: vec![Region::new("paragraph", 0, text.len())],
            links: (0..links)
                .map(|i| LinkRef {
                    target: format!("link-{i}"),
                })
                .collect(),
            tags: tags
                .iter()
                .map(|tag| TagRef {
                    tag: (*tag).to_string(),
                })
                .collect(),
        };
        self.insert_document(key, text, Some(structure));
    }

    /// Insert or replace a binary file of `size` bytes.
    pub fn insert_attachment(&self, key: impl Into<String>, size: u64) {
        let entry = Entry {
            size,
            ..Entry::default()
        };
        self.entries().insert(key.into(), entry);
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    pub fn rename(&self, from: &str, to: impl Into<String>) -> bool {
        let mut entries = self.entries();
        match entries.remove(from) {
            Some(entry) => {
                entries.insert(to.into(), entry);
                true
            }
            None => false,
        }
    }

    /// Move every key below `from/` to the same place below `to/`. Returns how
    /// many keys moved.
    pub fn rename_dir(&self, from: &str, to: &str) -> usize {
        let prefix = format!("{from}/");
        let mut entries = self.entries();
        let moved: Vec<String> = entries
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        for key in &moved {
            if let Some(entry) = entries.remove(key) {
                entries.insert(format!("{to}/{}", &key[prefix.len()..]), entry);
            }
        }
        moved.len()
    }

    /// Make `resolve` fail for `key`.
    pub fn fail_resolve(&self, key: &str) {
        if let Some(entry) = self.entries().get_mut(key) {
            entry.fail_resolve = true;
        }
    }

    /// Make `read` fail for `key`.
    pub fn fail_read(&self, key: &str) {
        if let Some(entry) = self.entries().get_mut(key) {
            entry.fail_read = true;
        }
    }

    /// Make `file_cache` fail for `key`.
    pub fn fail_structure(&self, key: &str) {
        if let Some(entry) = self.entries().get_mut(key) {
            entry.fail_structure = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[async_trait]
impl Vault for MemoryVault {
    async fn list(&self) -> Result<Vec<String>, VaultError> {
        Ok(self.entries().keys().cloned().collect())
    }

    async fn resolve(&self, key: &str) -> Result<Option<FileHandle>, VaultError> {
        match self.entries().get(key) {
            Some(entry) if entry.fail_resolve => {
                Err(VaultError::Other(format!("injected resolve failure for {key}")))
            }
            Some(entry) => Ok(Some(FileHandle::new(key, entry.size))),
            None => Ok(None),
        }
    }

    async fn read(&self, file: &FileHandle) -> Result<String, VaultError> {
        match self.entries().get(&file.key) {
            Some(entry) if entry.fail_read => Err(VaultError::io(
                file.key.clone(),
                std::io::Error::other("injected read failure"),
            )),
            Some(entry) => Ok(entry.content.clone()),
            None => Err(VaultError::io(
                file.key.clone(),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )),
        }
    }

    async fn file_cache(&self, file: &FileHandle) -> Result<Option<ParsedStructure>, VaultError> {
        match self.entries().get(&file.key) {
            Some(entry) if entry.fail_structure => Err(VaultError::Structure {
                key: file.key.clone(),
                message: "injected structure failure".to_string(),
            }),
            Some(entry) => Ok(entry.structure.clone()),
            None => Ok(None),
        }
    }
}
