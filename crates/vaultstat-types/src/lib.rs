//! # vaultstat-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures and contracts for `vaultstat`.
//! It contains only data types, Serde definitions, and the field-wise
//! arithmetic the aggregation engine relies on.
//!
//! ## What belongs here
//! * Metrics records (per file and aggregate)
//! * Parsed document structure handed over by a structure provider
//! * Change notifications and shared enums
//!
//! ## What does NOT belong here
//! * File I/O
//! * Tokenization
//! * Scheduling and queueing

use serde::{Deserialize, Serialize};

/// The current schema version for JSON output.
pub const SCHEMA_VERSION: u32 = 1;

/// Whether a file contributes prose statistics or only its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A markdown note (`.md`, any case).
    Document,
    /// Any other file stored in the vault.
    Attachment,
}

impl DocumentKind {
    /// Classify a file by its extension.
    #[must_use]
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some(ext) if ext.eq_ignore_ascii_case("md") => Self::Document,
            _ => Self::Attachment,
        }
    }

    /// Classify a vault key by the extension of its file name.
    ///
    /// ```
    /// use vaultstat_types::DocumentKind;
    ///
    /// assert_eq!(DocumentKind::from_key("notes/Plan.MD"), DocumentKind::Document);
    /// assert_eq!(DocumentKind::from_key("img/photo.png"), DocumentKind::Attachment);
    /// assert_eq!(DocumentKind::from_key("README"), DocumentKind::Attachment);
    /// ```
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        Self::from_extension(vaultstat_path::extension(key))
    }
}

/// Statistics for a single file.
///
/// Exactly one of `documents` / `attachments` is 1 for a real file; the
/// all-zero record stands in for "nothing recorded yet".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub files: u64,
    pub documents: u64,
    pub attachments: u64,
    pub size_bytes: u64,
    pub link_count: u64,
    pub word_count: u64,
    pub tag_count: u64,
    pub quality: f64,
}

impl MetricsRecord {
    /// A markdown note. Quality is links per note, so it equals `link_count`.
    #[must_use]
    pub fn document(size_bytes: u64, link_count: u64, word_count: u64, tag_count: u64) -> Self {
        Self {
            files: 1,
            documents: 1,
            attachments: 0,
            size_bytes,
            link_count,
            word_count,
            tag_count,
            quality: link_count as f64,
        }
    }

    /// A non-markdown file: only its size counts.
    #[must_use]
    pub fn attachment(size_bytes: u64) -> Self {
        Self {
            files: 1,
            attachments: 1,
            size_bytes,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<DocumentKind> {
        match (self.documents, self.attachments) {
            (0, 0) => None,
            (0, _) => Some(DocumentKind::Attachment),
            _ => Some(DocumentKind::Document),
        }
    }
}

/// Running totals over every recorded file.
///
/// Counters are sums; `quality` is always recomputed from the sums as
/// `link_count / documents` (0.0 with no documents).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub files: u64,
    pub documents: u64,
    pub attachments: u64,
    pub size_bytes: u64,
    pub link_count: u64,
    pub word_count: u64,
    pub tag_count: u64,
    pub quality: f64,
}

impl AggregateRecord {
    /// Field-wise sum of `records`.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MetricsRecord>,
    {
        let mut total = Self::default();
        for record in records {
            total.add(record);
        }
        total
    }

    pub fn add(&mut self, record: &MetricsRecord) {
        self.files += record.files;
        self.documents += record.documents;
        self.attachments += record.attachments;
        self.size_bytes += record.size_bytes;
        self.link_count += record.link_count;
        self.word_count += record.word_count;
        self.tag_count += record.tag_count;
        self.recompute_quality();
    }

    pub fn subtract(&mut self, record: &MetricsRecord) {
        self.files = self.files.saturating_sub(record.files);
        self.documents = self.documents.saturating_sub(record.documents);
        self.attachments = self.attachments.saturating_sub(record.attachments);
        self.size_bytes = self.size_bytes.saturating_sub(record.size_bytes);
        self.link_count = self.link_count.saturating_sub(record.link_count);
        self.word_count = self.word_count.saturating_sub(record.word_count);
        self.tag_count = self.tag_count.saturating_sub(record.tag_count);
        self.recompute_quality();
    }

    fn recompute_quality(&mut self) {
        self.quality = if self.documents == 0 {
            0.0
        } else {
            self.link_count as f64 / self.documents as f64
        };
    }
}

/// A typed byte range of a document's raw text, as reported by a structure
/// provider. `kind` is the provider's tag (`paragraph`, `code`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub kind: String,
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(kind: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind: kind.into(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub tag: String,
}

/// Everything a structure provider extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStructure {
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub links: Vec<LinkRef>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
}

/// A change notification from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    Created { key: String },
    Modified { key: String },
    Deleted { key: String },
    /// The structure provider finished (re)parsing a document.
    Resolved { key: String },
    Renamed { from: String, to: String },
}

impl ChangeEvent {
    /// Keys that must be recomputed for this event. A rename touches both.
    ///
    /// ```
    /// use vaultstat_types::ChangeEvent;
    ///
    /// let ev = ChangeEvent::Renamed { from: "a.md".into(), to: "b.md".into() };
    /// assert_eq!(ev.keys(), vec!["b.md", "a.md"]);
    /// ```
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Created { key }
            | Self::Modified { key }
            | Self::Deleted { key }
            | Self::Resolved { key } => vec![key.as_str()],
            Self::Renamed { from, to } => vec![to.as_str(), from.as_str()],
        }
    }
}

/// What to do with a stored record whose file is gone or unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum DeletionPolicy {
    /// Subtract the stale record and forget the key.
    #[default]
    Retract,
    /// Leave the stale record in place until the key is collected again.
    Retain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Markdown table.
    #[default]
    Md,
    /// JSON (compact).
    Json,
}
