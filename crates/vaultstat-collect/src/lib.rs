//! # vaultstat-collect
//!
//! **Tier 2 (Collection)**
//!
//! Computes the [`MetricsRecord`] of a single file. Collection never fails
//! outright: every recoverable problem is logged and counted as zero, and the
//! only distinct outcome is "not found" (`None`).

use tracing::{debug, warn};
use vaultstat_io_port::{FileHandle, Vault};
use vaultstat_tokenize::{RegionKind, classify};
use vaultstat_types::{DocumentKind, MetricsRecord, Region};

/// Collect the metrics of `file`.
///
/// Returns `None` when `file` is a note whose structure is unavailable,
/// whether the provider answered "none" or failed.
pub async fn collect(vault: &dyn Vault, file: &FileHandle) -> Option<MetricsRecord> {
    match file.kind() {
        DocumentKind::Attachment => Some(MetricsRecord::attachment(file.size)),
        DocumentKind::Document => collect_document(vault, file).await,
    }
}

async fn collect_document(vault: &dyn Vault, file: &FileHandle) -> Option<MetricsRecord> {
    let structure = match vault.file_cache(file).await {
        Ok(Some(structure)) => structure,
        Ok(None) => {
            debug!(key = %file.key, "no structure available");
            return None;
        }
        Err(err) => {
            debug!(key = %file.key, error = %err, "structure provider failed");
            return None;
        }
    };

    let words = match vault.read(file).await {
        Ok(content) => word_count(&file.key, &content, &structure.regions),
        Err(err) => {
            warn!(key = %file.key, error = %err, "content unreadable, counting zero words");
            0
        }
    };

    Some(MetricsRecord::document(
        file.size,
        structure.links.len() as u64,
        words,
        structure.tags.len() as u64,
    ))
}

/// Sum of words over `regions` of `content`, each region tokenized by the
/// tokenizer its kind maps to.
pub fn word_count(key: &str, content: &str, regions: &[Region]) -> u64 {
    regions
        .iter()
        .map(|region| region_word_count(key, content, region) as u64)
        .sum()
}

fn region_word_count(key: &str, content: &str, region: &Region) -> usize {
    let kind = RegionKind::parse(&region.kind);
    let Some(tokenizer) = classify(&kind) else {
        warn!(key, kind = %kind, "no tokenizer registered for region kind");
        return 0;
    };
    let Some(text) = content.get(region.start..region.end) else {
        warn!(
            key,
            kind = %kind,
            start = region.start,
            end = region.end,
            len = content.len(),
            "region outside content bounds"
        );
        return 0;
    };
    tokenizer.count(text)
}
