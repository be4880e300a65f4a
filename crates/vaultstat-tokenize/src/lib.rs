//! # vaultstat-tokenize
//!
//! **Tier 1 (Text)**
//!
//! Tokenizer strategies and the region classifier that picks one per region
//! kind.
//!
//! ## What belongs here
//! * Splitting and normalizing text spans into word tokens
//! * The region-kind → tokenizer table
//!
//! ## What does NOT belong here
//! * Reading files or parsing markdown into regions
//! * Link and tag extraction

mod markdown;
mod region;

pub use markdown::{MarkdownTokenizer, strip_to_fixed_point};
pub use region::{RegionKind, classify, tokenizer_for};

/// A strategy turning a text span into normalized word tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Number of tokens `tokenize` would return.
    fn count(&self, text: &str) -> usize {
        self.tokenize(text).len()
    }

    fn name(&self) -> &'static str;
}

/// Contributes no words, whatever the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitTokenizer;

impl Tokenizer for UnitTokenizer {
    fn tokenize(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }

    fn count(&self, _text: &str) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "unit"
    }
}

pub static UNIT: UnitTokenizer = UnitTokenizer;
pub static MARKDOWN: MarkdownTokenizer = MarkdownTokenizer;
