//! Markdown prose tokenizer.
//!
//! The pipeline is:
//!
//! 1. Blank input yields nothing.
//! 2. Split on runs of the boundary class (whitespace, `"`, `|`, `,`, `(`,
//!    `)`, `[`, `]`, `/`).
//! 3. Drop candidates without a word character (ASCII letters, digits, `_`,
//!    Cyrillic).
//! 4. Drop plain numbers (`42`, `3.14`).
//! 5. Drop fenced code openers (```` ```rust ````).
//! 6. Strip markers to a fixed point; see [`strip_to_fixed_point`].
//! 7. Drop tokens left empty.

use std::sync::LazyLock;

use regex::Regex;

use crate::Tokenizer;

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[ \n\r\t"|,()\[\]/]+"#).expect("valid regex literal"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid regex literal"));

static CODE_FENCE_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_]+$").expect("valid regex literal"));

const PUNCTUATION: [char; 7] = ['`', '.', ':', '"', ',', '!', '?'];

/// Normalizes prose, heading, list, blockquote and callout text into words.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownTokenizer;

impl MarkdownTokenizer {
    /// Borrowing variant of [`Tokenizer::tokenize`].
    pub fn tokens<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> {
        let blank = text.trim().is_empty();
        WORD_BOUNDARY
            .split(text)
            .filter(move |_| !blank)
            .filter(|candidate| has_word_char(candidate))
            .filter(|candidate| !NUMBER.is_match(candidate))
            .filter(|candidate| !CODE_FENCE_OPENER.is_match(candidate))
            .map(strip_to_fixed_point)
            .filter(|token| !token.is_empty())
    }
}

impl Tokenizer for MarkdownTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokens(text).map(str::to_owned).collect()
    }

    fn count(&self, text: &str) -> usize {
        self.tokens(text).count()
    }

    fn name(&self) -> &'static str {
        "markdown"
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('\u{0400}'..='\u{04FF}').contains(&c)
}

fn has_word_char(candidate: &str) -> bool {
    candidate.chars().any(is_word_char)
}

/// Apply the four marker strips in order until a full pass changes nothing.
///
/// Each strip removes at most one marker per side, so nested wrappers such
/// as `**_word_**` take several passes.
///
/// ```
/// use vaultstat_tokenize::strip_to_fixed_point;
///
/// assert_eq!(strip_to_fixed_point("**_word_**"), "word");
/// assert_eq!(strip_to_fixed_point("==x=="), "x");
/// assert_eq!(strip_to_fixed_point("pi."), "pi");
/// assert_eq!(strip_to_fixed_point("[[Page]]"), "Page");
/// ```
#[must_use]
pub fn strip_to_fixed_point(token: &str) -> &str {
    let mut current = token;
    while !current.is_empty() {
        let next = strip_wiki_link(strip_punctuation(strip_emphasis(strip_highlight(current))));
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// One leading and one trailing `==`.
fn strip_highlight(token: &str) -> &str {
    let rest = token.strip_prefix("==").unwrap_or(token);
    rest.strip_suffix("==").unwrap_or(rest)
}

/// One leading and one trailing run of `_` or of `*`.
fn strip_emphasis(token: &str) -> &str {
    let rest = match token.chars().next() {
        Some(marker @ ('_' | '*')) => token.trim_start_matches(marker),
        _ => token,
    };
    match rest.chars().next_back() {
        Some(marker @ ('_' | '*')) => rest.trim_end_matches(marker),
        _ => rest,
    }
}

/// One leading and one trailing punctuation character.
fn strip_punctuation(token: &str) -> &str {
    let rest = token.strip_prefix(PUNCTUATION).unwrap_or(token);
    rest.strip_suffix(PUNCTUATION).unwrap_or(rest)
}

/// A leading `[[` and a trailing `]]`.
fn strip_wiki_link(token: &str) -> &str {
    let rest = token.strip_prefix("[[").unwrap_or(token);
    rest.strip_suffix("]]").unwrap_or(rest)
}
