//! Deterministic excluded-directory token parsing and matching.

#![forbid(unsafe_code)]

use vaultstat_path::{normalize_slashes, segments};

/// Normalize one raw token: `/` separators, no surrounding slashes or whitespace.
///
/// # Examples
///
/// ```
/// use vaultstat_exclude::normalize_exclude_token;
///
/// assert_eq!(normalize_exclude_token(" /archive/ "), "archive");
/// assert_eq!(normalize_exclude_token(r"\templates\"), "templates");
/// ```
#[must_use]
pub fn normalize_exclude_token(raw: &str) -> String {
    normalize_slashes(raw.trim()).trim_matches('/').to_string()
}

/// Add a token only when non-empty and not already present (after normalization).
///
/// Returns `true` when the token was inserted.
///
/// # Examples
///
/// ```
/// use vaultstat_exclude::add_exclude_token;
///
/// let mut tokens = vec![];
/// assert!(add_exclude_token(&mut tokens, "archive"));
/// assert!(!add_exclude_token(&mut tokens, "/archive/")); // duplicate
/// assert!(!add_exclude_token(&mut tokens, "  ")); // empty
/// ```
pub fn add_exclude_token(existing: &mut Vec<String>, raw: &str) -> bool {
    let token = normalize_exclude_token(raw);
    if token.is_empty() || existing.contains(&token) {
        return false;
    }
    existing.push(token);
    true
}

/// Split a configuration string on commas and whitespace into normalized,
/// deduplicated tokens in first-seen order.
///
/// ```
/// use vaultstat_exclude::parse_exclude_tokens;
///
/// assert_eq!(
///     parse_exclude_tokens("archive, .trash\ttemplates,archive"),
///     vec!["archive", ".trash", "templates"]
/// );
/// ```
#[must_use]
pub fn parse_exclude_tokens(spec: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for raw in spec.split(|c: char| c == ',' || c.is_whitespace()) {
        add_exclude_token(&mut tokens, raw);
    }
    tokens
}

/// A set of excluded-directory tokens matched against key segments.
///
/// Tokens are compared with whole segments only, so a token that still
/// contains `/` after normalization can never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet {
    tokens: Vec<String>,
}

impl ExcludeSet {
    /// Build a set from a configuration string.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        Self {
            tokens: parse_exclude_tokens(spec),
        }
    }

    /// Build a set from already-split tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for token in tokens {
            add_exclude_token(&mut out, token.as_ref());
        }
        Self { tokens: out }
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The first token matching a segment of `key`, if any.
    #[must_use]
    pub fn matching_token(&self, key: &str) -> Option<&str> {
        if self.tokens.is_empty() {
            return None;
        }
        segments(key).find_map(|seg| {
            self.tokens
                .iter()
                .find(|token| token.as_str() == seg)
                .map(String::as_str)
        })
    }

    /// `true` when any segment of `key` equals an excluded token.
    #[must_use]
    pub fn is_excluded(&self, key: &str) -> bool {
        self.matching_token(key).is_some()
    }
}
