use std::fmt;

use crate::{MARKDOWN, Tokenizer, UNIT};

/// The kind of a document region, parsed from a structure provider's tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Paragraph,
    Heading,
    List,
    Blockquote,
    Callout,
    Table,
    Yaml,
    Code,
    Math,
    ThematicBreak,
    Html,
    Text,
    Element,
    FootnoteDefinition,
    Definition,
    Comment,
    /// A tag with no registered tokenizer; carries the raw tag for diagnostics.
    Unregistered(String),
}

impl RegionKind {
    /// Parse a provider tag. Unknown tags become [`RegionKind::Unregistered`].
    ///
    /// ```
    /// use vaultstat_tokenize::RegionKind;
    ///
    /// assert_eq!(RegionKind::parse("thematicBreak"), RegionKind::ThematicBreak);
    /// assert_eq!(
    ///     RegionKind::parse("definitionList"),
    ///     RegionKind::Unregistered("definitionList".into())
    /// );
    /// ```
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "heading" => Self::Heading,
            "list" => Self::List,
            "blockquote" => Self::Blockquote,
            "callout" => Self::Callout,
            "table" => Self::Table,
            "yaml" => Self::Yaml,
            "code" => Self::Code,
            "math" => Self::Math,
            "thematicBreak" => Self::ThematicBreak,
            "html" => Self::Html,
            "text" => Self::Text,
            "element" => Self::Element,
            "footnoteDefinition" => Self::FootnoteDefinition,
            "definition" => Self::Definition,
            "comment" => Self::Comment,
            other => Self::Unregistered(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading => "heading",
            Self::List => "list",
            Self::Blockquote => "blockquote",
            Self::Callout => "callout",
            Self::Table => "table",
            Self::Yaml => "yaml",
            Self::Code => "code",
            Self::Math => "math",
            Self::ThematicBreak => "thematicBreak",
            Self::Html => "html",
            Self::Text => "text",
            Self::Element => "element",
            Self::FootnoteDefinition => "footnoteDefinition",
            Self::Definition => "definition",
            Self::Comment => "comment",
            Self::Unregistered(tag) => tag,
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tokenizer for a region kind, or `None` when the kind is unregistered.
#[must_use]
pub fn classify(kind: &RegionKind) -> Option<&'static dyn Tokenizer> {
    match kind {
        RegionKind::Paragraph
        | RegionKind::Heading
        | RegionKind::List
        | RegionKind::Blockquote
        | RegionKind::Callout => Some(&MARKDOWN),
        RegionKind::Table
        | RegionKind::Yaml
        | RegionKind::Code
        | RegionKind::Math
        | RegionKind::ThematicBreak
        | RegionKind::Html
        | RegionKind::Text
        | RegionKind::Element
        | RegionKind::FootnoteDefinition
        | RegionKind::Definition
        | RegionKind::Comment => Some(&UNIT),
        RegionKind::Unregistered(_) => None,
    }
}

/// Shorthand for `classify(&RegionKind::parse(tag))`.
#[must_use]
pub fn tokenizer_for(tag: &str) -> Option<&'static dyn Tokenizer> {
    classify(&RegionKind::parse(tag))
}
