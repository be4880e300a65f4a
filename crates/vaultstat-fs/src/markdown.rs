//! Markdown structure extraction.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use vaultstat_types::{LinkRef, ParsedStructure, Region, TagRef};

static WIKI_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\[\]]+)\]\]").expect("valid regex literal"));

// A tag needs at least one non-digit and must not follow a word char, `&`, `/` or `#`.
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w&/#])#([\w/-]*[^\W\d][\w/-]*)").expect("valid regex literal")
});

// `> [!info]`, `> [!todo]-`: the first line of a callout.
static CALLOUT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*>[ \t]*\[![A-Za-z][\w-]*\][+-]?").expect("valid regex literal")
});

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options.insert(Options::ENABLE_GFM);
    options
}

/// Region tag for a top-level block.
fn region_kind(tag: &Tag<'_>) -> String {
    let kind = match tag {
        Tag::Paragraph => "paragraph",
        Tag::Heading { .. } => "heading",
        Tag::BlockQuote(None) => "blockquote",
        Tag::BlockQuote(Some(_)) => "callout",
        Tag::CodeBlock(_) => "code",
        Tag::HtmlBlock => "html",
        Tag::List(_) => "list",
        Tag::FootnoteDefinition(_) => "footnoteDefinition",
        Tag::Table(_) => "table",
        Tag::MetadataBlock(_) => "yaml",
        other => return block_name(other),
    };
    kind.to_string()
}

/// Byte length of the callout marker opening a blockquote's source, if any.
fn callout_marker_len(source: &str) -> Option<usize> {
    CALLOUT_MARKER.find(source).map(|m| m.end())
}

/// `DefinitionList` -> `definitionList`.
fn block_name(tag: &Tag<'_>) -> String {
    let debug = format!("{tag:?}");
    let name = debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::from("block"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scan {
    links: bool,
    tags: bool,
}

impl Scan {
    const NONE: Self = Self {
        links: false,
        tags: false,
    };

    fn for_kind(kind: &str) -> Self {
        match kind {
            "paragraph" | "heading" | "list" | "blockquote" | "callout" | "table" => Self {
                links: true,
                tags: true,
            },
            "footnoteDefinition" => Self {
                links: true,
                tags: false,
            },
            _ => Self::NONE,
        }
    }
}

struct Extractor<'a> {
    content: &'a str,
    structure: ParsedStructure,
    scan: Scan,
    depth: usize,
    verbatim: usize,
    text: String,
}

impl Extractor<'_> {
    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        if self.scan.links {
            for cap in WIKI_LINK.captures_iter(&self.text) {
                if !cap[1].is_empty() {
                    continue;
                }
                if let Some(target) = wiki_target(&cap[2]) {
                    self.structure.links.push(LinkRef { target });
                }
            }
        }
        if self.scan.tags {
            for cap in HASHTAG.captures_iter(&self.text) {
                self.structure.tags.push(TagRef {
                    tag: format!("#{}", &cap[1]),
                });
            }
        }
        self.text.clear();
    }

    fn start(&mut self, tag: &Tag<'_>, range: std::ops::Range<usize>) {
        if self.depth == 0 {
            let marker = match tag {
                Tag::BlockQuote(_) => self
                    .content
                    .get(range.clone())
                    .and_then(callout_marker_len),
                _ => None,
            };
            let (kind, start) = match marker {
                Some(len) => (String::from("callout"), range.start + len),
                None => (region_kind(tag), range.start),
            };
            self.scan = Scan::for_kind(&kind);
            self.structure
                .regions
                .push(Region::new(kind, start, range.end));
        }
        match tag {
            Tag::Link { dest_url, .. } => self.structure.links.push(LinkRef {
                target: dest_url.to_string(),
            }),
            Tag::CodeBlock(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => self.verbatim += 1,
            _ => {}
        }
        self.depth += 1;
    }

    fn end(&mut self, tag: TagEnd) {
        if matches!(
            tag,
            TagEnd::CodeBlock | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_)
        ) {
            self.verbatim = self.verbatim.saturating_sub(1);
        }
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.scan = Scan::NONE;
        }
    }
}

/// `Note#Heading|Alias` -> `Note`; `#Heading` alone links to the current note.
fn wiki_target(inner: &str) -> Option<String> {
    let target = inner.split('|').next().unwrap_or_default();
    let target = target.split('#').next().unwrap_or_default().trim();
    if target.is_empty() && !inner.trim_start().starts_with('#') {
        return None;
    }
    Some(target.to_string())
}

/// Extract regions, links and tags from Markdown `content`.
///
/// Regions are byte ranges of top-level blocks, tagged `paragraph`, `heading`,
/// `list`, `blockquote`, `callout`, `table`, `code`, `yaml`, `html`,
/// `footnoteDefinition` or `thematicBreak`. Any other block is tagged with its
/// block name. A callout region starts after its `[!type]` marker. Embeds
/// (`![[...]]`) are not links.
#[must_use]
pub fn parse_structure(content: &str) -> ParsedStructure {
    let mut extractor = Extractor {
        content,
        structure: ParsedStructure::default(),
        scan: Scan::NONE,
        depth: 0,
        verbatim: 0,
        text: String::new(),
    };

    for (event, range) in Parser::new_ext(content, options()).into_offset_iter() {
        if !matches!(event, Event::Text(_)) {
            extractor.flush();
        }
        match event {
            Event::Start(tag) => extractor.start(&tag, range),
            Event::End(tag) => extractor.end(tag),
            Event::Text(text) if extractor.verbatim == 0 => extractor.text.push_str(&text),
            Event::Rule if extractor.depth == 0 => extractor
                .structure
                .regions
                .push(Region::new("thematicBreak", range.start, range.end)),
            _ => {}
        }
    }
    extractor.flush();
    extractor.structure
}
