//! Document structure scanning using pulldown-cmark
//!
//! Produces the ordered block descriptors the indexer consumes (math
//! callout headers and display equations) and the outgoing links used
//! to build the backlink index.

use std::ops::Range;

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;

use crate::block::{parse_header, quote_depth};

static BLOCK_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:>\s*)*\^([A-Za-z0-9-]+)\s*$").unwrap());
static TRAILING_BLOCK_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\^([A-Za-z0-9-]+)\s*$").unwrap());
static WIKILINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!?\[\[(?P<target>[^\]|#]*)(?:#(?P<section>[^\]|]*))?(?:\|[^\]]*)?\]\]").unwrap()
});

/// What a block descriptor points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// A math callout; the header line is kept for parsing
    Callout { header: String },
    /// A display equation body (between the `$$` fences)
    Equation { body: String },
}

/// A numbered-block candidate in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub kind: BlockKind,
    /// Byte range in the source
    pub range: Range<usize>,
    /// 0-based line of the range start
    pub line: usize,
    /// Inline `^id` following the block
    pub block_id: Option<String>,
}

/// Scan a document for math callouts and display equations, ordered by
/// source position.
pub fn scan_blocks(content: &str) -> Vec<BlockDescriptor> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;

    let parser = Parser::new_ext(content, Options::ENABLE_MATH).into_offset_iter();
    for (event, range) in parser {
        match event {
            Event::Start(Tag::BlockQuote(_)) => {
                depth += 1;
                let line_start = content[..range.start].rfind('\n').map(|p| p + 1).unwrap_or(0);
                let header = line_at(content, line_start);
                // The quote's first line belongs to it only at matching depth;
                // `> > [!math|..]` opens the inner quote, not the outer one.
                if quote_depth(header) == depth && parse_header(header).is_some() {
                    blocks.push(BlockDescriptor {
                        kind: BlockKind::Callout {
                            header: header.to_string(),
                        },
                        line: line_number(content, range.start),
                        block_id: block_id_after(content, range.end),
                        range,
                    });
                }
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                depth = depth.saturating_sub(1);
            }
            Event::DisplayMath(math) => {
                let body = if depth > 0 {
                    strip_quote_markers(&math)
                } else {
                    math.to_string()
                };
                blocks.push(BlockDescriptor {
                    kind: BlockKind::Equation { body },
                    line: line_number(content, range.start),
                    block_id: block_id_after(content, range.end),
                    range,
                });
            }
            _ => {}
        }
    }

    blocks.sort_by_key(|b| b.range.start);
    blocks
}

/// The line beginning at byte `start`, without its newline
fn line_at(content: &str, start: usize) -> &str {
    let rest = &content[start..];
    let end = rest.find('\n').unwrap_or(rest.len());
    rest[..end].trim_end_matches('\r')
}

/// 0-based line number of a byte offset
pub fn line_number(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count()
}

/// `^id` at the end of the block's last line, or alone on one of the
/// following lines with at most one blank line in between
fn block_id_after(content: &str, end: usize) -> Option<String> {
    let body = content[..end].trim_end();
    let last_line_start = body.rfind('\n').map(|p| p + 1).unwrap_or(0);
    let last_line = line_at(content, last_line_start);
    if let Some(caps) = TRAILING_BLOCK_ID
        .captures(last_line)
        .or_else(|| BLOCK_ID.captures(last_line))
    {
        return Some(caps[1].to_string());
    }

    for line in content[body.len()..].split('\n').skip(1).take(2) {
        let line = line.trim_end_matches('\r');
        if let Some(caps) = BLOCK_ID.captures(line) {
            return Some(caps[1].to_string());
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    None
}

fn strip_quote_markers(math: &str) -> String {
    math.lines()
        .map(|line| line.trim_start().trim_start_matches(['>', ' ']))
        .collect::<Vec<_>>()
        .join("\n")
}

/// An outgoing link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink {
    /// Link target path as written (no `#section`)
    pub target: String,
    /// Section after `#`, e.g. `^block-id` or a heading
    pub section: Option<String>,
}

/// Extract `[[wikilinks]]` and local markdown links
pub fn extract_links(content: &str) -> Vec<MarkdownLink> {
    let mut links = Vec::new();
    let mut in_code_block = false;

    // Brackets that form no link arrive as separate text events
    for event in TextMergeStream::new(Parser::new(content)) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::Link { dest_url, .. }) if !in_code_block => {
                let url = dest_url.to_string();
                if url.contains("://") || url.starts_with("mailto:") || url.starts_with('#') {
                    continue;
                }
                let (target, section) = match url.split_once('#') {
                    Some((target, section)) => (target.to_string(), Some(section.to_string())),
                    None => (url, None),
                };
                links.push(MarkdownLink {
                    target: target.replace("%20", " "),
                    section,
                });
            }
            Event::Text(text) if !in_code_block => {
                for caps in WIKILINK.captures_iter(&text) {
                    links.push(MarkdownLink {
                        target: caps["target"].trim().to_string(),
                        section: caps.name("section").map(|s| s.as_str().trim().to_string()),
                    });
                }
            }
            _ => {}
        }
    }

    links
}
