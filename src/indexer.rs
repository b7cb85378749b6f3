//! Document indexer
//!
//! Walks a document's math callouts and display equations in source
//! order, assigns sequence indices, and produces the rendered titles,
//! labels and equation tags. Numbering only depends on the document and
//! the configuration, so running the indexer twice gives the same result.

use std::ops::Range;

use serde::Serialize;
use tracing::{debug, warn};

use crate::block::{parse_header, CalloutHeader};
use crate::constants::NUMBER_AUTO;
use crate::edit::{apply_edits, EditOp};
use crate::equation::{row_tags, RowTag};
use crate::error::Result;
use crate::format::{
    format_equation_reference, format_equation_tag, format_label, format_reference, format_title,
};
use crate::location::Location;
use crate::markdown::{scan_blocks, BlockKind};
use crate::resolver::{resolve_config, resolve_settings, ResolvedSettings};
use crate::state::PluginState;

/// A numbered (or deliberately unnumbered) math callout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedCallout {
    /// 0-based line of the header
    pub line: usize,
    #[serde(skip)]
    pub range: Range<usize>,
    #[serde(skip)]
    pub header: CalloutHeader,
    /// Header line as found in the document
    #[serde(skip)]
    pub header_line: String,
    #[serde(skip)]
    pub settings: ResolvedSettings,
    /// Sequence index, for auto-numbered callouts
    pub index: Option<usize>,
    pub title: String,
    pub label: Option<String>,
    pub reference: String,
    pub block_id: Option<String>,
}

/// A display equation with its row tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedEquation {
    pub line: usize,
    #[serde(skip)]
    pub range: Range<usize>,
    /// Tags of the numbered rows, in row order
    pub tags: Vec<String>,
    /// Reference text per tag
    pub references: Vec<String>,
    pub block_id: Option<String>,
}

/// A math callout left out of numbering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    pub line: usize,
    pub reason: String,
}

/// Result of indexing one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedDocument {
    pub location: Location,
    pub callouts: Vec<IndexedCallout>,
    pub equations: Vec<IndexedEquation>,
    pub skipped: Vec<SkippedBlock>,
}

impl IndexedDocument {
    fn empty(location: Location) -> Self {
        Self {
            location,
            callouts: Vec::new(),
            equations: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Callout carrying the given inline block id
    pub fn callout_by_id(&self, block_id: &str) -> Option<&IndexedCallout> {
        self.callouts
            .iter()
            .find(|c| c.block_id.as_deref() == Some(block_id))
    }

    /// Equation carrying the given inline block id
    pub fn equation_by_id(&self, block_id: &str) -> Option<&IndexedEquation> {
        self.equations
            .iter()
            .find(|e| e.block_id.as_deref() == Some(block_id))
    }
}

/// Receives each block's presentation as soon as it is computed
pub trait RenderSink {
    fn callout(&mut self, callout: &IndexedCallout);
    fn equation(&mut self, equation: &IndexedEquation);
}

/// Discards rendering callbacks
impl RenderSink for () {
    fn callout(&mut self, _callout: &IndexedCallout) {}
    fn equation(&mut self, _equation: &IndexedEquation) {}
}

/// Indexer over a read-only state snapshot
pub struct Indexer<'a> {
    state: &'a PluginState,
}

impl<'a> Indexer<'a> {
    pub fn new(state: &'a PluginState) -> Self {
        Self { state }
    }

    /// Index a document without rendering callbacks
    pub fn index(&self, location: &Location, content: &str) -> IndexedDocument {
        self.run(location, content, &mut ())
    }

    /// Index a document, notifying `sink` for every block in source order
    pub fn run(&self, location: &Location, content: &str, sink: &mut dyn RenderSink) -> IndexedDocument {
        let mut document = IndexedDocument::empty(location.clone());
        if self.state.is_excluded(location) {
            debug!(location = %location, "excluded from indexing");
            return document;
        }

        let eq_config = resolve_config(self.state, location, None);
        let mut callout_counter = 0usize;
        let mut equation_counter = 0usize;

        for block in scan_blocks(content) {
            match block.kind {
                BlockKind::Callout { header: header_line } => {
                    let header = match parse_header(&header_line) {
                        Some(Ok(header)) => header,
                        Some(Err(reason)) => {
                            warn!(location = %location, line = block.line + 1, %reason, "skipping malformed math callout");
                            document.skipped.push(SkippedBlock {
                                line: block.line,
                                reason,
                            });
                            continue;
                        }
                        None => continue,
                    };

                    let mut settings = resolve_settings(self.state, location, &header.settings, None);
                    if settings.number.trim() == NUMBER_AUTO {
                        settings.index = Some(callout_counter);
                        callout_counter += 1;
                    }

                    let callout = IndexedCallout {
                        line: block.line,
                        range: block.range,
                        index: settings.index,
                        title: format_title(&settings, false),
                        label: format_label(&settings),
                        reference: format_reference(&settings),
                        block_id: block.block_id,
                        header,
                        header_line,
                        settings,
                    };
                    sink.callout(&callout);
                    document.callouts.push(callout);
                }
                BlockKind::Equation { body } => {
                    let mut tags = Vec::new();
                    for row in row_tags(&body, eq_config.line_by_line) {
                        match row {
                            RowTag::Auto => {
                                tags.push(format_equation_tag(&eq_config, equation_counter));
                                equation_counter += 1;
                            }
                            RowTag::Fixed(tag) => tags.push(tag),
                            RowTag::Unnumbered => {}
                        }
                    }
                    let references = tags
                        .iter()
                        .map(|tag| format_equation_reference(&eq_config, tag))
                        .collect();

                    let equation = IndexedEquation {
                        line: block.line,
                        range: block.range,
                        tags,
                        references,
                        block_id: block.block_id,
                    };
                    sink.equation(&equation);
                    document.equations.push(equation);
                }
            }
        }

        debug!(
            location = %location,
            callouts = document.callouts.len(),
            equations = document.equations.len(),
            skipped = document.skipped.len(),
            "indexed document"
        );
        document
    }
}

/// Rewrite each callout header with its assigned `_index` and rendered
/// title. Unchanged headers produce no edit, so applying this to its own
/// output returns the input unchanged.
pub fn write_back(content: &str, document: &IndexedDocument) -> Result<String> {
    let mut edits = Vec::new();
    for callout in &document.callouts {
        let mut header = callout.header.clone();
        header.settings.index = callout.index;
        let rendered = header.render(&callout.title)?;
        if rendered != callout.header_line {
            edits.push(EditOp::replace_line(callout.line, callout.header_line.clone(), rendered));
        }
    }
    if edits.is_empty() {
        return Ok(content.to_string());
    }
    Ok(apply_edits(content, edits)?)
}
