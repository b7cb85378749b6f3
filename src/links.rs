//! Cross-document links
//!
//! [`LinkIndex`] answers "which documents link here", which is what a
//! re-index needs to know to refresh rendered references elsewhere.
//! [`VaultLinkIndex`] builds it from markdown links and `[[wikilinks]]`;
//! [`LabelIndex`] maps callout labels to their reference text; and
//! [`resolve_block_references`] renders `[[note#^id]]` links.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::MARKDOWN_EXTENSION;
use crate::indexer::IndexedDocument;
use crate::location::Location;
use crate::markdown::{extract_links, MarkdownLink};
use crate::util::{markdown_files, secure_path};

/// Backlink lookup
pub trait LinkIndex {
    /// Other documents containing a link to `location`
    fn backlinks(&self, location: &Location) -> Vec<Location>;
}

// === VaultLinkIndex ===

/// Link graph over a set of documents
#[derive(Debug, Clone, Default)]
pub struct VaultLinkIndex {
    documents: BTreeSet<Location>,
    backlinks: BTreeMap<Location, BTreeSet<Location>>,
}

impl VaultLinkIndex {
    /// Build from document contents
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = (Location, &'a str)>,
    {
        let documents: Vec<(Location, &str)> = documents.into_iter().collect();
        let mut index = Self {
            documents: documents.iter().map(|(location, _)| location.clone()).collect(),
            backlinks: BTreeMap::new(),
        };

        for (source, content) in &documents {
            for link in extract_links(content) {
                let Some(target) = index.resolve(source, &link.target) else {
                    debug!(source = %source, target = %link.target, "unresolved link");
                    continue;
                };
                if &target != source {
                    index.backlinks.entry(target).or_default().insert(source.clone());
                }
            }
        }
        index
    }

    /// Build from every markdown document in a vault
    pub fn from_vault(vault: &Path) -> std::io::Result<Self> {
        let mut contents = Vec::new();
        for location in markdown_files(vault)? {
            let content = fs::read_to_string(secure_path(vault, &location)?)?;
            contents.push((location, content));
        }
        Ok(Self::build(
            contents.iter().map(|(location, content)| (location.clone(), content.as_str())),
        ))
    }

    /// Resolve a link target written in `source`.
    ///
    /// Tried in order: the exact vault path, the path with `.md`
    /// appended, the same two relative to the source's folder, then a
    /// unique file-name match anywhere in the vault. An empty target is
    /// the source itself.
    pub fn resolve(&self, source: &Location, target: &str) -> Option<Location> {
        let target = target.trim();
        if target.is_empty() {
            return Some(source.clone());
        }

        let with_ext = format!("{}.{}", target, MARKDOWN_EXTENSION);
        let folder = source.parent().filter(|p| !p.is_root());
        let mut candidates = vec![Location::new(target), Location::new(&with_ext)];
        if let Some(folder) = &folder {
            candidates.extend(join_relative(folder, target));
            candidates.extend(join_relative(folder, &with_ext));
        }
        if let Some(found) = candidates.into_iter().find(|c| self.documents.contains(c)) {
            return Some(found);
        }

        let name = Location::new(target).name().to_string();
        let name_with_ext = format!("{}.{}", name, MARKDOWN_EXTENSION);
        let mut matches = self
            .documents
            .iter()
            .filter(|doc| doc.name() == name || doc.name() == name_with_ext);
        let first = matches.next()?;
        if matches.next().is_some() {
            debug!(target, "ambiguous link target");
            return None;
        }
        Some(first.clone())
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.documents.contains(location)
    }
}

/// `folder/target` with `..` segments applied; `None` when it climbs
/// above the vault root
fn join_relative(folder: &Location, target: &str) -> Option<Location> {
    let mut segments: Vec<&str> = folder.as_str().split('/').collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            _ => segments.push(segment),
        }
    }
    Some(Location::new(&segments.join("/")))
}

impl LinkIndex for VaultLinkIndex {
    fn backlinks(&self, location: &Location) -> Vec<Location> {
        self.backlinks
            .get(location)
            .map(|sources| sources.iter().cloned().collect())
            .unwrap_or_default()
    }
}

// === LabelIndex ===

/// Where a label points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelEntry {
    pub location: Location,
    /// Reference text of the labeled callout
    pub reference: String,
}

/// Label to callout lookup over indexed documents
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    labels: BTreeMap<String, LabelEntry>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every labeled callout of a document, replacing the document's
    /// previous entries. The first document to claim a label keeps it.
    pub fn insert_document(&mut self, document: &IndexedDocument) {
        self.labels.retain(|_, entry| entry.location != document.location);
        for callout in &document.callouts {
            let Some(label) = &callout.label else { continue };
            if let Some(existing) = self.labels.get(label) {
                warn!(
                    label = %label,
                    first = %existing.location,
                    duplicate = %document.location,
                    "duplicate label"
                );
                continue;
            }
            self.labels.insert(
                label.clone(),
                LabelEntry {
                    location: document.location.clone(),
                    reference: callout.reference.clone(),
                },
            );
        }
    }

    pub fn get(&self, label: &str) -> Option<&LabelEntry> {
        self.labels.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelEntry)> {
        self.labels.iter().map(|(label, entry)| (label.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// === Block references ===

/// A `[[note#^id]]` link and what it renders as
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockReference {
    /// Link as written, without brackets
    pub link: String,
    pub location: Option<Location>,
    pub block_id: String,
    /// Reference text, when the target block was found
    pub text: Option<String>,
}

/// Resolve every block-id link in `content`. `document_for` supplies the
/// indexed target document.
pub fn resolve_block_references<F>(
    source: &Location,
    content: &str,
    links: &VaultLinkIndex,
    mut document_for: F,
) -> Vec<BlockReference>
where
    F: FnMut(&Location) -> Option<IndexedDocument>,
{
    let mut references = Vec::new();
    for MarkdownLink { target, section } in extract_links(content) {
        let Some(block_id) = section.as_deref().and_then(|s| s.strip_prefix('^')) else {
            continue;
        };
        let location = links.resolve(source, &target);
        let text = location
            .as_ref()
            .and_then(|location| document_for(location))
            .and_then(|document| reference_text(&document, block_id));

        references.push(BlockReference {
            link: format!("{}#^{}", target, block_id),
            location,
            block_id: block_id.to_string(),
            text,
        });
    }
    references
}

/// Reference text of the callout or equation carrying `block_id`
pub fn reference_text(document: &IndexedDocument, block_id: &str) -> Option<String> {
    if let Some(callout) = document.callout_by_id(block_id) {
        return Some(callout.reference.clone());
    }
    document
        .equation_by_id(block_id)
        .and_then(|equation| equation.references.first().cloned())
}
