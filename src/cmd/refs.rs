//! Refs command
//!
//! Renders the `[[note#^id]]` block references of a document and lists
//! the documents linking to it.

use std::fs;

use serde_json::json;

use math_callout::links::resolve_block_references;
use math_callout::util::secure_path;
use math_callout::{Context, Result, VaultLinkIndex};

pub fn run(ctx: &Context, file: &str) -> Result<()> {
    let (location, path) = ctx.document(file)?;
    let content = fs::read_to_string(&path)?;

    let links = VaultLinkIndex::from_vault(ctx.vault())?;
    let engine = ctx.engine()?.with_link_index(links.clone());

    let references = resolve_block_references(&location, &content, &links, |target| {
        let path = secure_path(ctx.vault(), target).ok()?;
        let content = fs::read_to_string(path).ok()?;
        Some(engine.index(target, &content))
    });
    let backlinks = engine.dependents(&location);

    if ctx.json {
        let output = json!({
            "location": location,
            "references": references,
            "backlinks": backlinks,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", location);
    if references.is_empty() {
        println!("  no block references");
    }
    for reference in &references {
        match (&reference.location, &reference.text) {
            (Some(_), Some(text)) => println!("  [[{}]] -> {}", reference.link, text),
            (Some(target), None) => println!("  [[{}]] -> no block ^{} in {}", reference.link, reference.block_id, target),
            (None, _) => println!("  [[{}]] -> unresolved", reference.link),
        }
    }

    if !backlinks.is_empty() {
        println!("Linked from:");
        for source in backlinks {
            println!("  - {}", source);
        }
    }
    Ok(())
}
