//! Index command
//!
//! Numbers a document's math callouts and equations and prints the
//! result; with `--write` the callout headers are rewritten in place.

use std::fs;

use math_callout::{write_back, Context, IndexedDocument, Result};

pub fn run(ctx: &Context, file: &str, write: bool) -> Result<()> {
    let (location, path) = ctx.document(file)?;
    let content = fs::read_to_string(&path)?;

    let engine = if write { ctx.engine_with_links()? } else { ctx.engine()? };
    let document = engine.index(&location, &content);

    if write {
        let updated = write_back(&content, &document)?;
        if updated == content {
            eprintln!("{} is up to date", location);
        } else {
            fs::write(&path, &updated)?;
            eprintln!("Updated {}", location);
        }
        for dependent in engine.dependents(&location) {
            eprintln!("  referenced from {}", dependent);
        }
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print_document(&document);
    }
    Ok(())
}

fn print_document(document: &IndexedDocument) {
    if document.callouts.is_empty() && document.equations.is_empty() && document.skipped.is_empty() {
        println!("{}: no math callouts or equations", document.location);
        return;
    }

    println!("{}", document.location);
    for callout in &document.callouts {
        let mut line = format!("  L{:<5} {}", callout.line + 1, callout.title);
        if let Some(label) = &callout.label {
            line.push_str(&format!("  [{}]", label));
        }
        if let Some(id) = &callout.block_id {
            line.push_str(&format!("  ^{}", id));
        }
        println!("{}", line);
    }
    for equation in &document.equations {
        let tags = if equation.references.is_empty() {
            "(unnumbered)".to_string()
        } else {
            equation.references.join(" ")
        };
        let id = equation.block_id.as_ref().map(|id| format!("  ^{}", id)).unwrap_or_default();
        println!("  L{:<5} {}{}", equation.line + 1, tags, id);
    }
    for skipped in &document.skipped {
        eprintln!("  L{:<5} skipped: {}", skipped.line + 1, skipped.reason);
    }
}
