//! Profile command: list, inspect and edit display-name profiles
//!
//! Renames and deletions cascade to every location using the profile.

use math_callout::cli::ProfileCommand;
use math_callout::{Context, Error, Result, TheoremKind};

pub fn run(ctx: &Context, cmd: ProfileCommand) -> Result<()> {
    let mut engine = ctx.engine()?;
    match cmd {
        ProfileCommand::List => {
            if ctx.json {
                let ids: Vec<&String> = engine.extra.profiles.keys().collect();
                println!("{}", serde_json::to_string_pretty(&ids)?);
                return Ok(());
            }
            for (id, profile) in &engine.extra.profiles {
                let used = engine.profile_references(id).len();
                let tags = if profile.meta.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", profile.meta.tags.join(", "))
                };
                println!("  - {}{} ({} location(s))", id, tags, used);
            }
        }
        ProfileCommand::Show { id } => {
            let profile = engine
                .profile(&id)
                .ok_or_else(|| Error::ProfileNotFound(id.clone()))?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(profile)?);
                return Ok(());
            }
            println!("Profile {}", profile.id);
            if !profile.meta.tags.is_empty() {
                println!("  tags: {}", profile.meta.tags.join(", "));
            }
            for (kind, name) in profile.body.iter() {
                println!("  {:<12} {}", kind, name);
            }
        }
        ProfileCommand::Add { id } => {
            engine.add_profile(&id)?;
            eprintln!("Added profile {}", id);
        }
        ProfileCommand::Rename { old, new } => {
            let affected = engine.rename_profile(&old, &new)?;
            eprintln!("Renamed profile {} to {}", old, new);
            for location in affected {
                eprintln!("  updated {}", location);
            }
        }
        ProfileCommand::Copy { id } => {
            let copy = engine.copy_profile(&id)?;
            if ctx.json {
                println!("{}", serde_json::to_string(&copy)?);
            } else {
                println!("{}", copy);
            }
        }
        ProfileCommand::Delete { id, replace, unset } => {
            let plan = engine.plan_delete(&id)?;
            if plan.needs_replacement() && replace.is_none() && !unset {
                return Err(Error::ReplacementRequired {
                    id: plan.id,
                    locations: plan.affected,
                });
            }
            let affected = engine.commit_delete(plan, replace.as_deref())?;
            eprintln!("Deleted profile {}", id);
            for location in affected {
                match &replace {
                    Some(replacement) => eprintln!("  {} now uses {}", location, replacement),
                    None => eprintln!("  {} no longer sets a profile", location),
                }
            }
        }
        ProfileCommand::Tags { id, tags } => {
            engine.set_profile_tags(&id, &tags)?;
            eprintln!("Updated tags of {}", id);
        }
        ProfileCommand::Name { id, kind, name } => {
            let kind: TheoremKind = kind.parse()?;
            engine.set_display_name(&id, kind, &name)?;
            eprintln!("{} now shows {} as \"{}\"", id, kind, name);
        }
    }
    Ok(())
}
