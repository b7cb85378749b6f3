//! Exclude command: manage locations left out of indexing

use math_callout::cli::ExcludeCommand;
use math_callout::{Context, Location, Result};

pub fn run(ctx: &Context, cmd: ExcludeCommand) -> Result<()> {
    let mut engine = ctx.engine()?;
    match cmd {
        ExcludeCommand::Add { location } => {
            let location = Location::new(&location);
            if engine.exclude(&location)? {
                eprintln!("Excluded {}", location);
            } else {
                eprintln!("{} is already excluded", location);
            }
        }
        ExcludeCommand::Remove { location } => {
            let location = Location::new(&location);
            if engine.include(&location)? {
                eprintln!("Included {}", location);
            } else {
                eprintln!("{} was not excluded", location);
            }
        }
        ExcludeCommand::List => {
            let excluded = &engine.data.excluded_files;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(excluded)?);
            } else if excluded.is_empty() {
                println!("  (none)");
            } else {
                for location in excluded {
                    println!("  - {}", location);
                }
            }
        }
    }
    Ok(())
}
