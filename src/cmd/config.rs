//! Config command: show, set and unset per-location options

use math_callout::cli::ConfigCommand;
use math_callout::{Context, Location, Result};

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { location } => show(ctx, &Location::new(&location)),
        ConfigCommand::Set { location, key, value } => {
            let location = Location::new(&location);
            ctx.engine()?.set_option(&location, &key, &value)?;
            eprintln!("Set {} at {}", key, location);
            Ok(())
        }
        ConfigCommand::Unset { location, key } => {
            let location = Location::new(&location);
            ctx.engine()?.unset_option(&location, &key)?;
            eprintln!("Unset {} at {}", key, location);
            Ok(())
        }
    }
}

fn show(ctx: &Context, location: &Location) -> Result<()> {
    let engine = ctx.engine()?;
    let stored = engine.settings(location).cloned().unwrap_or_default();
    let value = serde_json::to_value(&stored)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match value {
        serde_json::Value::Object(map) if !map.is_empty() => {
            println!("Options stored at {}", location);
            for (key, value) in map {
                println!("  {:<24} {}", key, value);
            }
        }
        _ => println!("No options stored at {}", location),
    }
    Ok(())
}
