//! Resolve command: print the effective configuration at a location

use math_callout::{Context, Location, Result};

pub fn run(ctx: &Context, location: &str) -> Result<()> {
    let engine = ctx.engine()?;
    let location = Location::new(location);
    let resolved = engine.resolve(&location);

    let value = serde_json::to_value(&resolved)?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Configuration at {}", location);
    if let serde_json::Value::Object(map) = value {
        for (key, value) in map {
            println!("  {:<24} {}", key, value);
        }
    }
    Ok(())
}
