use clap::Parser;
use math_callout::constants::ENV_LOG;
use math_callout::{Cli, Command, Context};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = Context::new(cli.vault.as_deref(), cli.json);

    let result = match cli.command {
        Command::Index { file, write } => cmd::index::run(&ctx, &file, write),
        Command::Resolve { location } => cmd::resolve::run(&ctx, &location),
        Command::Config(cmd) => cmd::config::run(&ctx, cmd),
        Command::Profile(cmd) => cmd::profile::run(&ctx, cmd),
        Command::Exclude(cmd) => cmd::exclude::run(&ctx, cmd),
        Command::Refs { file } => cmd::refs::run(&ctx, &file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `MATH_CALLOUT_LOG` wins over the default level
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

mod cmd {
    pub mod config;
    pub mod exclude;
    pub mod index;
    pub mod profile;
    pub mod refs;
    pub mod resolve;
}
