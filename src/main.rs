use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use schema_forge::cli::Args;
use schema_forge::config::ConfigFile;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "SCHEMA_FORGE_LOG";

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "schema_forge=info" } else { "schema_forge=warn" };
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr so stdout carries only command output
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = ConfigFile::load(args.config.as_deref())?;
    let output = args.command.run(&config, args.format)?;
    println!("{}", output);
    Ok(())
}
