// src/main.rs — Parsesmith entry point

use clap::Parser;

use parsesmith::cli::{Cli, Commands};
use parsesmith::infra::config::Config;
use parsesmith::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG / PARSESMITH_LOG)
    logger::init_logging("warn");

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no parsesmith.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    if let Some(Commands::List) = cli.command {
        parsesmith::cli::run::run_list(&config)?;
        return Ok(0);
    }

    let Some(target) = cli.target.as_deref() else {
        eprintln!("Usage: parsesmith <target> or parsesmith list");
        eprintln!("Run parsesmith --help for all options.");
        return Ok(2);
    };

    let outcome = parsesmith::cli::run::run_target(
        target,
        &config,
        cli.model.as_deref(),
        cli.attempts,
        cli.quiet,
    )
    .await?;

    // Exhaustion is a normal outcome; the nonzero code lets scripts
    // branch on it without parsing output.
    Ok(if outcome.solved() { 0 } else { 1 })
}
