use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hs_cli::commands::{local, web};
use hs_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(cli.lang, cli.hours);

    let today = Local::now().date_naive();
    let color = io::stderr().is_terminal();
    let mut out = io::stdout().lock();
    let mut diag = io::stderr().lock();

    match cli.command {
        None | Some(Commands::Local) => {
            tracing::debug!(?config, "loaded configuration");
            local::run(&mut out, &mut diag, &config, today, color)?;
        }
        Some(Commands::Web { server, session }) => {
            let config = config.with_remote(server, session);
            tracing::debug!(?config, "loaded configuration");
            web::run(&mut out, &mut diag, &config, today, color)?;
        }
    }

    Ok(())
}
