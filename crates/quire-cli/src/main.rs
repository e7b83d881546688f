mod cli;
mod commands;
mod config;
mod store;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use crate::cli::{Command, GlobalCli};
use crate::store::{FileStore, default_store_path};

#[tracing::instrument(skip_all)]
fn run(cli: GlobalCli) -> anyhow::Result<()> {
    cli::init_tracing(cli.verbose, cli.quiet)?;
    info!(verbose = cli.verbose, quiet = cli.quiet, "starting quire CLI");

    let cfg = config::load(cli.config.as_deref())?;
    debug!(?cfg, "resolved config");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Keys { action } => {
            let path = cli.store.unwrap_or_else(default_store_path);
            let store = FileStore::open(&path)
                .with_context(|| format!("failed to open store at {}", path.display()))?;
            debug!(store = %store.path().display(), "using key-value store");
            commands::run_keys(store, &cfg, action, &mut out)?;
        }
        Command::Dates { action } => commands::run_dates(&cfg, action, &mut out)?,
    }

    out.flush()?;
    info!("done");
    Ok(())
}

fn main() {
    let cli = GlobalCli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
