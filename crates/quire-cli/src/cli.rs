use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use quire_core::{Provider, SelectionMode, WindowPreset};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "quire",
    version,
    about = "Quire: provider API key sets and due-date filters",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// TOML file overriding the built-in widget settings.
    #[arg(long = "config", env = "QUIRE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// JSON file standing in for the browser key-value store.
    #[arg(long = "store", env = "QUIRE_STORE", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage per-provider API keys.
    Keys {
        #[command(subcommand)]
        action: KeysCommand,
    },
    /// Drive the inline due-date filter.
    Dates {
        #[command(subcommand)]
        action: DatesCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeysCommand {
    /// Show stored keys, masked unless --reveal is given.
    List {
        #[arg(long)]
        reveal: bool,
    },
    /// Replace every key of a provider.
    Set {
        provider: Provider,
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Append one key to a provider.
    Add { provider: Provider, key: String },
    /// Remove the key at a 1-based position.
    Remove { provider: Provider, position: usize },
    /// Delete every stored key, legacy entries included.
    Clear,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(long)]
    pub mode: Option<SelectionMode>,

    #[arg(long)]
    pub window: Option<WindowPreset>,

    #[arg(long)]
    pub months: Option<u32>,

    /// Day the window is computed from (defaults to the local date).
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Canonical value the host currently holds.
    #[arg(long, default_value = "")]
    pub value: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DatesCommand {
    /// Replay calendar clicks; `clear` resets the selection.
    Pick {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(required = true)]
        days: Vec<String>,
    },
    /// Type free text into the search box.
    Search {
        #[command(flatten)]
        filter: FilterArgs,
        text: String,
    },
    /// Show which due dates a canonical value keeps.
    Match {
        #[arg(long)]
        mode: Option<SelectionMode>,
        value: String,
        due: Vec<String>,
    },
    /// Print the selectable window.
    Window {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
