use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vaultstat_types::{DeletionPolicy, OutputFormat};

/// `vaultstat` - word, link and tag statistics for a Markdown vault.
#[derive(Parser, Debug)]
#[command(name = "vaultstat", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Excluded directory names, separated by commas or whitespace. Repeatable.
    ///
    /// A file is skipped when any segment of its path equals a token.
    ///
    /// Examples:
    ///   --exclude archive
    ///   --exclude "templates, .trash"
    #[arg(long = "exclude", value_name = "DIRS", global = true)]
    pub exclude: Vec<String>,

    /// What to do with the stored record of a file that disappears.
    #[arg(long, value_enum, global = true)]
    pub deletion: Option<DeletionPolicy>,

    /// Settings file (defaults to `vaultstat.toml` in the vault root, if present).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan the vault once and print its totals.
    Scan(ScanArgs),

    /// Keep totals current while files change; Ctrl-C to stop.
    Watch(WatchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Vault root.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Vault root.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Delay between drain passes, in milliseconds.
    #[arg(long = "interval-ms", value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Stop on its own after this many milliseconds.
    #[arg(long = "exit-after-ms", value_name = "MS")]
    pub exit_after_ms: Option<u64>,
}
