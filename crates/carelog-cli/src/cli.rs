use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::output::OutputFormat;
use carelog_core::StorageBackend;

/// Blob store backend selectable from the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    Redb,
    Fs,
    Memory,
}

impl From<BackendArg> for StorageBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Redb => StorageBackend::Redb,
            BackendArg::Fs => StorageBackend::Fs,
            BackendArg::Memory => StorageBackend::Memory,
        }
    }
}

#[derive(Parser)]
#[command(name = "carelog")]
#[command(version, about = "Carelog - rolling AI conversation history per patient")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.config/carelog/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (defaults to ~/.carelog)
    #[arg(long, global = true, env = "CARELOG_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage backend, overrides the config file
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendArg>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// AI conversation history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Print a subject's transcript
    Show { subject: String },

    /// Record one exchange
    Append {
        subject: String,

        /// Patient or professional message
        #[arg(long)]
        requester: String,

        /// Assistant reply
        #[arg(long)]
        responder: String,
    },

    /// List subjects with a transcript
    List,

    /// Delete a subject's transcript
    Clear { subject: String },
}
