mod cli;
mod commands;
mod completions;
mod error;
mod output;
mod setup;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Commands::Completions { shell } => {
            completions::generate_completions(shell);
            return Ok(());
        }
        Commands::History { command } => command,
    };

    let data_dir = setup::prepare_data_dir(cli.data_dir)?;
    let _guard = setup::init_logging(&data_dir, cli.verbose)?;
    let config = setup::load_config(cli.config.as_deref(), cli.backend)?;

    let core = setup::prepare_core(config, &data_dir)?;
    commands::history::run(core, command, cli.format).await
}
