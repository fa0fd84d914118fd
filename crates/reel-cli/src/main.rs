//! Reel CLI - keep a list of favorite movies from the terminal
//!
//! Favorites are mirrored to a local file and, when a user id is given,
//! synced to that user's remote collection.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::commands::add::run_add;
use crate::commands::check::run_check;
use crate::commands::common::Session;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config_check;
use crate::commands::list::run_list;
use crate::commands::remove::run_remove;
use crate::commands::sync::run_sync;
use crate::commands::toggle::run_toggle;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "reel=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::resolve(cli.data_dir, cli.user);

    match cli.command {
        Commands::List { json } => run_list(json, &session).await?,
        Commands::Add(args) => run_add(args, &session).await?,
        Commands::Remove { id } => run_remove(id, &session).await?,
        Commands::Toggle(args) => run_toggle(args, &session).await?,
        Commands::Check { id } => run_check(id, &session).await?,
        Commands::Sync => run_sync(&session).await?,
        Commands::Config { command } => match command {
            ConfigCommands::Check => run_config_check()?,
        },
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
