use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Keep a list of favorite movies, locally or synced to your account")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the local favorites mirror
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Signed-in user id; favorites sync to this user's remote collection
    #[arg(long, global = true, value_name = "UID")]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List favorite movies, newest first
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a movie to favorites (re-adding refreshes it)
    Add(MovieArgs),
    /// Remove a movie from favorites
    #[command(alias = "rm")]
    Remove {
        /// Movie id
        id: u64,
    },
    /// Add the movie if it is not a favorite, otherwise remove it
    Toggle(MovieArgs),
    /// Print whether a movie is a favorite
    Check {
        /// Movie id
        id: u64,
    },
    /// Reload favorites from the remote store into the local mirror
    Sync,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct MovieArgs {
    /// Catalog movie id
    #[arg(long)]
    pub id: u64,
    /// Movie title
    #[arg(long)]
    pub title: String,
    /// Poster image path (e.g. /abc.jpg)
    #[arg(long, value_name = "PATH")]
    pub poster: Option<String>,
    /// Backdrop image path
    #[arg(long, value_name = "PATH")]
    pub backdrop: Option<String>,
    /// Release date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub release_date: Option<String>,
    /// Average rating (0-10)
    #[arg(long, default_value_t = 0.0)]
    pub rating: f64,
    /// Plot overview
    #[arg(long, default_value = "")]
    pub overview: String,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Report which remote settings are missing
    Check,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
