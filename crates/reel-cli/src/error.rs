use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] reel_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Movie title cannot be empty")]
    EmptyTitle,
    #[error(
        "Remote favorites are not configured ({0}). Set the REEL_FIREBASE_* variables or omit --user to stay local."
    )]
    RemoteNotConfigured(String),
}
