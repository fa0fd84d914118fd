//! reel-core - Core library for Reel
//!
//! This crate contains the movie and favorite models, the local mirror and
//! remote document store adapters, and the coordinator that keeps a user's
//! favorites list consistent across them.

pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod remote;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use favorites::{FavoritesCoordinator, FavoritesState, PendingSync, SyncOutcome};
pub use models::{FavoriteRecord, MovieId, MovieSummary, UserId};
