//! Favorite record model

use serde::{Deserialize, Serialize};

use crate::models::{MovieId, MovieSummary};
use crate::util::unix_timestamp_millis_now;

/// Snapshot of a movie captured when the user favorited it
///
/// The movie fields are flattened so the stored shape is the catalog payload
/// plus an `addedAt` timestamp. Re-adding a movie replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    #[serde(flatten)]
    pub movie: MovieSummary,
    /// When the movie was favorited (Unix ms)
    #[serde(rename = "addedAt")]
    pub added_at: i64,
}

impl FavoriteRecord {
    /// Capture `movie` as favorited right now
    #[must_use]
    pub fn new(movie: MovieSummary) -> Self {
        Self::with_added_at(movie, unix_timestamp_millis_now())
    }

    #[must_use]
    pub const fn with_added_at(movie: MovieSummary, added_at: i64) -> Self {
        Self { movie, added_at }
    }

    #[must_use]
    pub const fn id(&self) -> MovieId {
        self.movie.id
    }
}
