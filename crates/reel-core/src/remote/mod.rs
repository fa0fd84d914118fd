//! Remote per-user favorites collection

use std::future::Future;

use crate::error::Result;
use crate::models::{FavoriteRecord, MovieId, UserId};

mod firestore;
mod memory;

pub use firestore::FirestoreFavoritesStore;
pub use memory::InMemoryRemoteStore;

/// Document store holding one favorite document per movie for each user.
///
/// Futures are `Send` so the coordinator can propagate writes on a spawned
/// task without waiting for them.
pub trait RemoteFavoritesStore: Send + Sync + 'static {
    /// All records for `user`, newest `added_at` first.
    fn list_for(&self, user: &UserId) -> impl Future<Output = Result<Vec<FavoriteRecord>>> + Send;

    /// Create or fully replace the document keyed by the record's movie id.
    fn upsert(
        &self,
        user: &UserId,
        record: &FavoriteRecord,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete the document for `movie_id`. Deleting a missing document succeeds.
    fn delete(&self, user: &UserId, movie_id: MovieId) -> impl Future<Output = Result<()>> + Send;
}

/// Order records newest first, keeping the incoming order for equal timestamps.
pub(crate) fn sort_newest_first(records: &mut [FavoriteRecord]) {
    records.sort_by(|a, b| b.added_at.cmp(&a.added_at));
}
