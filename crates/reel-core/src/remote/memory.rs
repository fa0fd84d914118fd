//! In-process remote store used by tests and offline sessions.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::models::{FavoriteRecord, MovieId, UserId};
use crate::remote::{sort_newest_first, RemoteFavoritesStore};

/// Remote store backed by per-user maps, with switchable failure injection.
#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    collections: Mutex<HashMap<UserId, BTreeMap<MovieId, FavoriteRecord>>>,
    failing: AtomicBool,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Store `records` for `user` directly, bypassing failure injection.
    pub fn seed(&self, user: &UserId, records: impl IntoIterator<Item = FavoriteRecord>) {
        let mut collections = self.lock();
        let collection = collections.entry(user.clone()).or_default();
        for record in records {
            collection.insert(record.id(), record);
        }
    }

    /// Snapshot of `user`'s documents, newest first.
    pub fn records_for(&self, user: &UserId) -> Vec<FavoriteRecord> {
        let mut records = self
            .lock()
            .get(user)
            .map(|collection| collection.values().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        sort_newest_first(&mut records);
        records
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, BTreeMap<MovieId, FavoriteRecord>>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Remote("in-memory store is unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RemoteFavoritesStore for InMemoryRemoteStore {
    async fn list_for(&self, user: &UserId) -> Result<Vec<FavoriteRecord>> {
        self.check_available()?;
        Ok(self.records_for(user))
    }

    async fn upsert(&self, user: &UserId, record: &FavoriteRecord) -> Result<()> {
        self.check_available()?;
        self.lock()
            .entry(user.clone())
            .or_default()
            .insert(record.id(), record.clone());
        Ok(())
    }

    async fn delete(&self, user: &UserId, movie_id: MovieId) -> Result<()> {
        self.check_available()?;
        if let Some(collection) = self.lock().get_mut(user) {
            collection.remove(&movie_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieSummary;

    fn user(id: &str) -> UserId {
        id.parse().unwrap()
    }

    fn record(id: u64, added_at: i64) -> FavoriteRecord {
        FavoriteRecord::with_added_at(MovieSummary::new(id, format!("Movie {id}")), added_at)
    }

    #[tokio::test]
    async fn list_is_newest_first_and_partitioned_by_user() {
        let store = InMemoryRemoteStore::new();
        store.upsert(&user("u1"), &record(1, 100)).await.unwrap();
        store.upsert(&user("u1"), &record(2, 300)).await.unwrap();
        store.upsert(&user("u2"), &record(3, 200)).await.unwrap();

        let listed = store.list_for(&user("u1")).await.unwrap();
        let ids = listed.iter().map(|r| r.id().get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(store.list_for(&user("u3")).await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_document() {
        let store = InMemoryRemoteStore::new();
        store.upsert(&user("u1"), &record(1, 100)).await.unwrap();
        store.upsert(&user("u1"), &record(1, 500)).await.unwrap();

        let listed = store.records_for(&user("u1"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].added_at, 500);
    }

    #[tokio::test]
    async fn delete_missing_document_succeeds() {
        let store = InMemoryRemoteStore::new();
        store.delete(&user("u1"), MovieId::new(9)).await.unwrap();
    }

    #[tokio::test]
    async fn failure_injection_rejects_calls() {
        let store = InMemoryRemoteStore::new();
        store.set_failing(true);
        assert!(store.list_for(&user("u1")).await.is_err());
        assert!(store.upsert(&user("u1"), &record(1, 1)).await.is_err());
        assert!(store.delete(&user("u1"), MovieId::new(1)).await.is_err());

        store.set_failing(false);
        assert!(store.list_for(&user("u1")).await.is_ok());
    }
}
