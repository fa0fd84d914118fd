//! Favorites coordinator.
//!
//! Owns the authoritative in-memory favorites list. Every mutation updates the
//! list and the local mirror together, then hands the change to the remote
//! store on a background task. Persistence failures are logged and absorbed.

use std::sync::Arc;

use tokio::sync::watch;

use crate::favorites::{PendingSync, SyncOutcome};
use crate::models::{FavoriteRecord, MovieId, MovieSummary, UserId};
use crate::remote::RemoteFavoritesStore;
use crate::storage::LocalMirror;

/// Observable favorites state, newest favorite first.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesState {
    pub favorites: Vec<FavoriteRecord>,
    /// True until the first load finishes, and while a load is running
    pub is_loading: bool,
}

impl FavoritesState {
    const fn initial() -> Self {
        Self {
            favorites: Vec::new(),
            is_loading: true,
        }
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.favorites.iter().any(|record| record.id() == movie_id)
    }
}

#[derive(Debug)]
enum Change {
    Added(FavoriteRecord),
    Removed(MovieId),
}

impl Change {
    const fn movie_id(&self) -> MovieId {
        match self {
            Self::Added(record) => record.movie.id,
            Self::Removed(movie_id) => *movie_id,
        }
    }

    const fn action(&self) -> &'static str {
        match self {
            Self::Added(_) => "adding",
            Self::Removed(_) => "removing",
        }
    }
}

/// Single writer of a user's favorites list.
///
/// Construct one per application and share it; readers observe changes
/// through [`FavoritesCoordinator::subscribe`].
pub struct FavoritesCoordinator<L, R> {
    mirror: L,
    remote: Arc<R>,
    state: watch::Sender<FavoritesState>,
}

impl<L, R> FavoritesCoordinator<L, R>
where
    L: LocalMirror,
    R: RemoteFavoritesStore,
{
    pub fn new(mirror: L, remote: impl Into<Arc<R>>) -> Self {
        let (state, _) = watch::channel(FavoritesState::initial());
        Self {
            mirror,
            remote: remote.into(),
            state,
        }
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<FavoritesState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FavoritesState {
        self.state.borrow().clone()
    }

    pub fn favorites(&self) -> Vec<FavoriteRecord> {
        self.state.borrow().favorites.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn is_favorite(&self, movie_id: MovieId) -> bool {
        self.state.borrow().contains(movie_id)
    }

    /// Reload the list for `identity`.
    ///
    /// With an identity the remote store is authoritative and its records
    /// overwrite the local mirror; a failed fetch yields an empty list. Without
    /// one the local mirror is used as-is.
    ///
    /// Loads are not sequenced: a slow load for a previous identity can finish
    /// after a newer one and overwrite it.
    pub async fn load(&self, identity: Option<&UserId>) {
        self.state.send_modify(|state| state.is_loading = true);

        let favorites = match identity {
            Some(user) => {
                tracing::info!("Loading favorites for user {} from remote store", user);
                match self.remote.list_for(user).await {
                    Ok(records) => records,
                    Err(error) => {
                        tracing::warn!("Error loading favorites from remote store: {}", error);
                        Vec::new()
                    }
                }
            }
            None => {
                tracing::info!("Loading favorites from local mirror");
                self.read_mirror()
            }
        };

        self.state.send_modify(|state| {
            if identity.is_some() {
                self.write_mirror(&favorites);
            }
            state.favorites = favorites;
            state.is_loading = false;
        });
    }

    /// Favorite `movie`, replacing any earlier record for it and moving it to
    /// the front.
    pub fn add(&self, movie: MovieSummary, identity: Option<&UserId>) -> PendingSync {
        let record = FavoriteRecord::new(movie);
        let change = self.commit(|favorites| {
            insert_front(favorites, record.clone());
            Change::Added(record)
        });
        self.propagate(identity, change)
    }

    pub fn remove(&self, movie_id: MovieId, identity: Option<&UserId>) -> PendingSync {
        let change = self.commit(|favorites| {
            favorites.retain(|record| record.id() != movie_id);
            Change::Removed(movie_id)
        });
        self.propagate(identity, change)
    }

    /// Remove `movie` if it is a favorite, otherwise add it.
    ///
    /// The presence check and the mutation happen under one state update.
    pub fn toggle(&self, movie: MovieSummary, identity: Option<&UserId>) -> PendingSync {
        let change = self.commit(|favorites| {
            let movie_id = movie.id;
            if favorites.iter().any(|record| record.id() == movie_id) {
                favorites.retain(|record| record.id() != movie_id);
                Change::Removed(movie_id)
            } else {
                let record = FavoriteRecord::new(movie);
                insert_front(favorites, record.clone());
                Change::Added(record)
            }
        });
        self.propagate(identity, change)
    }

    fn commit(&self, mutate: impl FnOnce(&mut Vec<FavoriteRecord>) -> Change) -> Change {
        let mut applied = None;
        self.state.send_modify(|state| {
            applied = Some(mutate(&mut state.favorites));
            self.write_mirror(&state.favorites);
        });
        applied.unwrap_or_else(|| unreachable!("send_modify runs its closure exactly once"))
    }

    fn propagate(&self, identity: Option<&UserId>, change: Change) -> PendingSync {
        let Some(user) = identity.cloned() else {
            return PendingSync::ready(SyncOutcome::LocalOnly);
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                "No async runtime available; skipped {} favorite {} in remote store",
                change.action(),
                change.movie_id()
            );
            return PendingSync::ready(SyncOutcome::Failed);
        };

        let remote = Arc::clone(&self.remote);
        PendingSync::in_flight(runtime.spawn(async move {
            let result = match &change {
                Change::Added(record) => remote.upsert(&user, record).await,
                Change::Removed(movie_id) => remote.delete(&user, *movie_id).await,
            };
            match result {
                Ok(()) => {
                    tracing::debug!("Synced favorite {} for user {}", change.movie_id(), user);
                    SyncOutcome::Synced
                }
                Err(error) => {
                    tracing::warn!(
                        "Error {} favorite {} in remote store: {}",
                        change.action(),
                        change.movie_id(),
                        error
                    );
                    SyncOutcome::Failed
                }
            }
        }))
    }

    fn read_mirror(&self) -> Vec<FavoriteRecord> {
        self.mirror.read().unwrap_or_else(|error| {
            tracing::warn!("Error loading favorites from local mirror: {}", error);
            Vec::new()
        })
    }

    fn write_mirror(&self, favorites: &[FavoriteRecord]) {
        if let Err(error) = self.mirror.write(favorites) {
            tracing::warn!("Error saving favorites to local mirror: {}", error);
        }
    }
}

fn insert_front(favorites: &mut Vec<FavoriteRecord>, record: FavoriteRecord) {
    favorites.retain(|existing| existing.id() != record.id());
    favorites.insert(0, record);
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::{Error, Result};
    use crate::remote::InMemoryRemoteStore;
    use crate::storage::MemoryMirror;
    use pretty_assertions::assert_eq;

    type TestCoordinator = FavoritesCoordinator<Arc<MemoryMirror>, InMemoryRemoteStore>;

    fn setup() -> (TestCoordinator, Arc<MemoryMirror>, Arc<InMemoryRemoteStore>) {
        let mirror = Arc::new(MemoryMirror::new());
        let remote = Arc::new(InMemoryRemoteStore::new());
        let coordinator = FavoritesCoordinator::new(Arc::clone(&mirror), Arc::clone(&remote));
        (coordinator, mirror, remote)
    }

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            overview: format!("{title} overview"),
            vote_average: 7.5,
            ..MovieSummary::new(id, title)
        }
    }

    fn ids(records: &[FavoriteRecord]) -> Vec<u64> {
        records.iter().map(|record| record.id().get()).collect()
    }

    fn user(id: &str) -> UserId {
        id.parse().unwrap()
    }

    struct BrokenMirror;

    impl LocalMirror for BrokenMirror {
        fn read(&self) -> Result<Vec<FavoriteRecord>> {
            Err(Error::Io(std::io::Error::other("storage unavailable")))
        }

        fn write(&self, _records: &[FavoriteRecord]) -> Result<()> {
            Err(Error::Io(std::io::Error::other("quota exceeded")))
        }
    }

    #[test]
    fn starts_empty_and_loading() {
        let (coordinator, _, _) = setup();
        assert!(coordinator.is_loading());
        assert!(coordinator.favorites().is_empty());
    }

    #[tokio::test]
    async fn add_remove_toggle_scenario() {
        let (coordinator, mirror, _) = setup();

        coordinator.add(movie(42, "Inception"), None);
        assert_eq!(ids(&coordinator.favorites()), vec![42]);
        assert_eq!(coordinator.favorites()[0].movie.title, "Inception");

        coordinator.add(movie(7, "Heat"), None);
        assert_eq!(ids(&coordinator.favorites()), vec![7, 42]);

        coordinator.remove(MovieId::new(42), None);
        assert_eq!(ids(&coordinator.favorites()), vec![7]);

        let pending = coordinator.toggle(movie(7, "Heat"), None);
        assert!(coordinator.favorites().is_empty());
        assert_eq!(pending.outcome().await, SyncOutcome::LocalOnly);
        assert_eq!(mirror.read().unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn add_then_is_favorite_and_remove_then_not() {
        let (coordinator, _, _) = setup();
        let id = MovieId::new(42);

        coordinator.add(movie(42, "Inception"), None);
        assert!(coordinator.is_favorite(id));

        coordinator.remove(id, None);
        assert!(!coordinator.is_favorite(id));
    }

    #[tokio::test]
    async fn re_adding_replaces_snapshot_and_moves_to_front() {
        let (coordinator, _, _) = setup();
        coordinator.add(movie(1, "Alien"), None);
        coordinator.add(movie(2, "Aliens"), None);
        coordinator.add(movie(3, "Alien 3"), None);

        coordinator.add(movie(1, "Alien (Director's Cut)"), None);

        let favorites = coordinator.favorites();
        assert_eq!(ids(&favorites), vec![1, 3, 2]);
        assert_eq!(favorites[0].movie.title, "Alien (Director's Cut)");
        assert!(favorites[0].added_at >= favorites[1].added_at);
    }

    #[tokio::test]
    async fn toggle_twice_restores_membership() {
        let (coordinator, _, _) = setup();
        coordinator.add(movie(5, "Up"), None);

        coordinator.toggle(movie(9, "Big"), None);
        coordinator.toggle(movie(9, "Big"), None);
        assert_eq!(ids(&coordinator.favorites()), vec![5]);

        coordinator.toggle(movie(5, "Up"), None);
        coordinator.toggle(movie(5, "Up"), None);
        assert!(coordinator.is_favorite(MovieId::new(5)));
        assert_eq!(coordinator.favorites().len(), 1);
    }

    #[tokio::test]
    async fn identifiers_stay_unique_across_mutation_sequences() {
        let (coordinator, mirror, _) = setup();
        let mut seed = 17_u64;

        for step in 0..300 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let id = (seed >> 33) % 8;
            match step % 3 {
                0 => {
                    coordinator.add(movie(id, "Any"), None);
                }
                1 => {
                    coordinator.remove(MovieId::new(id), None);
                }
                _ => {
                    coordinator.toggle(movie(id, "Any"), None);
                }
            }

            let favorites = coordinator.favorites();
            let unique = favorites.iter().map(FavoriteRecord::id).collect::<HashSet<_>>();
            assert_eq!(unique.len(), favorites.len());
            assert_eq!(mirror.read().unwrap(), favorites);
        }
    }

    #[tokio::test]
    async fn anonymous_load_returns_last_mirror_write() {
        let (coordinator, mirror, _) = setup();
        coordinator.add(movie(42, "Inception"), None);
        coordinator.add(movie(7, "Heat"), None);
        let written = mirror.read().unwrap();

        let reloaded = FavoritesCoordinator::<_, InMemoryRemoteStore>::new(
            Arc::clone(&mirror),
            Arc::new(InMemoryRemoteStore::new()),
        );
        reloaded.load(None).await;

        assert_eq!(reloaded.favorites(), written);
        assert_eq!(ids(&reloaded.favorites()), vec![7, 42]);
        assert!(!reloaded.is_loading());
    }

    #[tokio::test]
    async fn identity_load_uses_remote_and_overwrites_mirror() {
        let (coordinator, mirror, remote) = setup();
        coordinator.add(movie(99, "Local only"), None);

        let u1 = user("u1");
        remote.seed(
            &u1,
            [
                FavoriteRecord::with_added_at(movie(42, "Inception"), 1_000),
                FavoriteRecord::with_added_at(movie(7, "Heat"), 2_000),
            ],
        );

        coordinator.load(Some(&u1)).await;

        assert_eq!(ids(&coordinator.favorites()), vec![7, 42]);
        assert_eq!(mirror.read().unwrap(), coordinator.favorites());
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn failed_remote_load_degrades_to_empty_list() {
        let (coordinator, mirror, remote) = setup();
        coordinator.add(movie(1, "Cached"), None);
        remote.set_failing(true);

        coordinator.load(Some(&user("u1"))).await;

        assert!(coordinator.favorites().is_empty());
        assert!(!coordinator.is_loading());
        assert!(mirror.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_mirror_loads_as_empty() {
        let mirror = Arc::new(MemoryMirror::with_raw("{broken"));
        let coordinator = FavoritesCoordinator::<_, InMemoryRemoteStore>::new(
            mirror,
            InMemoryRemoteStore::new(),
        );

        coordinator.load(None).await;
        assert!(coordinator.favorites().is_empty());
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn mirror_failures_do_not_block_in_memory_updates() {
        let coordinator = FavoritesCoordinator::<_, InMemoryRemoteStore>::new(
            BrokenMirror,
            InMemoryRemoteStore::new(),
        );

        coordinator.load(None).await;
        coordinator.add(movie(3, "Jaws"), None);

        assert_eq!(ids(&coordinator.favorites()), vec![3]);
    }

    #[tokio::test]
    async fn mutations_with_identity_reach_remote_store() {
        let (coordinator, _, remote) = setup();
        let u1 = user("u1");

        let pending = coordinator.add(movie(42, "Inception"), Some(&u1));
        assert!(coordinator.is_favorite(MovieId::new(42)));
        assert_eq!(pending.outcome().await, SyncOutcome::Synced);
        assert_eq!(ids(&remote.records_for(&u1)), vec![42]);

        let pending = coordinator.toggle(movie(42, "Inception"), Some(&u1));
        assert_eq!(pending.outcome().await, SyncOutcome::Synced);
        assert!(remote.records_for(&u1).is_empty());
        assert!(remote.records_for(&user("u2")).is_empty());
    }

    #[tokio::test]
    async fn remote_write_failure_keeps_local_change() {
        let (coordinator, mirror, remote) = setup();
        let u1 = user("u1");
        remote.set_failing(true);

        let pending = coordinator.add(movie(42, "Inception"), Some(&u1));
        assert_eq!(pending.outcome().await, SyncOutcome::Failed);
        assert!(coordinator.is_favorite(MovieId::new(42)));
        assert_eq!(ids(&mirror.read().unwrap()), vec![42]);

        remote.set_failing(false);
        assert!(remote.records_for(&u1).is_empty());
    }

    #[tokio::test]
    async fn remote_delete_failure_keeps_local_removal() {
        let (coordinator, _, remote) = setup();
        let u1 = user("u1");
        coordinator.add(movie(42, "Inception"), Some(&u1)).outcome().await;

        remote.set_failing(true);
        let pending = coordinator.remove(MovieId::new(42), Some(&u1));
        assert_eq!(pending.outcome().await, SyncOutcome::Failed);
        assert!(!coordinator.is_favorite(MovieId::new(42)));

        remote.set_failing(false);
        assert_eq!(ids(&remote.records_for(&u1)), vec![42]);
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let (coordinator, _, _) = setup();
        let mut receiver = coordinator.subscribe();
        assert!(receiver.borrow_and_update().is_loading);

        coordinator.load(None).await;
        assert!(receiver.has_changed().unwrap());
        assert!(!receiver.borrow_and_update().is_loading);

        coordinator.add(movie(42, "Inception"), None);
        assert!(receiver.has_changed().unwrap());
        assert!(receiver.borrow_and_update().contains(MovieId::new(42)));
        assert!(!receiver.has_changed().unwrap());
    }

    #[test]
    fn remote_step_is_skipped_without_runtime() {
        let (coordinator, _, remote) = setup();
        let u1 = user("u1");

        let pending = coordinator.add(movie(42, "Inception"), Some(&u1));

        assert!(pending.is_finished());
        assert!(coordinator.is_favorite(MovieId::new(42)));
        assert!(remote.records_for(&u1).is_empty());
    }
}
