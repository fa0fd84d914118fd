//! Favorites list coordination between in-memory state and persistence

mod coordinator;
mod pending;

pub use coordinator::{FavoritesCoordinator, FavoritesState};
pub use pending::{PendingSync, SyncOutcome};
