//! Handle for remote propagation started by a favorites mutation.

use tokio::task::JoinHandle;

/// How a mutation's remote propagation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No identity was given, so nothing was sent.
    LocalOnly,
    /// The remote store accepted the change.
    Synced,
    /// The remote store rejected the change; local state was kept.
    Failed,
}

/// Remote propagation of a single mutation.
///
/// Dropping the handle leaves the task running in the background. Awaiting
/// [`PendingSync::outcome`] only reports the result; failures have already
/// been logged and local state is never rolled back.
#[derive(Debug)]
pub struct PendingSync {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Ready(SyncOutcome),
    InFlight(JoinHandle<SyncOutcome>),
}

impl PendingSync {
    pub(crate) const fn ready(outcome: SyncOutcome) -> Self {
        Self {
            inner: Inner::Ready(outcome),
        }
    }

    pub(crate) const fn in_flight(handle: JoinHandle<SyncOutcome>) -> Self {
        Self {
            inner: Inner::InFlight(handle),
        }
    }

    /// Whether the remote step has already finished (or was never needed).
    pub fn is_finished(&self) -> bool {
        match &self.inner {
            Inner::Ready(_) => true,
            Inner::InFlight(handle) => handle.is_finished(),
        }
    }

    /// Wait for the remote step to finish.
    pub async fn outcome(self) -> SyncOutcome {
        match self.inner {
            Inner::Ready(outcome) => outcome,
            Inner::InFlight(handle) => handle.await.unwrap_or_else(|error| {
                tracing::warn!("Favorites sync task did not complete: {}", error);
                SyncOutcome::Failed
            }),
        }
    }
}
