//! Per-screen feed state.
//!
//! A [`FeedHolder`] owns two observables: the current [`FeedSnapshot`] and
//! the [`FeedStatus`] of the last operation. Snapshots are immutable and
//! replaced wholesale; a failed operation publishes `Error` and leaves the
//! snapshot alone.

use std::future::Future;
use std::sync::Arc;

use nework_core::{AppError, Identified};
use tokio::sync::watch;
use tracing::debug;

use crate::observable::{Observable, SubscriptionId};
use crate::pending::PendingSet;

// ── Snapshot ────────────────────────────────────────────────────────

/// One feed's contents, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot<T> {
    items: Vec<T>,
    empty: bool,
}

impl<T> Default for FeedSnapshot<T> {
    /// Nothing fetched yet. Not "empty": emptiness is only known after a
    /// successful fetch.
    fn default() -> Self {
        Self {
            items: Vec::new(),
            empty: false,
        }
    }
}

impl<T: Identified + Clone> FeedSnapshot<T> {
    /// Snapshot of a freshly fetched page.
    pub fn new(items: Vec<T>) -> Self {
        let empty = items.is_empty();
        Self { items, empty }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// True when the last successful fetch returned no items.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Copy with the item carrying `item.id()` swapped for `item`. Other
    /// items and the order are untouched.
    pub fn replaced(&self, item: T) -> Self {
        let id = item.id();
        let items = self
            .items
            .iter()
            .map(|i| if i.id() == id { item.clone() } else { i.clone() })
            .collect();
        Self {
            items,
            empty: self.empty,
        }
    }

    /// Copy without the item `id`.
    pub fn without(&self, id: i64) -> Self {
        let items: Vec<T> = self.items.iter().filter(|i| i.id() != id).cloned().collect();
        let empty = items.is_empty();
        Self { items, empty }
    }
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Idle,
    /// Initial load in flight.
    Loading,
    /// Pull-to-refresh in flight.
    Refreshing,
    Error(AppError),
    /// Presentation hint: idle with nothing to show. Never stored.
    Empty,
}

impl FeedStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, FeedStatus::Loading | FeedStatus::Refreshing)
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            FeedStatus::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Text for the error notification; absent for an `Api` error without
    /// a server message.
    pub fn error_message(&self) -> Option<String> {
        self.error().and_then(AppError::message)
    }
}

// ── Source ──────────────────────────────────────────────────────────

/// Where a feed gets its contents from. One call per fetch.
#[async_trait::async_trait]
pub trait FeedSource<T>: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Vec<T>, AppError>;
}

// ── Mutations ───────────────────────────────────────────────────────

/// Result of a toggle or removal on a feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server confirmed and the snapshot was updated.
    Applied,
    /// Another mutation on the same id is still in flight; nothing was sent.
    Pending,
    /// The id is not in the current snapshot; nothing was sent.
    Missing,
    Failed(AppError),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

// ── Holder ──────────────────────────────────────────────────────────

pub struct FeedHolder<T> {
    source: Arc<dyn FeedSource<T>>,
    snapshot: Observable<Arc<FeedSnapshot<T>>>,
    status: Observable<FeedStatus>,
    pending: PendingSet,
}

impl<T> FeedHolder<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn FeedSource<T>>) -> Self {
        Self {
            source,
            snapshot: Observable::new(Arc::new(FeedSnapshot::default())),
            status: Observable::new(FeedStatus::Idle),
            pending: PendingSet::new(),
        }
    }

    /// Initial load: `Loading`, then the new snapshot and `Idle`, or
    /// `Error` with the previous snapshot kept.
    pub async fn load(&self) -> Result<(), AppError> {
        self.fetch(FeedStatus::Loading, async {}).await
    }

    /// Same as [`load`](Self::load) but announced as `Refreshing`.
    pub async fn refresh(&self) -> Result<(), AppError> {
        self.fetch(FeedStatus::Refreshing, async {}).await
    }

    /// [`load`](Self::load) with extra screen work awaited after `Loading`
    /// is published and before the feed itself is fetched.
    pub async fn load_with(&self, prelude: impl Future<Output = ()>) -> Result<(), AppError> {
        self.fetch(FeedStatus::Loading, prelude).await
    }

    pub async fn refresh_with(&self, prelude: impl Future<Output = ()>) -> Result<(), AppError> {
        self.fetch(FeedStatus::Refreshing, prelude).await
    }

    async fn fetch(&self, busy: FeedStatus, prelude: impl Future<Output = ()>) -> Result<(), AppError> {
        let busy = BusyStatus::publish(&self.status, busy);
        prelude.await;
        let fetched = self.source.fetch().await;
        busy.finish();
        match fetched {
            Ok(items) => {
                debug!(count = items.len(), "feed fetched");
                self.snapshot.set(Arc::new(FeedSnapshot::new(items)));
                self.status.set(FeedStatus::Idle);
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "feed fetch failed");
                self.status.set(FeedStatus::Error(e.clone()));
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> Arc<FeedSnapshot<T>> {
        self.snapshot.get()
    }

    pub fn status(&self) -> FeedStatus {
        self.status.get()
    }

    /// Status for rendering: `Empty` when idle over an empty fetch.
    pub fn view_status(&self) -> FeedStatus {
        match self.status() {
            FeedStatus::Idle if self.snapshot().is_empty() => FeedStatus::Empty,
            other => other,
        }
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.pending.contains(id)
    }

    /// Publish an error that did not come from a fetch.
    pub fn report(&self, error: AppError) {
        self.status.set(FeedStatus::Error(error));
    }

    pub fn subscribe_snapshot(
        &self,
        handler: impl Fn(&Arc<FeedSnapshot<T>>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.snapshot.subscribe(handler)
    }

    pub fn subscribe_status(&self, handler: impl Fn(&FeedStatus) + Send + Sync + 'static) -> SubscriptionId {
        self.status.subscribe(handler)
    }

    pub fn unsubscribe_snapshot(&self, id: SubscriptionId) -> bool {
        self.snapshot.unsubscribe(id)
    }

    pub fn unsubscribe_status(&self, id: SubscriptionId) -> bool {
        self.status.unsubscribe(id)
    }

    pub fn watch_snapshot(&self) -> watch::Receiver<Arc<FeedSnapshot<T>>> {
        self.snapshot.watch()
    }

    pub fn watch_status(&self) -> watch::Receiver<FeedStatus> {
        self.status.watch()
    }

    /// Server-confirmed update of one item.
    ///
    /// `call` receives the item as currently shown and returns the
    /// server's copy, which then replaces the item in the snapshot that is
    /// current when the call returns. Failure publishes `Error` only.
    pub async fn mutate<F, Fut>(&self, id: i64, call: F) -> MutationOutcome
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let Some(item) = self.snapshot().get(id).cloned() else {
            return MutationOutcome::Missing;
        };
        let Some(_guard) = self.pending.try_begin(id) else {
            debug!(id, "mutation already pending");
            return MutationOutcome::Pending;
        };

        match call(item).await {
            Ok(updated) => {
                self.snapshot.update(|current| {
                    if !current.contains(id) {
                        return false;
                    }
                    *current = Arc::new(current.replaced(updated));
                    true
                });
                MutationOutcome::Applied
            }
            Err(e) => {
                self.report(e.clone());
                MutationOutcome::Failed(e)
            }
        }
    }

    /// Server-side delete, then drop the item from the current snapshot.
    pub async fn remove_with<F, Fut>(&self, id: i64, call: F) -> MutationOutcome
    where
        F: FnOnce(i64) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        if !self.snapshot().contains(id) {
            return MutationOutcome::Missing;
        }
        let Some(_guard) = self.pending.try_begin(id) else {
            return MutationOutcome::Pending;
        };

        match call(id).await {
            Ok(()) => {
                self.snapshot.update(|current| {
                    if !current.contains(id) {
                        return false;
                    }
                    *current = Arc::new(current.without(id));
                    true
                });
                MutationOutcome::Applied
            }
            Err(e) => {
                self.report(e.clone());
                MutationOutcome::Failed(e)
            }
        }
    }
}

/// Busy status of a fetch in flight. Dropped before [`finish`](Self::finish),
/// as when the fetching task is cancelled, it puts back the status that was
/// showing before, or `Idle` if that was itself a busy state.
struct BusyStatus<'a> {
    status: &'a Observable<FeedStatus>,
    previous: Option<FeedStatus>,
}

impl<'a> BusyStatus<'a> {
    fn publish(status: &'a Observable<FeedStatus>, busy: FeedStatus) -> Self {
        let previous = status.get();
        status.set(busy);
        Self {
            status,
            previous: Some(previous),
        }
    }

    fn finish(mut self) {
        self.previous = None;
    }
}

impl Drop for BusyStatus<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            debug!("feed fetch abandoned");
            let restored = if previous.is_busy() { FeedStatus::Idle } else { previous };
            self.status.set(restored);
        }
    }
}
