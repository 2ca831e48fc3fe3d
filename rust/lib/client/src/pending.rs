use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Entity ids with a mutation in flight.
///
/// [`PendingSet::try_begin`] hands out a guard; the id stays marked until
/// the guard drops, including when the owning task is cancelled.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    ids: Arc<Mutex<HashSet<i64>>>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id`, or return `None` if it is already marked.
    pub fn try_begin(&self, id: i64) -> Option<PendingGuard> {
        let inserted = self.lock().insert(id);
        inserted.then(|| PendingGuard {
            ids: self.ids.clone(),
            id,
        })
    }

    pub fn contains(&self, id: i64) -> bool {
        self.lock().contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<i64>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[must_use = "the id is released as soon as the guard drops"]
pub struct PendingGuard {
    ids: Arc<Mutex<HashSet<i64>>>,
    id: i64,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_rejected_until_release() {
        let pending = PendingSet::new();
        let guard = pending.try_begin(42).unwrap();
        assert!(pending.try_begin(42).is_none());
        assert!(pending.try_begin(43).is_some());
        assert!(pending.contains(42));

        drop(guard);
        assert!(!pending.contains(42));
        assert!(pending.try_begin(42).is_some());
    }

    #[test]
    fn clones_share_marks() {
        let a = PendingSet::new();
        let b = a.clone();
        let _g = a.try_begin(1).unwrap();
        assert!(b.try_begin(1).is_none());
        assert!(!b.is_empty());
    }
}
