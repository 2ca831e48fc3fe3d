use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::watch;

/// Callback type for value change notifications.
pub type ChangeHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observable::subscribe`]; pass it to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A hot value: always holds the latest state and replays it to new
/// subscribers.
///
/// Two consumption styles share one source of truth:
/// - `subscribe(handler)` runs `handler` synchronously on every `set`,
///   and once immediately with the current value.
/// - `watch()` hands out a `tokio::sync::watch::Receiver` for async code.
///
/// Writes are serialized: a value is stored and delivered to every handler
/// before the next write starts, so the last value a handler saw is always
/// the stored one. Handlers must not write to the observable that calls them.
pub struct Observable<T> {
    tx: watch::Sender<T>,
    publish: Mutex<()>,
    handlers: RwLock<Vec<(SubscriptionId, ChangeHandler<T>)>>,
    next_id: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            tx,
            publish: Mutex::new(()),
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Store `value` and notify every subscriber.
    pub fn set(&self, value: T) {
        let _publishing = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        self.tx.send_replace(value.clone());
        self.notify(&value);
    }

    /// Modify the value in place. Subscribers are notified only when `f`
    /// returns true.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) {
        let _publishing = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        if self.tx.send_if_modified(f) {
            let value = self.get();
            self.notify(&value);
        }
    }

    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handler: ChangeHandler<T> = Arc::new(handler);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler.clone()));
        handler(&self.get());
        id
    }

    /// Returns true if a handler was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != id);
        handlers.len() != before
    }

    pub fn watch(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    fn notify(&self, value: &T) {
        // Clone the list so handlers may subscribe or unsubscribe re-entrantly.
        let handlers: Vec<ChangeHandler<T>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn subscribe_replays_current_value() {
        let obs = Observable::new(1);
        obs.set(2);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        obs.subscribe(move |v| s.lock().unwrap().push(*v));
        obs.set(3);

        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let obs = Observable::new(0);
        let seen = Arc::new(Mutex::new(0));
        let s = seen.clone();
        let id = obs.subscribe(move |_| *s.lock().unwrap() += 1);

        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        obs.set(5);
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn update_without_change_is_silent() {
        let obs = Observable::new(10);
        let seen = Arc::new(Mutex::new(0));
        let s = seen.clone();
        obs.subscribe(move |_| *s.lock().unwrap() += 1);

        obs.update(|_| false);
        obs.update(|v| {
            *v += 1;
            true
        });
        assert_eq!(obs.get(), 11);
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn watch_sees_latest() {
        let obs = Observable::new("a".to_string());
        let mut rx = obs.watch();
        obs.set("b".to_string());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "b");
    }

    #[test]
    fn concurrent_writers_deliver_in_store_order() {
        let obs = Arc::new(Observable::new(0));
        let last_seen = Arc::new(Mutex::new(0));
        let (entered_tx, entered_rx) = mpsc::channel();
        let (resume_tx, resume_rx) = mpsc::channel::<()>();
        let gate = Mutex::new((entered_tx, resume_rx));

        let seen = last_seen.clone();
        obs.subscribe(move |v| {
            if *v == 1 {
                let gate = gate.lock().unwrap();
                gate.0.send(()).unwrap();
                gate.1.recv().unwrap();
            }
            *seen.lock().unwrap() = *v;
        });

        let first = {
            let obs = obs.clone();
            std::thread::spawn(move || obs.set(1))
        };
        entered_rx.recv().unwrap();
        let second = {
            let obs = obs.clone();
            std::thread::spawn(move || obs.set(2))
        };

        // The second writer waits until the first has finished notifying.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(obs.get(), 1);

        resume_tx.send(()).unwrap();
        first.join().unwrap();
        second.join().unwrap();
        assert_eq!(obs.get(), 2);
        assert_eq!(*last_seen.lock().unwrap(), 2);
    }
}
