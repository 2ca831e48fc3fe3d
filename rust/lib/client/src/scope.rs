use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Owns every task launched on behalf of one screen.
///
/// Closing or dropping the scope cancels outstanding tasks at their next
/// suspension point. A cancelled task resolves to `None` and commits
/// nothing, because holders only write state after a network call returns.
pub struct ScreenScope {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenScope {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Spawn one user action. Must be called inside a tokio runtime.
    pub fn launch<F>(&self, action: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                out = action => Some(out),
            }
        })
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of launched tasks that have not finished yet.
    pub fn active(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel without waiting.
    pub fn cancel(&self) {
        self.token.cancel();
        self.tracker.close();
    }

    /// Cancel and wait until every task has unwound.
    pub async fn close(&self) {
        self.cancel();
        self.tracker.wait().await;
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::feed::FeedStatus;
    use crate::repository::PostRepository;
    use crate::screen::PostsScreen;
    use crate::testing::{self, FakeTransport};
    use crate::transport::Method;
    use std::sync::Arc;

    #[tokio::test]
    async fn finished_action_yields_output() {
        let scope = ScreenScope::new();
        assert_eq!(scope.launch(async { 5 }).await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn closing_discards_in_flight_toggle() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_json(Method::Get, "api/posts", &vec![testing::post(1, false)]);
        fake.respond_json(Method::Post, "api/posts/1/likes", &testing::post(1, true));
        let screen = Arc::new(PostsScreen::new(PostRepository::new(ApiClient::new(fake.clone()))));
        screen.load().await.unwrap();
        let before = screen.feed().snapshot();

        let scope = ScreenScope::new();
        let hold = fake.hold(Method::Post, "api/posts/1/likes");
        let task = {
            let screen = screen.clone();
            scope.launch(async move { screen.toggle_like(1).await })
        };
        hold.started.notified().await;

        scope.close().await;
        hold.release.notify_one();

        assert_eq!(task.await.unwrap(), None);
        assert!(scope.is_closed());
        assert_eq!(*screen.feed().snapshot(), *before);
        assert!(!screen.feed().is_pending(1));
    }

    #[tokio::test]
    async fn cancelled_load_does_not_stay_busy() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_json(Method::Get, "api/posts", &vec![testing::post(1, false)]);
        let screen = Arc::new(PostsScreen::new(PostRepository::new(ApiClient::new(fake.clone()))));

        let scope = ScreenScope::new();
        let hold = fake.hold(Method::Get, "api/posts");
        let task = {
            let screen = screen.clone();
            scope.launch(async move { screen.load().await })
        };
        hold.started.notified().await;
        assert_eq!(screen.feed().status(), FeedStatus::Loading);

        scope.close().await;
        hold.release.notify_one();

        assert_eq!(task.await.unwrap(), None);
        assert_eq!(screen.feed().status(), FeedStatus::Idle);
        assert_eq!(screen.feed().snapshot().len(), 0);
    }

    #[tokio::test]
    async fn drop_cancels() {
        let scope = ScreenScope::new();
        let task = scope.launch(std::future::pending::<()>());
        drop(scope);
        assert_eq!(task.await.unwrap(), None);
    }
}
