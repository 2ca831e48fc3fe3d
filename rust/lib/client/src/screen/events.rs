use std::sync::Arc;

use nework_core::{AppError, Event};

use crate::feed::{FeedHolder, FeedSource, MutationOutcome};
use crate::repository::EventRepository;

#[async_trait::async_trait]
impl FeedSource<Event> for EventRepository {
    async fn fetch(&self) -> Result<Vec<Event>, AppError> {
        self.get_all().await
    }
}

pub struct EventsScreen {
    feed: FeedHolder<Event>,
    repo: EventRepository,
}

impl EventsScreen {
    pub fn new(repo: EventRepository) -> Self {
        Self {
            feed: FeedHolder::new(Arc::new(repo.clone())),
            repo,
        }
    }

    pub fn feed(&self) -> &FeedHolder<Event> {
        &self.feed
    }

    pub async fn load(&self) -> Result<(), AppError> {
        self.feed.load().await
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.feed.refresh().await
    }

    pub async fn toggle_like(&self, id: i64) -> MutationOutcome {
        let repo = self.repo.clone();
        self.feed
            .mutate(id, |event| async move {
                if event.liked_by_me {
                    repo.dislike_by_id(event.id).await
                } else {
                    repo.like_by_id(event.id).await
                }
            })
            .await
    }

    /// Join or leave depending on `participatedByMe`.
    pub async fn toggle_participation(&self, id: i64) -> MutationOutcome {
        let repo = self.repo.clone();
        self.feed
            .mutate(id, |event| async move {
                if event.participated_by_me {
                    repo.cancel_participation(event.id).await
                } else {
                    repo.participate(event.id).await
                }
            })
            .await
    }

    pub async fn remove(&self, id: i64) -> MutationOutcome {
        let repo = self.repo.clone();
        self.feed
            .remove_with(id, |id| async move { repo.remove_by_id(id).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::feed::FeedStatus;
    use crate::testing::{self, FakeTransport};
    use crate::transport::Method;

    fn screen() -> (Arc<FakeTransport>, EventsScreen) {
        let fake = Arc::new(FakeTransport::new());
        let repo = EventRepository::new(ApiClient::new(fake.clone()));
        (fake, EventsScreen::new(repo))
    }

    #[tokio::test]
    async fn participation_follows_current_flag() {
        let (fake, screen) = screen();
        fake.respond_json(Method::Get, "api/events", &vec![testing::event(3, false, true)]);
        fake.respond_json(Method::Delete, "api/events/3/participants", &testing::event(3, false, false));
        screen.load().await.unwrap();

        assert!(screen.toggle_participation(3).await.is_applied());
        assert_eq!(fake.count(Method::Post, "api/events/3/participants"), 0);
        assert!(!screen.feed().snapshot().get(3).unwrap().participated_by_me);
    }

    #[tokio::test]
    async fn like_and_participation_share_pending_marker() {
        let (fake, screen) = screen();
        fake.respond_json(Method::Get, "api/events", &vec![testing::event(3, false, false)]);
        fake.respond_json(Method::Post, "api/events/3/likes", &testing::event(3, true, false));
        screen.load().await.unwrap();

        let screen = Arc::new(screen);
        let hold = fake.hold(Method::Post, "api/events/3/likes");
        let like = {
            let screen = screen.clone();
            tokio::spawn(async move { screen.toggle_like(3).await })
        };
        hold.started.notified().await;
        assert_eq!(screen.toggle_participation(3).await, MutationOutcome::Pending);
        hold.release.notify_one();
        assert!(like.await.unwrap().is_applied());
    }

    #[tokio::test]
    async fn forbidden_participation_reports_auth() {
        let (fake, screen) = screen();
        fake.respond_json(Method::Get, "api/events", &vec![testing::event(3, false, false)]);
        fake.respond(Method::Post, "api/events/3/participants", 403, "");
        screen.load().await.unwrap();

        assert_eq!(
            screen.toggle_participation(3).await,
            MutationOutcome::Failed(AppError::Auth)
        );
        assert_eq!(screen.feed().status(), FeedStatus::Error(AppError::Auth));
        assert!(!screen.feed().snapshot().get(3).unwrap().participated_by_me);
    }
}
