//! Single-entity views.

use std::future::Future;

use nework_core::{AppError, Event, Identified, Post, User};
use tokio::sync::watch;
use tracing::debug;

use crate::feed::MutationOutcome;
use crate::observable::{Observable, SubscriptionId};
use crate::pending::PendingSet;
use crate::repository::{EventRepository, PostRepository, UserRepository};

#[derive(Debug, Clone, PartialEq)]
pub struct DetailState<T> {
    pub entity: Option<T>,
    pub busy: bool,
    pub error: Option<AppError>,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            entity: None,
            busy: false,
            error: None,
        }
    }
}

/// Shared plumbing: the observable state and the pending marker.
struct Detail<T> {
    state: Observable<DetailState<T>>,
    pending: PendingSet,
}

impl<T: Identified + Clone + Send + Sync + 'static> Detail<T> {
    fn new() -> Self {
        Self {
            state: Observable::new(DetailState::default()),
            pending: PendingSet::new(),
        }
    }

    fn entity(&self) -> Option<T> {
        self.state.get().entity
    }

    async fn load<Fut>(&self, fetch: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.state.update(|s| {
            s.busy = true;
            s.error = None;
            true
        });
        let result = fetch.await;
        self.state.update(|s| {
            s.busy = false;
            match &result {
                Ok(entity) => s.entity = Some(entity.clone()),
                Err(e) => s.error = Some(e.clone()),
            }
            true
        });
        result
    }

    async fn mutate<F, Fut>(&self, call: F) -> MutationOutcome
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let Some(entity) = self.entity() else {
            return MutationOutcome::Missing;
        };
        let Some(_guard) = self.pending.try_begin(entity.id()) else {
            return MutationOutcome::Pending;
        };
        match call(entity).await {
            Ok(updated) => {
                self.state.update(|s| {
                    s.entity = Some(updated);
                    s.error = None;
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

    fn report(&self, error: AppError) {
        self.state.update(|s| {
            s.error = Some(error);
            true
        });
    }
}

// ── Post ────────────────────────────────────────────────────────────

pub struct PostDetail {
    detail: Detail<Post>,
    mentioned: Observable<Vec<User>>,
    posts: PostRepository,
    users: UserRepository,
}

impl PostDetail {
    pub fn new(posts: PostRepository, users: UserRepository) -> Self {
        Self {
            detail: Detail::new(),
            mentioned: Observable::new(Vec::new()),
            posts,
            users,
        }
    }

    pub fn state(&self) -> DetailState<Post> {
        self.detail.state.get()
    }

    pub fn subscribe(&self, handler: impl Fn(&DetailState<Post>) + Send + Sync + 'static) -> SubscriptionId {
        self.detail.state.subscribe(handler)
    }

    pub fn watch(&self) -> watch::Receiver<DetailState<Post>> {
        self.detail.state.watch()
    }

    pub fn mentioned(&self) -> Vec<User> {
        self.mentioned.get()
    }

    /// Fetch the post, then the users it mentions. A failed user lookup
    /// leaves the mention list empty.
    pub async fn load(&self, id: i64) -> Result<(), AppError> {
        let post = self.detail.load(self.posts.get_by_id(id)).await?;
        let mentioned = match self.users.get_by_ids(&post.mention_ids).await {
            Ok(users) => users,
            Err(e) => {
                debug!(post_id = id, error = %e, "mentioned users not loaded");
                Vec::new()
            }
        };
        self.mentioned.set(mentioned);
        Ok(())
    }

    pub async fn toggle_like(&self) -> MutationOutcome {
        let repo = self.posts.clone();
        self.detail
            .mutate(|post| async move {
                if post.liked_by_me {
                    repo.dislike_by_id(post.id).await
                } else {
                    repo.like_by_id(post.id).await
                }
            })
            .await
    }
}

// ── Event ───────────────────────────────────────────────────────────

pub struct EventDetail {
    detail: Detail<Event>,
    speakers: Observable<Vec<User>>,
    participants: Observable<Vec<User>>,
    events: EventRepository,
    users: UserRepository,
}

impl EventDetail {
    pub fn new(events: EventRepository, users: UserRepository) -> Self {
        Self {
            detail: Detail::new(),
            speakers: Observable::new(Vec::new()),
            participants: Observable::new(Vec::new()),
            events,
            users,
        }
    }

    pub fn state(&self) -> DetailState<Event> {
        self.detail.state.get()
    }

    pub fn subscribe(&self, handler: impl Fn(&DetailState<Event>) + Send + Sync + 'static) -> SubscriptionId {
        self.detail.state.subscribe(handler)
    }

    pub fn watch(&self) -> watch::Receiver<DetailState<Event>> {
        self.detail.state.watch()
    }

    pub fn speakers(&self) -> Vec<User> {
        self.speakers.get()
    }

    pub fn participants(&self) -> Vec<User> {
        self.participants.get()
    }

    /// Fetch the event, then resolve speakers and participants from a
    /// single users listing (best effort).
    pub async fn load(&self, id: i64) -> Result<(), AppError> {
        let event = self.detail.load(self.events.get_by_id(id)).await?;
        self.resolve_people(&event).await;
        Ok(())
    }

    async fn resolve_people(&self, event: &Event) {
        if event.speaker_ids.is_empty() && event.participants_ids.is_empty() {
            self.speakers.set(Vec::new());
            self.participants.set(Vec::new());
            return;
        }
        match self.users.get_all().await {
            Ok(all) => {
                let pick = |ids: &[i64]| all.iter().filter(|u| ids.contains(&u.id)).cloned().collect();
                self.speakers.set(pick(&event.speaker_ids));
                self.participants.set(pick(&event.participants_ids));
            }
            Err(e) => debug!(event_id = event.id, error = %e, "event people not loaded"),
        }
    }

    pub async fn toggle_like(&self) -> MutationOutcome {
        let repo = self.events.clone();
        self.detail
            .mutate(|event| async move {
                if event.liked_by_me {
                    repo.dislike_by_id(event.id).await
                } else {
                    repo.like_by_id(event.id).await
                }
            })
            .await
    }

    /// Join or leave, then refresh the participant list.
    pub async fn toggle_participation(&self) -> MutationOutcome {
        let repo = self.events.clone();
        let outcome = self
            .detail
            .mutate(|event| async move {
                if event.participated_by_me {
                    repo.cancel_participation(event.id).await
                } else {
                    repo.participate(event.id).await
                }
            })
            .await;
        if outcome.is_applied() {
            if let Some(event) = self.detail.entity() {
                self.resolve_people(&event).await;
            }
        }
        outcome
    }

    /// Delete the event. On success the view holds no entity.
    pub async fn remove(&self) -> MutationOutcome {
        let Some(event) = self.detail.entity() else {
            return MutationOutcome::Missing;
        };
        let Some(_guard) = self.detail.pending.try_begin(event.id) else {
            return MutationOutcome::Pending;
        };
        match self.events.remove_by_id(event.id).await {
            Ok(()) => {
                self.detail.state.set(DetailState::default());
                MutationOutcome::Applied
            }
            Err(e) => {
                self.detail.report(e.clone());
                MutationOutcome::Failed(e)
            }
        }
    }
}

// ── Profile ─────────────────────────────────────────────────────────

pub struct ProfileDetail {
    detail: Detail<User>,
    users: UserRepository,
}

impl ProfileDetail {
    pub fn new(users: UserRepository) -> Self {
        Self {
            detail: Detail::new(),
            users,
        }
    }

    pub fn state(&self) -> DetailState<User> {
        self.detail.state.get()
    }

    pub fn subscribe(&self, handler: impl Fn(&DetailState<User>) + Send + Sync + 'static) -> SubscriptionId {
        self.detail.state.subscribe(handler)
    }

    pub async fn load(&self, user_id: i64) -> Result<(), AppError> {
        self.detail.load(self.users.get_by_id(user_id)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::testing::{self, FakeTransport};
    use crate::transport::Method;
    use std::sync::Arc;

    fn api(fake: &Arc<FakeTransport>) -> ApiClient {
        ApiClient::new(fake.clone())
    }

    #[tokio::test]
    async fn post_with_mentions() {
        let fake = Arc::new(FakeTransport::new());
        let mut post = testing::post(1, false);
        post.mention_ids = vec![2];
        fake.respond_json(Method::Get, "api/posts/1", &post);
        fake.respond_json(Method::Get, "api/users", &vec![testing::user(1), testing::user(2)]);

        let detail = PostDetail::new(PostRepository::new(api(&fake)), UserRepository::new(api(&fake)));
        detail.load(1).await.unwrap();

        let state = detail.state();
        assert!(!state.busy);
        assert_eq!(state.entity.unwrap().id, 1);
        assert_eq!(detail.mentioned(), vec![testing::user(2)]);
    }

    #[tokio::test]
    async fn mention_lookup_failure_is_ignored() {
        let fake = Arc::new(FakeTransport::new());
        let mut post = testing::post(1, false);
        post.mention_ids = vec![2];
        fake.respond_json(Method::Get, "api/posts/1", &post);
        fake.respond(Method::Get, "api/users", 500, "");

        let detail = PostDetail::new(PostRepository::new(api(&fake)), UserRepository::new(api(&fake)));
        detail.load(1).await.unwrap();
        assert!(detail.mentioned().is_empty());
        assert_eq!(detail.state().error, None);
    }

    #[tokio::test]
    async fn missing_post() {
        let fake = Arc::new(FakeTransport::new());
        let detail = PostDetail::new(PostRepository::new(api(&fake)), UserRepository::new(api(&fake)));

        assert_eq!(detail.load(9).await, Err(AppError::NotFound));
        assert_eq!(detail.state().error, Some(AppError::NotFound));
        assert_eq!(detail.toggle_like().await, MutationOutcome::Missing);
    }

    #[tokio::test]
    async fn post_like_uses_server_copy() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_json(Method::Get, "api/posts/1", &testing::post(1, false));
        let mut liked = testing::post(1, true);
        liked.like_owner_ids = vec![7, 8];
        fake.respond_json(Method::Post, "api/posts/1/likes", &liked);

        let detail = PostDetail::new(PostRepository::new(api(&fake)), UserRepository::new(api(&fake)));
        detail.load(1).await.unwrap();
        assert!(detail.toggle_like().await.is_applied());
        assert_eq!(detail.state().entity, Some(liked));
    }

    #[tokio::test]
    async fn event_people_from_one_listing() {
        let fake = Arc::new(FakeTransport::new());
        let mut event = testing::event(4, false, false);
        event.speaker_ids = vec![1];
        event.participants_ids = vec![2, 3];
        fake.respond_json(Method::Get, "api/events/4", &event);
        fake.respond_json(
            Method::Get,
            "api/users",
            &vec![testing::user(1), testing::user(2), testing::user(3)],
        );

        let detail = EventDetail::new(EventRepository::new(api(&fake)), UserRepository::new(api(&fake)));
        detail.load(4).await.unwrap();
        assert_eq!(detail.speakers(), vec![testing::user(1)]);
        assert_eq!(detail.participants().len(), 2);
        assert_eq!(fake.count(Method::Get, "api/users"), 1);
    }

    #[tokio::test]
    async fn joining_refreshes_participants() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_json(Method::Get, "api/events/4", &testing::event(4, false, false));
        fake.respond_json(Method::Post, "api/events/4/participants", &testing::event(4, false, true));
        fake.respond_json(Method::Get, "api/users", &vec![testing::user(1)]);

        let detail = EventDetail::new(EventRepository::new(api(&fake)), UserRepository::new(api(&fake)));
        detail.load(4).await.unwrap();
        assert!(detail.participants().is_empty());

        assert!(detail.toggle_participation().await.is_applied());
        assert!(detail.state().entity.unwrap().participated_by_me);
        assert_eq!(detail.participants(), vec![testing::user(1)]);
    }

    #[tokio::test]
    async fn removing_event_clears_view() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_json(Method::Get, "api/events/4", &testing::event(4, false, false));
        fake.respond(Method::Delete, "api/events/4", 200, "");

        let detail = EventDetail::new(EventRepository::new(api(&fake)), UserRepository::new(api(&fake)));
        detail.load(4).await.unwrap();
        assert!(detail.remove().await.is_applied());
        assert_eq!(detail.state(), DetailState::default());
    }

    #[tokio::test]
    async fn profile() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_json(Method::Get, "api/users/5", &testing::user(5));
        let detail = ProfileDetail::new(UserRepository::new(api(&fake)));
        detail.load(5).await.unwrap();
        assert_eq!(detail.state().entity, Some(testing::user(5)));
    }
}
