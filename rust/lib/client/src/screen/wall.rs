use std::sync::Arc;

use nework_core::{AppError, Post, User};
use tracing::debug;

use super::posts::toggle_post_like;
use crate::feed::{FeedHolder, FeedSource, MutationOutcome};
use crate::observable::{Observable, SubscriptionId};
use crate::repository::{PostRepository, UserRepository};

/// Job label shown when none of the wall's posts names one.
pub const LOOKING_FOR_WORK: &str = "Looking for work";

struct WallFeed {
    repo: PostRepository,
    author_id: i64,
}

#[async_trait::async_trait]
impl FeedSource<Post> for WallFeed {
    async fn fetch(&self) -> Result<Vec<Post>, AppError> {
        self.repo.wall(self.author_id).await
    }
}

/// One user's posts, plus the user record and their last known job.
pub struct UserWallScreen {
    feed: FeedHolder<Post>,
    posts: PostRepository,
    users: UserRepository,
    user_id: i64,
    user: Observable<Option<User>>,
    last_job: Observable<Option<String>>,
}

impl UserWallScreen {
    pub fn new(posts: PostRepository, users: UserRepository, user_id: i64) -> Self {
        let source = WallFeed {
            repo: posts.clone(),
            author_id: user_id,
        };
        Self {
            feed: FeedHolder::new(Arc::new(source)),
            posts,
            users,
            user_id,
            user: Observable::new(None),
            last_job: Observable::new(None),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn feed(&self) -> &FeedHolder<Post> {
        &self.feed
    }

    pub fn user(&self) -> Option<User> {
        self.user.get()
    }

    /// `None` until the wall has been fetched once.
    pub fn last_job(&self) -> Option<String> {
        self.last_job.get()
    }

    pub fn subscribe_user(&self, handler: impl Fn(&Option<User>) + Send + Sync + 'static) -> SubscriptionId {
        self.user.subscribe(handler)
    }

    pub fn subscribe_last_job(
        &self,
        handler: impl Fn(&Option<String>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.last_job.subscribe(handler)
    }

    /// Fetch the user record (best effort) and the wall, both under
    /// `Loading`.
    pub async fn load(&self) -> Result<(), AppError> {
        self.feed.load_with(self.fetch_user()).await?;
        self.derive_last_job();
        Ok(())
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.feed.refresh_with(self.fetch_user()).await?;
        self.derive_last_job();
        Ok(())
    }

    pub async fn toggle_like(&self, id: i64) -> MutationOutcome {
        toggle_post_like(&self.feed, &self.posts, id).await
    }

    pub async fn remove(&self, id: i64) -> MutationOutcome {
        let repo = self.posts.clone();
        self.feed
            .remove_with(id, |id| async move { repo.remove_by_id(id).await })
            .await
    }

    async fn fetch_user(&self) {
        match self.users.get_by_id(self.user_id).await {
            Ok(user) => self.user.set(Some(user)),
            Err(e) => debug!(user_id = self.user_id, error = %e, "wall owner not loaded"),
        }
    }

    fn derive_last_job(&self) {
        let job = self
            .feed
            .snapshot()
            .items()
            .iter()
            .find_map(|p| p.author_job.clone().filter(|j| !j.is_empty()))
            .unwrap_or_else(|| LOOKING_FOR_WORK.to_string());
        self.last_job.set(Some(job));
    }
}
