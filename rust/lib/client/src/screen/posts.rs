use std::sync::Arc;

use nework_core::{AppError, Post};

use crate::feed::{FeedHolder, FeedSource, MutationOutcome};
use crate::repository::PostRepository;

#[async_trait::async_trait]
impl FeedSource<Post> for PostRepository {
    async fn fetch(&self) -> Result<Vec<Post>, AppError> {
        self.get_all().await
    }
}

pub struct PostsScreen {
    feed: FeedHolder<Post>,
    repo: PostRepository,
}

impl PostsScreen {
    pub fn new(repo: PostRepository) -> Self {
        Self {
            feed: FeedHolder::new(Arc::new(repo.clone())),
            repo,
        }
    }

    pub fn feed(&self) -> &FeedHolder<Post> {
        &self.feed
    }

    pub async fn load(&self) -> Result<(), AppError> {
        self.feed.load().await
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.feed.refresh().await
    }

    /// Like or unlike depending on the post's current `likedByMe`.
    pub async fn toggle_like(&self, id: i64) -> MutationOutcome {
        toggle_post_like(&self.feed, &self.repo, id).await
    }

    pub async fn remove(&self, id: i64) -> MutationOutcome {
        let repo = self.repo.clone();
        self.feed
            .remove_with(id, |id| async move { repo.remove_by_id(id).await })
            .await
    }
}

pub(crate) async fn toggle_post_like(feed: &FeedHolder<Post>, repo: &PostRepository, id: i64) -> MutationOutcome {
    let repo = repo.clone();
    feed.mutate(id, |post| async move {
        if post.liked_by_me {
            repo.dislike_by_id(post.id).await
        } else {
            repo.like_by_id(post.id).await
        }
    })
    .await
}
