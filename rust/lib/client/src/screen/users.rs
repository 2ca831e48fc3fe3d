use std::sync::Arc;

use nework_core::{AppError, User};

use crate::feed::{FeedHolder, FeedSource};
use crate::repository::UserRepository;

#[async_trait::async_trait]
impl FeedSource<User> for UserRepository {
    async fn fetch(&self) -> Result<Vec<User>, AppError> {
        self.get_all().await
    }
}

/// Read-only directory of users.
pub struct UsersScreen {
    feed: FeedHolder<User>,
}

impl UsersScreen {
    pub fn new(repo: UserRepository) -> Self {
        Self {
            feed: FeedHolder::new(Arc::new(repo)),
        }
    }

    pub fn feed(&self) -> &FeedHolder<User> {
        &self.feed
    }

    pub async fn load(&self) -> Result<(), AppError> {
        self.feed.load().await
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.feed.refresh().await
    }
}
