use std::sync::Arc;

use nework_core::{AppError, Job};

use crate::feed::{FeedHolder, FeedSource, MutationOutcome};
use crate::repository::JobRepository;

/// Whose jobs a [`JobsScreen`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOwner {
    /// The signed-in user; entries may be added and removed.
    Me,
    User(i64),
}

struct JobFeed {
    repo: JobRepository,
    owner: JobOwner,
}

#[async_trait::async_trait]
impl FeedSource<Job> for JobFeed {
    async fn fetch(&self) -> Result<Vec<Job>, AppError> {
        match self.owner {
            JobOwner::Me => self.repo.my_jobs().await,
            JobOwner::User(id) => self.repo.for_user(id).await,
        }
    }
}

pub struct JobsScreen {
    feed: FeedHolder<Job>,
    repo: JobRepository,
    owner: JobOwner,
}

impl JobsScreen {
    pub fn new(repo: JobRepository, owner: JobOwner) -> Self {
        let source = JobFeed {
            repo: repo.clone(),
            owner,
        };
        Self {
            feed: FeedHolder::new(Arc::new(source)),
            repo,
            owner,
        }
    }

    pub fn owner(&self) -> JobOwner {
        self.owner
    }

    pub fn feed(&self) -> &FeedHolder<Job> {
        &self.feed
    }

    pub async fn load(&self) -> Result<(), AppError> {
        self.feed.load().await
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.feed.refresh().await
    }

    /// Delete one of the signed-in user's jobs. Another user's list is
    /// read-only and answers `Failed(Auth)` without a call.
    pub async fn remove(&self, id: i64) -> MutationOutcome {
        if self.owner != JobOwner::Me {
            return MutationOutcome::Failed(AppError::Auth);
        }
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
    use crate::testing::{self, FakeTransport};
    use crate::transport::Method;

    #[tokio::test]
    async fn own_jobs_can_be_removed() {
        let fake = Arc::new(FakeTransport::new());
        let screen = JobsScreen::new(JobRepository::new(ApiClient::new(fake.clone())), JobOwner::Me);
        fake.respond_json(Method::Get, "api/my/jobs", &vec![testing::job(1), testing::job(2)]);
        fake.respond(Method::Delete, "api/my/jobs/1", 200, "");

        screen.load().await.unwrap();
        assert!(screen.remove(1).await.is_applied());
        assert_eq!(screen.feed().snapshot().items(), &[testing::job(2)]);
    }

    #[tokio::test]
    async fn foreign_jobs_are_read_only() {
        let fake = Arc::new(FakeTransport::new());
        let screen = JobsScreen::new(JobRepository::new(ApiClient::new(fake.clone())), JobOwner::User(4));
        fake.respond_json(Method::Get, "api/4/jobs", &vec![testing::job(1)]);

        screen.load().await.unwrap();
        assert_eq!(screen.remove(1).await, MutationOutcome::Failed(AppError::Auth));
        assert_eq!(fake.requests().len(), 1);
    }
}
