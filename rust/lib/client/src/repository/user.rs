use nework_core::{AppError, User};

use crate::api::ApiClient;
use crate::transport::ApiRequest;

#[derive(Clone)]
pub struct UserRepository {
    api: ApiClient,
}

impl UserRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, AppError> {
        self.api.fetch_list(ApiRequest::get("api/users")).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, AppError> {
        self.api.fetch(ApiRequest::get(format!("api/users/{}", id))).await
    }

    /// Users whose id is in `ids`, in the server's list order. One call to
    /// the users list; an empty `ids` makes no call at all.
    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let all = self.get_all().await?;
        Ok(all.into_iter().filter(|u| ids.contains(&u.id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FakeTransport};
    use crate::transport::Method;
    use std::sync::Arc;

    #[tokio::test]
    async fn get_by_ids_filters_one_list_call() {
        let fake = Arc::new(FakeTransport::new());
        let repo = UserRepository::new(ApiClient::new(fake.clone()));
        fake.respond_json(
            Method::Get,
            "api/users",
            &vec![testing::user(1), testing::user(2), testing::user(3)],
        );

        let users = repo.get_by_ids(&[3, 1]).await.unwrap();
        assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(fake.count(Method::Get, "api/users"), 1);

        assert!(repo.get_by_ids(&[]).await.unwrap().is_empty());
        assert_eq!(fake.count(Method::Get, "api/users"), 1);
    }
}
