use nework_core::{AppError, Post};

use crate::api::ApiClient;
use crate::transport::ApiRequest;

#[derive(Clone)]
pub struct PostRepository {
    api: ApiClient,
}

impl PostRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all(&self) -> Result<Vec<Post>, AppError> {
        self.api.fetch_list(ApiRequest::get("api/posts")).await
    }

    pub async fn latest(&self, count: u32) -> Result<Vec<Post>, AppError> {
        self.api
            .fetch_list(ApiRequest::get("api/posts/latest").query("count", count))
            .await
    }

    /// Posts published after `id`.
    pub async fn newer(&self, id: i64, count: u32) -> Result<Vec<Post>, AppError> {
        self.api
            .fetch_list(ApiRequest::get(format!("api/posts/{}/newer", id)).query("count", count))
            .await
    }

    /// Posts published before `id`.
    pub async fn before(&self, id: i64, count: u32) -> Result<Vec<Post>, AppError> {
        self.api
            .fetch_list(ApiRequest::get(format!("api/posts/{}/before", id)).query("count", count))
            .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Post, AppError> {
        self.api.fetch(ApiRequest::get(format!("api/posts/{}", id))).await
    }

    /// Create (`id == 0`) or update a post. Returns the server's copy.
    pub async fn save(&self, post: &Post) -> Result<Post, AppError> {
        let body = serde_json::to_value(post).map_err(|_| AppError::Unknown)?;
        self.api.fetch(ApiRequest::post("api/posts").json(body)).await
    }

    pub async fn remove_by_id(&self, id: i64) -> Result<(), AppError> {
        self.api.execute(ApiRequest::delete(format!("api/posts/{}", id))).await
    }

    pub async fn like_by_id(&self, id: i64) -> Result<Post, AppError> {
        self.api.fetch(ApiRequest::post(format!("api/posts/{}/likes", id))).await
    }

    pub async fn dislike_by_id(&self, id: i64) -> Result<Post, AppError> {
        self.api.fetch(ApiRequest::delete(format!("api/posts/{}/likes", id))).await
    }

    /// Posts authored by one user.
    pub async fn wall(&self, author_id: i64) -> Result<Vec<Post>, AppError> {
        self.api
            .fetch_list(ApiRequest::get(format!("api/{}/wall", author_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FakeTransport};
    use crate::transport::{Method, RequestBody};
    use std::sync::Arc;

    fn repo() -> (Arc<FakeTransport>, PostRepository) {
        let fake = Arc::new(FakeTransport::new());
        (fake.clone(), PostRepository::new(ApiClient::new(fake)))
    }

    #[tokio::test]
    async fn paging_queries() {
        let (fake, repo) = repo();
        fake.respond_json(Method::Get, "api/posts/latest", &vec![testing::post(3, false)]);
        fake.respond_json(Method::Get, "api/posts/3/before", &vec![testing::post(2, false)]);
        fake.respond_json(Method::Get, "api/posts/3/newer", &Vec::<Post>::new());

        assert_eq!(repo.latest(10).await.unwrap()[0].id, 3);
        assert_eq!(repo.before(3, 5).await.unwrap()[0].id, 2);
        assert!(repo.newer(3, 5).await.unwrap().is_empty());

        let sent = fake.requests();
        assert_eq!(sent[0].query, vec![("count".to_string(), "10".to_string())]);
        assert_eq!(sent[1].query, vec![("count".to_string(), "5".to_string())]);
    }

    #[tokio::test]
    async fn like_and_dislike_hit_the_likes_resource() {
        let (fake, repo) = repo();
        fake.respond_json(Method::Post, "api/posts/4/likes", &testing::post(4, true));
        fake.respond_json(Method::Delete, "api/posts/4/likes", &testing::post(4, false));

        assert!(repo.like_by_id(4).await.unwrap().liked_by_me);
        assert!(!repo.dislike_by_id(4).await.unwrap().liked_by_me);
        assert_eq!(fake.requests().len(), 2);
    }

    #[tokio::test]
    async fn save_sends_json_draft() {
        let (fake, repo) = repo();
        fake.respond_json(Method::Post, "api/posts", &testing::post(9, false));

        let saved = repo.save(&Post::draft("hello")).await.unwrap();
        assert_eq!(saved.id, 9);
        match &fake.requests()[0].body {
            RequestBody::Json(v) => assert_eq!(v["content"], "hello"),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn remove_missing_post() {
        let (_, repo) = repo();
        assert_eq!(repo.remove_by_id(77).await, Err(AppError::NotFound));
    }

    #[tokio::test]
    async fn wall_path() {
        let (fake, repo) = repo();
        fake.respond_json(Method::Get, "api/12/wall", &vec![testing::post(1, false)]);
        assert_eq!(repo.wall(12).await.unwrap().len(), 1);
        assert_eq!(fake.count(Method::Get, "api/12/wall"), 1);
    }
}
