use nework_core::{AppError, PushToken, Token};

use super::media::LocalFile;
use crate::api::ApiClient;
use crate::transport::ApiRequest;

#[derive(Clone)]
pub struct AuthRepository {
    api: ApiClient,
}

impl AuthRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Form-encoded `login` / `pass`.
    pub async fn sign_in(&self, login: &str, pass: &str) -> Result<Token, AppError> {
        let request = ApiRequest::post("api/users/authentication").form(&[("login", login), ("pass", pass)]);
        self.api.fetch(request).await
    }

    /// Multipart registration with an optional avatar in `file`.
    pub async fn sign_up(
        &self,
        login: &str,
        pass: &str,
        name: &str,
        avatar: Option<&LocalFile>,
    ) -> Result<Token, AppError> {
        let files = avatar
            .map(|f| vec![f.part("file", f.mime.as_deref().unwrap_or("image/*"))])
            .unwrap_or_default();
        let request = ApiRequest::post("api/users/registration")
            .multipart(&[("login", login), ("pass", pass), ("name", name)], files);
        self.api.fetch(request).await
    }

    pub async fn save_push_token(&self, token: &PushToken) -> Result<(), AppError> {
        let body = serde_json::to_value(token).map_err(|_| AppError::Unknown)?;
        self.api
            .execute(ApiRequest::post("api/users/push-tokens").json(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use crate::transport::{Method, RequestBody};
    use std::sync::Arc;

    fn repo() -> (Arc<FakeTransport>, AuthRepository) {
        let fake = Arc::new(FakeTransport::new());
        (fake.clone(), AuthRepository::new(ApiClient::new(fake)))
    }

    #[tokio::test]
    async fn sign_in_is_form_encoded() {
        let (fake, repo) = repo();
        fake.respond(Method::Post, "api/users/authentication", 200, r#"{"id":7,"token":"t"}"#);

        let token = repo.sign_in("alice", "pw").await.unwrap();
        assert_eq!(token.id, 7);
        assert_eq!(
            fake.requests()[0].body,
            RequestBody::Form(vec![
                ("login".to_string(), "alice".to_string()),
                ("pass".to_string(), "pw".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn sign_up_without_avatar_has_no_file() {
        let (fake, repo) = repo();
        fake.respond(Method::Post, "api/users/registration", 200, r#"{"id":8,"token":"t8"}"#);

        repo.sign_up("bob", "pw", "Bob", None).await.unwrap();
        match &fake.requests()[0].body {
            RequestBody::Multipart { fields, files } => {
                assert_eq!(fields.len(), 3);
                assert_eq!(fields[2], ("name".to_string(), "Bob".to_string()));
                assert!(files.is_empty());
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn sign_up_avatar_keeps_its_type() {
        let (fake, repo) = repo();
        fake.respond(Method::Post, "api/users/registration", 200, r#"{"id":8,"token":"t8"}"#);

        let avatar = LocalFile::new("me.png", vec![0x89]);
        repo.sign_up("bob", "pw", "Bob", Some(&avatar)).await.unwrap();
        match &fake.requests()[0].body {
            RequestBody::Multipart { files, .. } => assert_eq!(files[0].mime, "image/png"),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn push_token() {
        let (fake, repo) = repo();
        fake.respond(Method::Post, "api/users/push-tokens", 200, "");
        repo.save_push_token(&PushToken { token: "p".into() }).await.unwrap();
        assert_eq!(fake.count(Method::Post, "api/users/push-tokens"), 1);
    }
}
