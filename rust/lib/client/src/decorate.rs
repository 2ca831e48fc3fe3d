use std::sync::Arc;

use crate::auth::TokenSource;
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

pub const API_KEY_HEADER: &str = "Api-Key";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Attach the static API key and, when signed in, the bearer token.
///
/// A missing or empty token leaves `Authorization` off entirely; it is
/// never sent with an empty value.
pub fn decorate(request: ApiRequest, api_key: &str, token: Option<&str>) -> ApiRequest {
    let request = request.with_header(API_KEY_HEADER, api_key);
    match token.filter(|t| !t.is_empty()) {
        Some(token) => request.with_header(AUTHORIZATION_HEADER, format!("Bearer {}", token)),
        None => request,
    }
}

/// Transport wrapper that runs [`decorate`] on every request, reading the
/// token at send time.
pub struct AuthenticatedTransport {
    inner: Arc<dyn Transport>,
    tokens: Arc<dyn TokenSource>,
    api_key: String,
}

impl AuthenticatedTransport {
    pub fn new(inner: Arc<dyn Transport>, tokens: Arc<dyn TokenSource>, api_key: impl Into<String>) -> Self {
        Self {
            inner,
            tokens,
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl Transport for AuthenticatedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let token = self.tokens.token();
        self.inner
            .execute(decorate(request, &self.api_key, token.as_deref()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AppAuth, Credential};
    use crate::testing::FakeTransport;

    #[test]
    fn anonymous_request_has_only_api_key() {
        let req = decorate(ApiRequest::get("api/posts"), "key-1", None);
        assert_eq!(req.header(API_KEY_HEADER), Some("key-1"));
        assert_eq!(req.header(AUTHORIZATION_HEADER), None);
    }

    #[test]
    fn empty_token_is_not_sent() {
        let req = decorate(ApiRequest::get("api/posts"), "k", Some(""));
        assert_eq!(req.header(AUTHORIZATION_HEADER), None);
    }

    #[test]
    fn token_becomes_bearer_header() {
        let req = decorate(ApiRequest::get("api/posts"), "k", Some("abc"));
        assert_eq!(req.header(AUTHORIZATION_HEADER), Some("Bearer abc"));
        assert_eq!(req.headers.len(), 2);
    }

    #[tokio::test]
    async fn reads_token_at_send_time() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_json(crate::transport::Method::Get, "api/posts", &serde_json::json!([]));
        let auth = Arc::new(AppAuth::in_memory());
        let transport = AuthenticatedTransport::new(fake.clone(), auth.clone(), "k");

        transport.execute(ApiRequest::get("api/posts")).await.unwrap();
        auth.set_credential(Some(Credential {
            id: 3,
            token: "t3".into(),
            avatar: None,
        }));
        transport.execute(ApiRequest::get("api/posts")).await.unwrap();

        let sent = fake.requests();
        assert_eq!(sent[0].header(AUTHORIZATION_HEADER), None);
        assert_eq!(sent[1].header(AUTHORIZATION_HEADER), Some("Bearer t3"));
        assert!(sent.iter().all(|r| r.header(API_KEY_HEADER) == Some("k")));
    }
}
