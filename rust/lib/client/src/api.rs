use std::sync::Arc;

use nework_core::AppError;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Shared request executor for the repositories.
///
/// Turns every transport outcome into either a decoded value or an
/// [`AppError`]; nothing above this type sees a [`crate::TransportError`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// One round trip. Non-2xx statuses map through [`AppError::from_status`].
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let method = request.method;
        let path = request.path.clone();
        let resp = self.transport.execute(request).await.map_err(|e| {
            debug!(%method, path = %path, error = %e, "transport failure");
            if e.is_io() {
                AppError::Network
            } else {
                AppError::Unknown
            }
        })?;
        debug!(%method, path = %path, status = resp.status, "api call");

        if resp.is_success() {
            Ok(resp)
        } else {
            Err(AppError::from_status(resp.status, rejection_message(&resp)))
        }
    }

    /// Decode a single entity. An empty body is an error.
    pub async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, AppError> {
        let resp = self.send(request).await?;
        if is_blank(&resp.body) {
            debug!("empty entity body");
            return Err(AppError::Unknown);
        }
        decode(&resp.body)
    }

    /// Decode a list. An empty body is an empty list.
    pub async fn fetch_list<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<Vec<R>, AppError> {
        let resp = self.send(request).await?;
        if is_blank(&resp.body) {
            return Ok(Vec::new());
        }
        decode(&resp.body)
    }

    /// Fire a request whose body is ignored.
    pub async fn execute(&self, request: ApiRequest) -> Result<(), AppError> {
        self.send(request).await.map(|_| ())
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "undecodable response body");
        AppError::Unknown
    })
}

/// The server explains a 400 either as JSON (`reason` / `message`) or as
/// plain text.
fn rejection_message(resp: &ApiResponse) -> Option<String> {
    if resp.status != 400 {
        return None;
    }
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&resp.body) {
        let text = match &value {
            serde_json::Value::Object(map) => map
                .get("reason")
                .or_else(|| map.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        };
        return text.filter(|t| !t.trim().is_empty());
    }
    Some(resp.text().trim().to_string()).filter(|t| !t.is_empty())
}
