//! Scripted transport and entity builders shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use nework_core::{Event, Job, Post, User};
use tokio::sync::Notify;

use crate::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};

type Route = (Method, String);

#[derive(Clone)]
enum Scripted {
    Reply(ApiResponse),
    Fail(TransportError),
}

/// Pauses one request on a route until the test releases it.
#[derive(Clone, Default)]
pub struct Hold {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// In-process stand-in for the backend.
///
/// Responses are scripted per `(method, path)`. Queued responses are used
/// in order; the last one stays in place for every later call. Unscripted
/// routes answer 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<Route, VecDeque<Scripted>>>,
    holds: Mutex<HashMap<Route, Hold>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Replace the script for a route with one response.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.routes.lock().unwrap().remove(&(method, path.to_string()));
        self.then(method, path, status, body);
    }

    /// Append a response after those already scripted.
    pub fn then(&self, method: Method, path: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.push(
            method,
            path,
            Scripted::Reply(ApiResponse {
                status,
                body: body.into(),
            }),
        );
    }

    pub fn respond_json<T: serde::Serialize>(&self, method: Method, path: &str, value: &T) {
        self.respond(method, path, 200, serde_json::to_vec(value).unwrap());
    }

    pub fn fail(&self, method: Method, path: &str, error: TransportError) {
        self.routes.lock().unwrap().remove(&(method, path.to_string()));
        self.push(method, path, Scripted::Fail(error));
    }

    /// Make the next request on a route wait for `hold.release`.
    pub fn hold(&self, method: Method, path: &str) -> Hold {
        let hold = Hold::default();
        self.holds
            .lock()
            .unwrap()
            .insert((method, path.to_string()), hold.clone());
        hold
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let route = (request.method, request.path.clone());
        self.sent.lock().unwrap().push(request);

        let scripted = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&route) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        let hold = self.holds.lock().unwrap().remove(&route);
        if let Some(hold) = hold {
            hold.started.notify_one();
            hold.release.notified().await;
        }

        match scripted {
            Some(Scripted::Reply(resp)) => Ok(resp),
            Some(Scripted::Fail(e)) => Err(e),
            None => Ok(ApiResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

// ── Builders ────────────────────────────────────────────────────────

pub fn post(id: i64, liked: bool) -> Post {
    Post {
        id,
        author: format!("author-{}", id),
        author_id: 100 + id,
        content: format!("post {}", id),
        published: "2024-05-01T10:00:00Z".into(),
        liked_by_me: liked,
        like_owner_ids: if liked { vec![1] } else { Vec::new() },
        ..Default::default()
    }
}

pub fn event(id: i64, liked: bool, participating: bool) -> Event {
    Event {
        id,
        author: format!("author-{}", id),
        author_id: 100 + id,
        content: format!("event {}", id),
        datetime: "2024-06-01T18:00:00Z".into(),
        published: "2024-05-01T10:00:00Z".into(),
        liked_by_me: liked,
        participated_by_me: participating,
        participants_ids: if participating { vec![1] } else { Vec::new() },
        ..Default::default()
    }
}

pub fn user(id: i64) -> User {
    User {
        id,
        login: format!("user{}", id),
        name: format!("User {}", id),
        avatar: None,
    }
}

pub fn job(id: i64) -> Job {
    Job {
        id,
        name: format!("Company {}", id),
        position: "Engineer".into(),
        start: "2020-01-01T00:00:00Z".into(),
        ..Default::default()
    }
}
