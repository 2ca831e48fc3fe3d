//! Session state: the one credential this client signs requests with.
//!
//! [`AppAuth`] is the single source of truth. It is created once, shared
//! behind an `Arc`, and injected into every consumer. The `auth` record in
//! the key-value store mirrors it so a restart resumes the session.

use std::sync::{Arc, Mutex, PoisonError};

use nework_core::Token;
use nework_kv::{KVStore, MemoryStore, Namespace};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::observable::{Observable, SubscriptionId};

const NAMESPACE: &str = "auth";
const FIELD_ID: &str = "id";
const FIELD_TOKEN: &str = "token";
const FIELD_AVATAR: &str = "avatar";

/// A signed-in identity as returned by sign-in / sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: i64,
    pub token: String,
    pub avatar: Option<String>,
}

impl From<Token> for Credential {
    fn from(t: Token) -> Self {
        Self {
            id: t.id,
            token: t.token,
            avatar: t.avatar,
        }
    }
}

/// Observable session state. `id == 0` means anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub id: i64,
    pub token: Option<String>,
    pub avatar: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.id != 0
    }
}

impl From<&Credential> for AuthState {
    fn from(c: &Credential) -> Self {
        Self {
            id: c.id,
            token: Some(c.token.clone()),
            avatar: c.avatar.clone(),
        }
    }
}

pub struct AppAuth {
    state: Observable<AuthState>,
    record: Namespace,
    /// Serializes writers so state and record change together.
    write_lock: Mutex<()>,
}

impl AppAuth {
    /// Seed the session from the stored `auth` record.
    pub fn open(kv: Arc<dyn KVStore>) -> Self {
        let record = Namespace::new(kv, NAMESPACE);
        let initial = load_record(&record);
        if initial.is_authenticated() {
            info!(user_id = initial.id, "session restored");
        }
        Self {
            state: Observable::new(initial),
            record,
            write_lock: Mutex::new(()),
        }
    }

    /// A session backed by volatile memory only.
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStore::new()))
    }

    /// Store (`Some`) or clear (`None`) the credential, persist it, and
    /// notify observers before returning.
    ///
    /// A credential with id 0 cannot describe a signed-in user and is
    /// treated as a sign-out.
    pub fn set_credential(&self, credential: Option<Credential>) {
        let credential = match credential {
            Some(c) if c.id == 0 => {
                warn!("credential without a user id; clearing session");
                None
            }
            other => other,
        };

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match &credential {
            Some(c) => {
                let mut fields = vec![(FIELD_ID, c.id.to_string()), (FIELD_TOKEN, c.token.clone())];
                if let Some(avatar) = &c.avatar {
                    fields.push((FIELD_AVATAR, avatar.clone()));
                }
                if let Err(e) = self.record.put(&fields) {
                    warn!(error = %e, "failed to persist credential");
                }
                info!(user_id = c.id, "signed in");
            }
            None => {
                if let Err(e) = self.record.clear() {
                    warn!(error = %e, "failed to clear stored credential");
                }
                info!("signed out");
            }
        }
        self.state
            .set(credential.as_ref().map(AuthState::from).unwrap_or_default());
    }

    pub fn sign_out(&self) {
        self.set_credential(None);
    }

    pub fn token(&self) -> Option<String> {
        self.state.get().token
    }

    /// Id of the signed-in user, 0 when anonymous.
    pub fn subject_id(&self) -> i64 {
        self.state.get().id
    }

    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    pub fn subscribe(&self, handler: impl Fn(&AuthState) + Send + Sync + 'static) -> SubscriptionId {
        self.state.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.watch()
    }
}

fn load_record(record: &Namespace) -> AuthState {
    let read = || -> Result<AuthState, nework_kv::KVError> {
        let id = record.get_i64(FIELD_ID)?.unwrap_or(0);
        let token = record.get_str(FIELD_TOKEN)?;
        match token {
            Some(token) if id != 0 => Ok(AuthState {
                id,
                token: Some(token),
                avatar: record.get_str(FIELD_AVATAR)?,
            }),
            _ => Ok(AuthState::default()),
        }
    };
    read().unwrap_or_else(|e| {
        warn!(error = %e, "unreadable stored credential; starting anonymous");
        AuthState::default()
    })
}

// ── TokenSource ─────────────────────────────────────────────────────

/// Where the request decorator reads the bearer token from. Called once
/// per outgoing request; `None` sends the request anonymously.
pub trait TokenSource: Send + Sync + 'static {
    fn token(&self) -> Option<String>;
}

impl TokenSource for AppAuth {
    fn token(&self) -> Option<String> {
        AppAuth::token(self)
    }
}
