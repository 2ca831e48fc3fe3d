//! NeWork client core.
//!
//! Owns all client-side state of the NeWork social network: the session,
//! feeds of posts, events, users and jobs, user walls, detail views and
//! compose forms. A presentation layer renders the observables exposed
//! here and calls their operations; it holds no logic of its own.
//!
//! ```ignore
//! let kv = Arc::new(RedbStore::open(config.resolve_db_path())?);
//! let app = Nework::new(&config, kv)?;
//!
//! let posts = app.posts_screen();
//! posts.feed().subscribe_snapshot(|snap| render(snap.items()));
//! posts.load().await?;
//! posts.toggle_like(42).await;
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod compose;
pub mod decorate;
pub mod detail;
pub mod feed;
pub mod observable;
pub mod pending;
pub mod repository;
pub mod scope;
pub mod screen;
pub mod transport;

#[cfg(test)]
mod testing;

pub use api::ApiClient;
pub use app::Nework;
pub use auth::{AppAuth, AuthState, Credential, TokenSource};
pub use compose::{
    ComposeState, EventComposer, EventDraft, JobComposer, JobDraft, PostComposer, PostDraft, SignInForm, SignUpDraft,
    SignUpForm, MAX_FILE_SIZE,
};
pub use decorate::{decorate, AuthenticatedTransport, API_KEY_HEADER};
pub use detail::{DetailState, EventDetail, PostDetail, ProfileDetail};
pub use feed::{FeedHolder, FeedSnapshot, FeedSource, FeedStatus, MutationOutcome};
pub use observable::{Observable, SubscriptionId};
pub use repository::LocalFile;
pub use scope::ScreenScope;
pub use screen::{EventsScreen, JobOwner, JobsScreen, PostsScreen, UserWallScreen, UsersScreen, LOOKING_FOR_WORK};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport, TransportError};
