use std::sync::Arc;

use nework_core::ClientConfig;
use nework_kv::KVStore;

use crate::api::ApiClient;
use crate::auth::AppAuth;
use crate::compose::{EventComposer, JobComposer, PostComposer, SignInForm, SignUpForm};
use crate::decorate::AuthenticatedTransport;
use crate::detail::{EventDetail, PostDetail, ProfileDetail};
use crate::repository::{
    AuthRepository, EventRepository, JobRepository, MediaRepository, PostRepository, UserRepository,
};
use crate::screen::{EventsScreen, JobOwner, JobsScreen, PostsScreen, UserWallScreen, UsersScreen};
use crate::transport::{ReqwestTransport, Transport, TransportError};

/// Composition root: one session, one decorated transport, and factories
/// for every screen and form. Clone to share.
#[derive(Clone)]
pub struct Nework {
    auth: Arc<AppAuth>,
    api: ApiClient,
}

impl Nework {
    /// Real backend from `config`, session persisted in `kv`.
    pub fn new(config: &ClientConfig, kv: Arc<dyn KVStore>) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        Ok(Self::with_transport(Arc::new(AppAuth::open(kv)), transport, &config.api_key))
    }

    pub fn with_transport(auth: Arc<AppAuth>, transport: Arc<dyn Transport>, api_key: &str) -> Self {
        let decorated = AuthenticatedTransport::new(transport, auth.clone(), api_key);
        Self {
            auth,
            api: ApiClient::new(Arc::new(decorated)),
        }
    }

    pub fn auth(&self) -> &Arc<AppAuth> {
        &self.auth
    }

    // ── Repositories ────────────────────────────────────────────────

    pub fn posts(&self) -> PostRepository {
        PostRepository::new(self.api.clone())
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.api.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.api.clone())
    }

    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(self.api.clone())
    }

    pub fn media(&self) -> MediaRepository {
        MediaRepository::new(self.api.clone())
    }

    pub fn accounts(&self) -> AuthRepository {
        AuthRepository::new(self.api.clone())
    }

    // ── Screens ─────────────────────────────────────────────────────

    pub fn posts_screen(&self) -> PostsScreen {
        PostsScreen::new(self.posts())
    }

    pub fn events_screen(&self) -> EventsScreen {
        EventsScreen::new(self.events())
    }

    pub fn users_screen(&self) -> UsersScreen {
        UsersScreen::new(self.users())
    }

    pub fn jobs_screen(&self, owner: JobOwner) -> JobsScreen {
        JobsScreen::new(self.jobs(), owner)
    }

    pub fn wall_screen(&self, user_id: i64) -> UserWallScreen {
        UserWallScreen::new(self.posts(), self.users(), user_id)
    }

    pub fn post_detail(&self) -> PostDetail {
        PostDetail::new(self.posts(), self.users())
    }

    pub fn event_detail(&self) -> EventDetail {
        EventDetail::new(self.events(), self.users())
    }

    pub fn profile(&self) -> ProfileDetail {
        ProfileDetail::new(self.users())
    }

    // ── Forms ───────────────────────────────────────────────────────

    pub fn sign_in_form(&self) -> SignInForm {
        SignInForm::new(self.accounts(), self.auth.clone())
    }

    pub fn sign_up_form(&self) -> SignUpForm {
        SignUpForm::new(self.accounts(), self.auth.clone())
    }

    pub fn post_composer(&self) -> PostComposer {
        PostComposer::new(self.posts(), self.media())
    }

    pub fn event_composer(&self) -> EventComposer {
        EventComposer::new(self.events(), self.media())
    }

    pub fn job_composer(&self) -> JobComposer {
        JobComposer::new(self.jobs())
    }
}
