//! Forms that create something: a session, a post, an event, a job.
//!
//! Every form publishes a [`ComposeState`]. Local validation failures are
//! reported as `AppError::Api` with a readable reason and never reach the
//! network.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use nework_core::{AppError, Attachment, Coordinates, Event, EventType, Job, Post};
use tokio::sync::watch;
use tracing::info;

use crate::auth::{AppAuth, Credential};
use crate::observable::{Observable, SubscriptionId};
use crate::repository::{AuthRepository, EventRepository, JobRepository, LocalFile, MediaRepository, PostRepository};

/// Upper bound for any uploaded file.
pub const MAX_FILE_SIZE: usize = 15 * 1024 * 1024;

const AVATAR_TYPES: &[&str] = &["image/jpeg", "image/png"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposeState {
    pub busy: bool,
    pub error: Option<AppError>,
    pub success: bool,
}

struct Form {
    state: Observable<ComposeState>,
}

impl Form {
    fn new() -> Self {
        Self {
            state: Observable::new(ComposeState::default()),
        }
    }

    /// Publish busy, run `work`, publish its outcome.
    async fn run<T, Fut>(&self, work: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.state.set(ComposeState {
            busy: true,
            error: None,
            success: false,
        });
        let result = work.await;
        self.state.set(ComposeState {
            busy: false,
            error: result.as_ref().err().cloned(),
            success: result.is_ok(),
        });
        result
    }
}

macro_rules! form_observers {
    () => {
        pub fn state(&self) -> ComposeState {
            self.form.state.get()
        }

        pub fn subscribe(&self, handler: impl Fn(&ComposeState) + Send + Sync + 'static) -> SubscriptionId {
            self.form.state.subscribe(handler)
        }

        pub fn watch(&self) -> watch::Receiver<ComposeState> {
            self.form.state.watch()
        }
    };
}

fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::api(message))
    } else {
        Ok(())
    }
}

fn check_size(file: &LocalFile) -> Result<(), AppError> {
    if file.size() > MAX_FILE_SIZE {
        return Err(AppError::api("File must not exceed 15 MB"));
    }
    Ok(())
}

/// Upload a local attachment and describe it for an entity body.
async fn upload_attachment(media: &MediaRepository, file: &LocalFile) -> Result<Attachment, AppError> {
    let kind = file
        .attachment_type()
        .ok_or_else(|| AppError::api("Unsupported attachment type"))?;
    check_size(file)?;
    let uploaded = media.upload(file, kind).await?;
    Ok(Attachment {
        url: uploaded.url,
        kind,
    })
}

/// Server 400s on the auth endpoints carry no useful text; replace them.
fn rephrase_rejection(error: AppError, message: &str) -> AppError {
    match error {
        AppError::Api(_) => AppError::api(message),
        other => other,
    }
}

// ── Sign in / sign up ───────────────────────────────────────────────

pub struct SignInForm {
    form: Form,
    repo: AuthRepository,
    auth: Arc<AppAuth>,
}

impl SignInForm {
    pub fn new(repo: AuthRepository, auth: Arc<AppAuth>) -> Self {
        Self {
            form: Form::new(),
            repo,
            auth,
        }
    }

    form_observers!();

    pub async fn submit(&self, login: &str, pass: &str) -> Result<(), AppError> {
        self.form
            .run(async {
                require(login, "Login must not be empty")?;
                require(pass, "Password must not be empty")?;
                let token = self
                    .repo
                    .sign_in(login.trim(), pass)
                    .await
                    .map_err(|e| rephrase_rejection(e, "Incorrect login or password"))?;
                info!(login = login.trim(), "sign-in accepted");
                self.auth.set_credential(Some(Credential::from(token)));
                Ok(())
            })
            .await
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignUpDraft {
    pub login: String,
    pub name: String,
    pub pass: String,
    /// Repeated password, checked when present.
    pub confirm: Option<String>,
    pub avatar: Option<LocalFile>,
}

pub struct SignUpForm {
    form: Form,
    repo: AuthRepository,
    auth: Arc<AppAuth>,
}

impl SignUpForm {
    pub fn new(repo: AuthRepository, auth: Arc<AppAuth>) -> Self {
        Self {
            form: Form::new(),
            repo,
            auth,
        }
    }

    form_observers!();

    pub async fn submit(&self, draft: &SignUpDraft) -> Result<(), AppError> {
        self.form
            .run(async {
                validate_sign_up(draft)?;
                let token = self
                    .repo
                    .sign_up(draft.login.trim(), &draft.pass, draft.name.trim(), draft.avatar.as_ref())
                    .await
                    .map_err(|e| rephrase_rejection(e, "User with this login already exists"))?;
                info!(login = draft.login.trim(), "registration accepted");
                self.auth.set_credential(Some(Credential::from(token)));
                Ok(())
            })
            .await
    }
}

fn validate_sign_up(draft: &SignUpDraft) -> Result<(), AppError> {
    require(&draft.login, "Login must not be empty")?;
    require(&draft.name, "Name must not be empty")?;
    require(&draft.pass, "Password must not be empty")?;
    if let Some(confirm) = &draft.confirm {
        if *confirm != draft.pass {
            return Err(AppError::api("Passwords do not match"));
        }
    }
    if let Some(avatar) = &draft.avatar {
        let mime = avatar.mime.as_deref().unwrap_or_default();
        if !AVATAR_TYPES.contains(&mime) {
            return Err(AppError::api("Avatar must be a JPEG or PNG image"));
        }
        check_size(avatar)?;
    }
    Ok(())
}

// ── Post ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub content: String,
    pub link: Option<String>,
    pub coords: Option<Coordinates>,
    pub mention_ids: Vec<i64>,
    pub attachment: Option<LocalFile>,
}

pub struct PostComposer {
    form: Form,
    posts: PostRepository,
    media: MediaRepository,
}

impl PostComposer {
    pub fn new(posts: PostRepository, media: MediaRepository) -> Self {
        Self {
            form: Form::new(),
            posts,
            media,
        }
    }

    form_observers!();

    pub async fn submit(&self, draft: &PostDraft) -> Result<Post, AppError> {
        self.form
            .run(async {
                require(&draft.content, "Content must not be empty")?;
                let attachment = match &draft.attachment {
                    Some(file) => Some(upload_attachment(&self.media, file).await?),
                    None => None,
                };
                let post = Post {
                    link: draft.link.clone().filter(|l| !l.trim().is_empty()),
                    coords: draft.coords,
                    mention_ids: draft.mention_ids.clone(),
                    attachment,
                    ..Post::draft(draft.content.trim())
                };
                self.posts.save(&post).await
            })
            .await
    }
}

// ── Event ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EventDraft {
    pub content: String,
    pub datetime: DateTime<Utc>,
    pub kind: EventType,
    pub link: Option<String>,
    pub coords: Option<Coordinates>,
    pub speaker_ids: Vec<i64>,
    pub attachment: Option<LocalFile>,
}

impl EventDraft {
    pub fn new(content: impl Into<String>, datetime: DateTime<Utc>, kind: EventType) -> Self {
        Self {
            content: content.into(),
            datetime,
            kind,
            link: None,
            coords: None,
            speaker_ids: Vec::new(),
            attachment: None,
        }
    }
}

pub struct EventComposer {
    form: Form,
    events: EventRepository,
    media: MediaRepository,
}

impl EventComposer {
    pub fn new(events: EventRepository, media: MediaRepository) -> Self {
        Self {
            form: Form::new(),
            events,
            media,
        }
    }

    form_observers!();

    pub async fn submit(&self, draft: &EventDraft) -> Result<Event, AppError> {
        self.form
            .run(async {
                require(&draft.content, "Content must not be empty")?;
                let attachment = match &draft.attachment {
                    Some(file) => Some(upload_attachment(&self.media, file).await?),
                    None => None,
                };
                let datetime = draft.datetime.to_rfc3339_opts(SecondsFormat::Secs, true);
                let event = Event {
                    link: draft.link.clone().filter(|l| !l.trim().is_empty()),
                    coords: draft.coords,
                    speaker_ids: draft.speaker_ids.clone(),
                    attachment,
                    ..Event::draft(draft.content.trim(), datetime, draft.kind)
                };
                self.events.save(&event).await
            })
            .await
    }
}

// ── Job ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct JobDraft {
    pub name: String,
    pub position: String,
    pub start: DateTime<Utc>,
    pub finish: Option<DateTime<Utc>>,
    pub link: Option<String>,
}

pub struct JobComposer {
    form: Form,
    jobs: JobRepository,
}

impl JobComposer {
    pub fn new(jobs: JobRepository) -> Self {
        Self { form: Form::new(), jobs }
    }

    form_observers!();

    pub async fn submit(&self, draft: &JobDraft) -> Result<Job, AppError> {
        self.form
            .run(async {
                require(&draft.name, "Company name must not be empty")?;
                require(&draft.position, "Position must not be empty")?;
                if draft.finish.is_some_and(|f| f < draft.start) {
                    return Err(AppError::api("Finish date must not precede start date"));
                }
                let job = Job {
                    id: 0,
                    name: draft.name.trim().to_string(),
                    position: draft.position.trim().to_string(),
                    start: draft.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    finish: draft.finish.map(|f| f.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    link: draft.link.clone().filter(|l| !l.trim().is_empty()),
                };
                self.jobs.save(&job).await
            })
            .await
    }
}
