//! One repository per backend resource.
//!
//! Every method is exactly one network call. Results are domain values or
//! an [`nework_core::AppError`]; there is no retry and no caching.

mod auth;
mod event;
mod job;
mod media;
mod post;
mod user;

pub use auth::AuthRepository;
pub use event::EventRepository;
pub use job::JobRepository;
pub use media::{LocalFile, MediaRepository};
pub use post::PostRepository;
pub use user::UserRepository;
