pub mod config;
pub mod error;
pub mod types;

pub use config::{ClientConfig, ConfigError};
pub use error::AppError;
pub use types::{
    Attachment, AttachmentType, Coordinates, Event, EventType, Identified, Job, Media, Post,
    PushToken, Token, User, format_instant,
};
