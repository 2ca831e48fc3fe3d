//! Wire types of the NeWork REST API.
//!
//! Field names follow the backend's camelCase JSON. The `*ByMe` flags are
//! computed by the server from the caller's credential and are never
//! derived locally.

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

/// Anything a feed can hold: addressed by a server-assigned id.
pub trait Identified {
    fn id(&self) -> i64;
}

/// Render an ISO-8601 instant as `dd.MM.yyyy HH:mm` local time.
/// Unparseable input is returned unchanged.
pub fn format_instant(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => instant.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

// ── Auth ────────────────────────────────────────────────────────────

/// Returned by sign-in and sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: i64,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushToken {
    pub token: String,
}

// ── Shared ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub long: f64,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.long)
    }
}

/// The backend has emitted coordinates both as numbers and as strings.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(f64),
        Text(String),
    }
    match NumOrText::deserialize(deserializer)? {
        NumOrText::Num(n) => Ok(n),
        NumOrText::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentType {
    Image,
    Video,
    Audio,
}

impl AttachmentType {
    /// Content type announced when uploading a file of this kind.
    pub fn mime_type(self) -> &'static str {
        match self {
            AttachmentType::Image => "image/*",
            AttachmentType::Video => "video/*",
            AttachmentType::Audio => "audio/*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: AttachmentType,
}

/// Upload result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
}

// ── Post ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub like_owner_ids: Vec<i64>,
    #[serde(default)]
    pub liked_by_me: bool,
    #[serde(default)]
    pub mention_ids: Vec<i64>,
    #[serde(default)]
    pub mentioned_me: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub owned_by_me: bool,
}

impl Post {
    /// A new post as sent to `POST /api/posts`. The server fills in
    /// author, timestamps and flags.
    pub fn draft(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn formatted_published(&self) -> String {
        format_instant(&self.published)
    }
}

impl Identified for Post {
    fn id(&self) -> i64 {
        self.id
    }
}

// ── Event ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Online,
    #[default]
    Offline,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub content: String,
    /// When the event takes place.
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coordinates>,
    #[serde(rename = "type", default)]
    pub kind: EventType,
    #[serde(default)]
    pub like_owner_ids: Vec<i64>,
    #[serde(default)]
    pub liked_by_me: bool,
    #[serde(default)]
    pub speaker_ids: Vec<i64>,
    #[serde(default)]
    pub participants_ids: Vec<i64>,
    #[serde(default)]
    pub participated_by_me: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub owned_by_me: bool,
}

impl Event {
    pub fn draft(content: impl Into<String>, datetime: impl Into<String>, kind: EventType) -> Self {
        Self {
            content: content.into(),
            datetime: datetime.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn formatted_datetime(&self) -> String {
        format_instant(&self.datetime)
    }

    pub fn formatted_published(&self) -> String {
        format_instant(&self.published)
    }
}

impl Identified for Event {
    fn id(&self) -> i64 {
        self.id
    }
}

// ── User / Job ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    /// Company name.
    pub name: String,
    pub position: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Identified for Job {
    fn id(&self) -> i64 {
        self.id
    }
}
