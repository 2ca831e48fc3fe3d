use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable identifiers for presentation layers that localize messages
// themselves. Codes never change; display strings may be reworded.

pub mod error_code {
    pub const NETWORK: &str = "NETWORK";
    pub const AUTH: &str = "AUTH";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const VALIDATION: &str = "VALIDATION";
    pub const SERVER: &str = "SERVER";
    pub const API: &str = "API";
    pub const UNKNOWN: &str = "UNKNOWN";
}

// ── AppError ────────────────────────────────────────────────────────

/// Every failure a repository can report. Transport errors never cross
/// the repository boundary; they are folded into one of these kinds.
///
/// | HTTP status | kind         |
/// |-------------|--------------|
/// | 400         | `Api(msg)`   |
/// | 401, 403    | `Auth`       |
/// | 404         | `NotFound`   |
/// | 409         | `Conflict`   |
/// | 422         | `Validation` |
/// | 500         | `Server`     |
/// | other       | `Unknown`    |
///
/// Connection, timeout and other I/O failures are `Network`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Network error")]
    Network,

    #[error("Authentication required")]
    Auth,

    #[error("Not found")]
    NotFound,

    #[error("Conflict")]
    Conflict,

    #[error("Validation failed")]
    Validation,

    #[error("Server error")]
    Server,

    /// A request the server rejected with a message of its own (HTTP 400),
    /// or a form the client rejected before sending.
    #[error("{}", .0.as_deref().unwrap_or("Request rejected"))]
    Api(Option<String>),

    #[error("Unknown error")]
    Unknown,
}

impl AppError {
    /// Map an unsuccessful HTTP status to an error kind.
    ///
    /// `message` is the server-supplied body text; only `Api` keeps it.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            400 => AppError::Api(message.filter(|m| !m.trim().is_empty())),
            401 | 403 => AppError::Auth,
            404 => AppError::NotFound,
            409 => AppError::Conflict,
            422 => AppError::Validation,
            500 => AppError::Server,
            _ => AppError::Unknown,
        }
    }

    /// Client-side rejection with a human-readable reason.
    pub fn api(message: impl Into<String>) -> Self {
        AppError::Api(Some(message.into()))
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Network => error_code::NETWORK,
            AppError::Auth => error_code::AUTH,
            AppError::NotFound => error_code::NOT_FOUND,
            AppError::Conflict => error_code::CONFLICT,
            AppError::Validation => error_code::VALIDATION,
            AppError::Server => error_code::SERVER,
            AppError::Api(_) => error_code::API,
            AppError::Unknown => error_code::UNKNOWN,
        }
    }

    /// Description shown to the user. Absent for an `Api` error the
    /// server sent without a message.
    pub fn message(&self) -> Option<String> {
        match self {
            AppError::Api(None) => None,
            other => Some(other.to_string()),
        }
    }
}
