use std::collections::BTreeMap;

use thiserror::Error;

/// Classified failure of a single backend call.
///
/// Every request resolves to a success payload or exactly one of these
/// five kinds. Transport failures, timeouts and connection refusals all
/// collapse into `NetworkUnavailable`; undecodable bodies are treated as
/// a server fault. `staffdesk-core` maps these into domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // ── Transient ───────────────────────────────────────────────────
    /// The backend could not be reached, or did not answer in time.
    #[error("Network unavailable: {message}")]
    NetworkUnavailable { message: String },

    // ── Session ─────────────────────────────────────────────────────
    /// The credential was rejected (HTTP 401/403).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // ── Client-side faults ──────────────────────────────────────────
    /// The addressed record does not exist (HTTP 404/410).
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The backend rejected the payload (HTTP 400/409/422).
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        /// Per-field messages, when the backend supplies them.
        fields: BTreeMap<String, Vec<String>>,
    },

    // ── Server-side faults ──────────────────────────────────────────
    /// Any other non-success status, or a body that could not be decoded.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
}

/// Discriminant of [`Error`], handy for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NetworkUnavailable,
    Unauthorized,
    NotFound,
    Validation,
    Server,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkUnavailable { .. } => ErrorKind::NetworkUnavailable,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    /// Returns `true` if repeating the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. } | Self::Server { .. })
    }

    /// Returns `true` if this error should end the current session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: String, resource: &str) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { message },
            404 | 410 => Self::NotFound {
                resource: resource.to_owned(),
            },
            400 | 409 | 422 => Self::Validation {
                message,
                fields: BTreeMap::new(),
            },
            _ => Self::Server { status, message },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Server {
                status: err.status().map_or(200, |s| s.as_u16()),
                message: err.to_string(),
            };
        }
        Self::NetworkUnavailable {
            message: err.to_string(),
        }
    }
}

/// Failure to construct an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Error)]
pub enum BuildError {
    /// The base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry a path (e.g. `mailto:`).
    #[error("Base URL cannot be used for API paths: {url}")]
    CannotBeABase { url: String },

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),
}
