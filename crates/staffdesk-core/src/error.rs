// ── Core error types ──
//
// Domain-level failures. Controllers capture these into their state
// instead of returning them, the offline queue decides replay policy by
// variant, and the CLI maps them to diagnostics. The
// `From<staffdesk_api::Error>` impl translates transport-layer errors.

use std::collections::BTreeMap;

use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` so the same failure can sit in a controller's `last_error`,
/// travel on a broadcast channel, and be returned to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Remote failures ──────────────────────────────────────────────
    #[error("Network unavailable: {message}")]
    NetworkUnavailable { message: String },

    #[error("Session is no longer valid: {message}")]
    Unauthorized { message: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    // ── Local failures ───────────────────────────────────────────────
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Offline queue is full ({capacity} pending writes)")]
    QueueFull { capacity: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CoreError {
    /// Returns `true` for failures the offline queue should wait out.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Short copy suitable for an inline banner or toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkUnavailable { .. } => {
                "You're offline. Changes will be sent when you reconnect.".into()
            }
            Self::Unauthorized { .. } => "Your session has expired. Please sign in again.".into(),
            Self::NotFound { .. } => "This record is no longer available.".into(),
            Self::Validation { message, fields } => fields
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| message.clone()),
            Self::Server { .. } => "Something went wrong. Please try again.".into(),
            Self::Storage { .. } | Self::Serialization { .. } => {
                "Couldn't save changes on this device.".into()
            }
            Self::QueueFull { .. } => "Too many changes are waiting to sync.".into(),
            Self::Config { message } => message.clone(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<staffdesk_api::Error> for CoreError {
    fn from(err: staffdesk_api::Error) -> Self {
        match err {
            staffdesk_api::Error::NetworkUnavailable { message } => {
                CoreError::NetworkUnavailable { message }
            }
            staffdesk_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            staffdesk_api::Error::NotFound { resource } => {
                let (entity, id) = match resource.split_once('/') {
                    Some((entity, id)) => (entity.to_owned(), id.to_owned()),
                    None => ("resource".to_owned(), resource),
                };
                CoreError::NotFound { entity, id }
            }
            staffdesk_api::Error::Validation { message, fields } => {
                CoreError::Validation { message, fields }
            }
            staffdesk_api::Error::Server { status, message } => {
                CoreError::Server { status, message }
            }
        }
    }
}

impl From<staffdesk_api::BuildError> for CoreError {
    fn from(err: staffdesk_api::BuildError) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_resource_is_split() {
        let err = CoreError::from(staffdesk_api::Error::NotFound {
            resource: "leave-requests/lr-9".into(),
        });
        assert_eq!(
            err,
            CoreError::NotFound {
                entity: "leave-requests".into(),
                id: "lr-9".into()
            }
        );
    }

    #[test]
    fn validation_message_prefers_first_field() {
        let mut fields = BTreeMap::new();
        fields.insert("endDate".to_string(), vec!["End date is before start".to_string()]);
        let err = CoreError::Validation {
            message: "invalid".into(),
            fields,
        };
        assert_eq!(err.user_message(), "End date is before start");
    }

    #[test]
    fn only_network_failures_are_transient() {
        assert!(
            CoreError::NetworkUnavailable {
                message: "offline".into()
            }
            .is_transient()
        );
        assert!(
            !CoreError::Server {
                status: 500,
                message: "boom".into()
            }
            .is_transient()
        );
    }
}
