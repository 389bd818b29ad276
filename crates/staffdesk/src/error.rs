//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use staffdesk_config::ConfigError;
use staffdesk_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const QUEUE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend: {message}")]
    #[diagnostic(
        code(staffdesk::offline),
        help(
            "Check your network connection and the profile's base_url.\n\
             Writes can be queued with --offline and sent later with: staffdesk queue drain"
        )
    )]
    Offline { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Session rejected: {message}")]
    #[diagnostic(
        code(staffdesk::auth_failed),
        help("Store a fresh token with: staffdesk config set-token --profile {profile}")
    )]
    AuthFailed { profile: String, message: String },

    #[error("Not signed in for profile '{profile}'")]
    #[diagnostic(
        code(staffdesk::no_credentials),
        help(
            "Store a token with: staffdesk config set-token\n\
             Or set the STAFFDESK_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(staffdesk::not_found),
        help("Run: staffdesk {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Server error (HTTP {status}): {message}")]
    #[diagnostic(code(staffdesk::server), help("Try again in a moment."))]
    Server { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(staffdesk::validation))]
    Validation { field: String, reason: String },

    // ── Offline queue ────────────────────────────────────────────────
    #[error("Offline queue stopped: {reason}")]
    #[diagnostic(
        code(staffdesk::queue_halted),
        help(
            "{remaining} write(s) are still queued. Inspect them with: staffdesk queue status\n\
             Drop one with: staffdesk queue discard <ID>"
        )
    )]
    QueueHalted { reason: String, remaining: usize },

    #[error("Local storage failed: {message}")]
    #[diagnostic(code(staffdesk::storage))]
    Storage { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(staffdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: staffdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(staffdesk::no_config),
        help(
            "Create a profile with: staffdesk config init\n\
             Expected at: {path}\n\
             Or pass --base-url / set STAFFDESK_URL."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(staffdesk::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(staffdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Offline { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::QueueHalted { .. } => exit_code::QUEUE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NetworkUnavailable { message } => CliError::Offline { message },

            CoreError::Unauthorized { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::NotFound { entity, id } => CliError::NotFound {
                list_command: list_command_for(&entity),
                resource_type: entity,
                identifier: id,
            },

            CoreError::Validation { message, fields } => {
                match fields.into_iter().next() {
                    Some((field, reasons)) => CliError::Validation {
                        field,
                        reason: if reasons.is_empty() {
                            message
                        } else {
                            reasons.join("; ")
                        },
                    },
                    None => CliError::Validation {
                        field: "input".into(),
                        reason: message,
                    },
                }
            }

            CoreError::Server { status, message } => CliError::Server { status, message },

            CoreError::Storage { message } | CoreError::Serialization { message } => {
                CliError::Storage { message }
            }

            CoreError::QueueFull { capacity } => CliError::QueueHalted {
                reason: format!("queue is full ({capacity} writes)"),
                remaining: capacity,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

/// The list command covering a backend resource segment.
fn list_command_for(entity: &str) -> String {
    let group = match entity {
        "leave-requests" | "leave-balances" => "leave",
        other => other,
    };
    format!("{group} list")
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn field_errors_surface_first_field() {
        let mut fields = BTreeMap::new();
        fields.insert("end_date".to_string(), vec!["must be after start".to_string()]);
        let err = CliError::from(CoreError::Validation {
            message: "invalid".into(),
            fields,
        });
        assert!(matches!(
            err,
            CliError::Validation { ref field, ref reason }
                if field == "end_date" && reason == "must be after start"
        ));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn exit_codes_follow_error_class() {
        let offline = CliError::from(CoreError::NetworkUnavailable {
            message: "dns".into(),
        });
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);

        let missing = CliError::from(CoreError::NotFound {
            entity: "leave-requests".into(),
            id: "lr-9".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
        assert!(matches!(
            missing,
            CliError::NotFound { ref list_command, .. } if list_command == "leave list"
        ));

        let server = CliError::from(CoreError::Server {
            status: 503,
            message: "maintenance".into(),
        });
        assert_eq!(server.exit_code(), exit_code::GENERAL);
    }
}
