// ── Session store ──
//
// Single owner of the signed-in state. Sign-in installs the bearer token
// on the API client; an `Unauthorized` response reaches this store via
// `SessionObserver` and expires the session.

use std::sync::{Arc, Weak};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use staffdesk_api::{ApiClient, SessionObserver};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::model::EntityId;
use crate::stream::StateStream;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
}

/// Observable session state. The token itself lives only on the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn { user: Option<SessionUser> },
    /// The backend rejected the credential; a new sign-in is required.
    Expired { reason: String },
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }
}

#[derive(Debug)]
pub enum SessionAction {
    SignIn {
        token: SecretString,
        user: Option<SessionUser>,
    },
    SignOut,
    Expire { reason: String },
}

pub struct SessionStore {
    state: watch::Sender<SessionState>,
    client: Weak<ApiClient>,
}

impl SessionStore {
    /// Create a store bound to `client` and register it as the client's
    /// session observer.
    pub fn attach(client: &Arc<ApiClient>) -> Arc<Self> {
        let (state, _) = watch::channel(if client.has_token() {
            SessionState::SignedIn { user: None }
        } else {
            SessionState::SignedOut
        });
        let store = Arc::new(Self {
            state,
            client: Arc::downgrade(client),
        });
        client.set_session_observer(Arc::clone(&store) as Arc<dyn SessionObserver>);
        store
    }

    /// Apply `action`. This is the only way session state changes.
    pub fn dispatch(&self, action: SessionAction) {
        let client = self.client.upgrade();
        match action {
            SessionAction::SignIn { token, user } => {
                if let Some(client) = &client {
                    client.set_token(token);
                }
                info!(user = ?user.as_ref().map(|u| &u.id), "signed in");
                self.state.send_replace(SessionState::SignedIn { user });
            }
            SessionAction::SignOut => {
                if let Some(client) = &client {
                    client.clear_token();
                }
                info!("signed out");
                self.state.send_replace(SessionState::SignedOut);
            }
            SessionAction::Expire { reason } => {
                let expired = self.state.send_if_modified(|s| {
                    if !s.is_signed_in() {
                        return false;
                    }
                    *s = SessionState::Expired {
                        reason: reason.clone(),
                    };
                    true
                });
                if expired {
                    if let Some(client) = &client {
                        client.clear_token();
                    }
                    warn!(%reason, "session expired");
                }
            }
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<SessionState> {
        StateStream::new(self.state.subscribe())
    }
}

impl SessionObserver for SessionStore {
    fn session_ended(&self, reason: &str) {
        self.dispatch(SessionAction::Expire {
            reason: reason.to_owned(),
        });
    }
}
