// ── Client configuration ──
//
// Everything `AppContext::init` needs: where the backend lives, how to
// reach it, and where the offline queue is kept. Built by
// `staffdesk-config` from profiles, or directly by embedding apps.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use staffdesk_api::{TlsMode, TransportConfig};
use url::Url;

use crate::list::DEFAULT_PAGE_SIZE;
use crate::queue::QueueConfig;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://hr.example.com`.
    pub base_url: Url,
    /// Bearer token; `None` starts signed out.
    pub token: Option<SecretString>,
    pub tls: TlsMode,
    pub timeout: Duration,
    pub page_size: u32,
    pub queue: QueueConfig,
    /// Directory for the persisted offline queue. `None` keeps it in memory.
    pub data_dir: Option<PathBuf>,
    /// Start with connectivity marked offline.
    pub start_offline: bool,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(20),
            page_size: DEFAULT_PAGE_SIZE,
            queue: QueueConfig::default(),
            data_dir: None,
            start_offline: false,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
