// ── Application context ──
//
// Owns every process-wide piece: API client, session and connectivity
// stores, offline queue, write dispatcher, notification center, and the
// background tasks. Built once by `init`, torn down by `shutdown`.

use std::sync::Arc;

use secrecy::SecretString;
use staffdesk_api::{ApiClient, PageRequest};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::detail::DetailController;
use crate::dispatch::{Submitted, WriteDispatcher};
use crate::error::CoreError;
use crate::list::ListController;
use crate::model::{Employee, LeaveBalance, Notification, Record};
use crate::queue::{DrainReport, LocalStore, OfflineQueue, RemoteExecutor, WriteOp};
use crate::source::{PageSource, RecordSource, RemoteSource};
use crate::store::{ConnectivityStore, SessionAction, SessionStore, SessionUser};
use crate::subscription::NotificationCenter;

/// The offline queue as configured at startup.
pub type AppQueue = OfflineQueue<LocalStore>;

/// Shared handle to the running app core. Cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: ClientConfig,
    client: Arc<ApiClient>,
    session: Arc<SessionStore>,
    connectivity: Arc<ConnectivityStore>,
    dispatcher: WriteDispatcher<LocalStore, RemoteExecutor>,
    notifications: NotificationCenter,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl AppContext {
    /// Build the client and stores, restore the offline queue, and start
    /// the auto-drain task.
    pub async fn init(config: ClientConfig) -> Result<Self, CoreError> {
        let client = Arc::new(ApiClient::new(config.base_url.as_str(), &config.transport())?);

        let session = SessionStore::attach(&client);
        if let Some(token) = config.token.clone() {
            session.dispatch(SessionAction::SignIn { token, user: None });
        }

        let connectivity = Arc::new(ConnectivityStore::new(!config.start_offline));
        let store = LocalStore::for_dir(config.data_dir.clone());
        let queue = Arc::new(OfflineQueue::open(store, config.queue).await?);
        let executor = Arc::new(RemoteExecutor::new(Arc::clone(&client)));
        let dispatcher = WriteDispatcher::new(queue, executor, Arc::clone(&connectivity));

        let cancel = CancellationToken::new();
        let auto_drain = dispatcher.spawn_auto_drain(cancel.child_token());

        info!(base_url = %config.base_url, "app context ready");
        Ok(Self {
            inner: Arc::new(ContextInner {
                config,
                client,
                session,
                connectivity,
                dispatcher,
                notifications: NotificationCenter::new(),
                cancel,
                task_handles: Mutex::new(vec![auto_drain]),
            }),
        })
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("app context shut down");
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.inner.client
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn connectivity(&self) -> &ConnectivityStore {
        &self.inner.connectivity
    }

    pub fn queue(&self) -> &AppQueue {
        self.inner.dispatcher.queue()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    pub fn source(&self) -> RemoteSource {
        RemoteSource::new(Arc::clone(&self.inner.client))
    }

    // ── Screen controllers ───────────────────────────────────────────

    /// A fresh list controller for one screen instance.
    pub fn list<T: Record>(&self) -> ListController<T, RemoteSource>
    where
        RemoteSource: PageSource<T>,
    {
        ListController::with_page_size(self.source(), self.inner.config.page_size)
    }

    pub fn detail<T: Record>(&self) -> DetailController<T, RemoteSource>
    where
        RemoteSource: RecordSource<T>,
    {
        DetailController::new(self.source())
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn sign_in(&self, token: SecretString, user: Option<SessionUser>) {
        self.inner
            .session
            .dispatch(SessionAction::SignIn { token, user });
    }

    pub fn sign_out(&self) {
        self.inner.session.dispatch(SessionAction::SignOut);
    }

    // ── Writes ───────────────────────────────────────────────────────

    pub async fn submit(&self, op: WriteOp) -> Result<Submitted, CoreError> {
        self.inner.dispatcher.submit(op).await
    }

    pub async fn drain(&self) -> DrainReport {
        self.inner.dispatcher.drain().await
    }

    // ── One-off reads ────────────────────────────────────────────────

    /// The signed-in employee's own profile.
    pub async fn current_employee(&self) -> Result<Employee, CoreError> {
        Ok(self.inner.client.current_employee().await?.into())
    }

    pub async fn leave_balances(&self) -> Result<Vec<LeaveBalance>, CoreError> {
        let balances = self.inner.client.leave_balances().await?;
        Ok(balances.into_iter().map(LeaveBalance::from).collect())
    }

    /// Fetch the newest notifications and fan out any not seen before.
    pub async fn poll_notifications(&self) -> Result<usize, CoreError> {
        let request = PageRequest::first(self.inner.config.page_size);
        let page = PageSource::<Notification>::fetch_page(&self.source(), request).await?;
        Ok(self.inner.notifications.publish_new(&page))
    }
}
