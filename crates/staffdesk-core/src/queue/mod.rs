// ── Offline write queue ──
//
// Durable FIFO of writes made while the backend was unreachable. Drains
// replay strictly in order and halt at the first item that cannot be
// applied, so a later write never lands before an earlier one.

mod executor;
mod store;
mod write;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use executor::{RemoteExecutor, WriteExecutor, WriteOutcome};
pub use store::{FileStore, KeyValueStore, LocalStore, MemoryStore};
pub use write::{QueuedWrite, WriteKind, WriteOp};

use crate::error::CoreError;
use crate::stream::StateStream;

/// Store key holding the persisted queue.
pub const QUEUE_KEY: &str = "offline-queue";

const NOTICE_CAPACITY: usize = 64;

// ── Configuration ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Failed attempts tolerated before a write is discarded.
    pub max_retries: u32,
    /// Upper bound on pending writes.
    pub max_entries: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_entries: 500,
        }
    }
}

// ── Reports and notices ──────────────────────────────────────────────

/// Why a drain returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainStop {
    /// Every pending write was applied or discarded.
    Completed,
    /// Another drain was already running.
    AlreadyDraining,
    /// The backend became unreachable; the head stays for next time.
    Offline,
    /// The session expired; replay resumes after sign-in.
    Unauthorized,
    /// The backend refused the head write.
    Rejected { id: Uuid, error: CoreError },
    /// The backend failed twice in a row on the head write.
    ServerError { id: Uuid, error: CoreError },
    /// The queue could not be persisted.
    Storage(CoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    pub applied: usize,
    pub discarded: usize,
    pub remaining: usize,
    pub stopped: DrainStop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    RetriesExhausted,
    UserDiscarded,
}

/// Events for toasts and banners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueNotice {
    Enqueued { id: Uuid, kind: WriteKind },
    Applied { id: Uuid, kind: WriteKind },
    Discarded {
        id: Uuid,
        kind: WriteKind,
        reason: DiscardReason,
    },
    Halted { stop: DrainStop, remaining: usize },
}

impl QueueNotice {
    pub fn user_message(&self) -> String {
        match self {
            Self::Enqueued { kind, .. } => {
                format!("You're offline. Your {} will be sent later.", kind.label())
            }
            Self::Applied { kind, .. } => format!("Your {} was sent.", kind.label()),
            Self::Discarded {
                kind,
                reason: DiscardReason::RetriesExhausted,
                ..
            } => format!("Your {} couldn't be sent and was dropped.", kind.label()),
            Self::Discarded {
                kind,
                reason: DiscardReason::UserDiscarded,
                ..
            } => format!("Your {} was discarded.", kind.label()),
            Self::Halted {
                stop: DrainStop::Rejected { error, .. } | DrainStop::ServerError { error, .. },
                ..
            } => error.user_message(),
            Self::Halted { remaining, .. } => {
                format!("{remaining} change(s) are still waiting to sync.")
            }
        }
    }
}

// ── OfflineQueue ─────────────────────────────────────────────────────

/// Persistent FIFO of pending writes.
///
/// `enqueue`, `drain` and `discard` serialize on one async mutex; a drain
/// holds it for the execution and removal of each item in turn.
pub struct OfflineQueue<K: KeyValueStore> {
    store: K,
    config: QueueConfig,
    entries: Mutex<VecDeque<QueuedWrite>>,
    draining: AtomicBool,
    notices: broadcast::Sender<QueueNotice>,
    len: watch::Sender<usize>,
}

/// Clears the draining flag however the drain exits.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<K: KeyValueStore> OfflineQueue<K> {
    /// Load the persisted queue from `store`.
    pub async fn open(store: K, config: QueueConfig) -> Result<Self, CoreError> {
        let entries: VecDeque<QueuedWrite> = match store.get(QUEUE_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => VecDeque::new(),
        };
        if !entries.is_empty() {
            info!(pending = entries.len(), "restored offline queue");
        }

        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let (len, _) = watch::channel(entries.len());
        Ok(Self {
            store,
            config,
            entries: Mutex::new(entries),
            draining: AtomicBool::new(false),
            notices,
            len,
        })
    }

    pub fn config(&self) -> QueueConfig {
        self.config
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Append `write` and persist before returning.
    pub async fn enqueue(&self, write: QueuedWrite) -> Result<Uuid, CoreError> {
        let mut entries = self.entries.lock().await;
        if entries.len() >= self.config.max_entries {
            return Err(CoreError::QueueFull {
                capacity: self.config.max_entries,
            });
        }

        let (id, kind) = (write.id, write.kind);
        entries.push_back(write);
        if let Err(e) = self.persist(&entries).await {
            entries.pop_back();
            return Err(e);
        }
        self.publish_len(&entries);
        debug!(%id, %kind, pending = entries.len(), "write queued");
        self.notify(QueueNotice::Enqueued { id, kind });
        Ok(id)
    }

    /// Remove a write by id at the user's request.
    pub async fn discard(&self, id: Uuid) -> Result<Option<QueuedWrite>, CoreError> {
        let mut entries = self.entries.lock().await;
        let Some(pos) = entries.iter().position(|w| w.id == id) else {
            return Ok(None);
        };
        let Some(write) = entries.remove(pos) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&entries).await {
            entries.insert(pos, write);
            return Err(e);
        }
        self.publish_len(&entries);
        self.notify(QueueNotice::Discarded {
            id,
            kind: write.kind,
            reason: DiscardReason::UserDiscarded,
        });
        Ok(Some(write))
    }

    // ── Replay ───────────────────────────────────────────────────────

    /// Replay pending writes in order until the queue empties or a write
    /// cannot be applied.
    pub async fn drain<E: WriteExecutor>(&self, executor: &E) -> DrainReport {
        if self.draining.swap(true, Ordering::AcqRel) {
            return DrainReport {
                applied: 0,
                discarded: 0,
                remaining: self.len(),
                stopped: DrainStop::AlreadyDraining,
            };
        }
        let _guard = DrainGuard(&self.draining);

        let mut applied = 0;
        let mut discarded = 0;
        // Head id already given its one immediate retry after a server error.
        let mut retried: Option<Uuid> = None;

        let stopped = loop {
            let mut entries = self.entries.lock().await;
            let Some(head) = entries.front().cloned() else {
                break DrainStop::Completed;
            };

            if head.retry_count > self.config.max_retries {
                match self.drop_head(&mut entries).await {
                    Ok(()) => discarded += 1,
                    Err(e) => break DrainStop::Storage(e),
                }
                continue;
            }

            let error = match executor.execute(&head).await {
                Ok(_) => {
                    entries.pop_front();
                    if let Err(e) = self.persist(&entries).await {
                        // Applied remotely but still on disk; the
                        // idempotency key makes the next replay a no-op.
                        entries.push_front(head);
                        break DrainStop::Storage(e);
                    }
                    self.publish_len(&entries);
                    applied += 1;
                    debug!(id = %head.id, kind = %head.kind, "write applied");
                    self.notify(QueueNotice::Applied {
                        id: head.id,
                        kind: head.kind,
                    });
                    continue;
                }
                Err(error) => error,
            };

            match error {
                CoreError::NetworkUnavailable { .. } => break DrainStop::Offline,
                CoreError::Unauthorized { .. } => break DrainStop::Unauthorized,
                _ => {}
            }

            let attempts = match self.bump_head(&mut entries).await {
                Ok(n) => n,
                Err(e) => break DrainStop::Storage(e),
            };
            warn!(id = %head.id, kind = %head.kind, attempts, error = %error, "write failed");

            if attempts > self.config.max_retries {
                match self.drop_head(&mut entries).await {
                    Ok(()) => discarded += 1,
                    Err(e) => break DrainStop::Storage(e),
                }
                continue;
            }

            if matches!(error, CoreError::Server { .. }) {
                if retried != Some(head.id) {
                    retried = Some(head.id);
                    continue;
                }
                break DrainStop::ServerError { id: head.id, error };
            }
            break DrainStop::Rejected { id: head.id, error };
        };

        let remaining = self.entries.lock().await.len();
        if stopped == DrainStop::Completed {
            info!(applied, discarded, "offline queue drained");
        } else {
            info!(applied, discarded, remaining, stopped = ?stopped, "offline queue drain halted");
            self.notify(QueueNotice::Halted {
                stop: stopped.clone(),
                remaining,
            });
        }

        DrainReport {
            applied,
            discarded,
            remaining,
            stopped,
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Snapshot of pending writes, head first.
    pub async fn pending(&self) -> Vec<QueuedWrite> {
        self.entries.lock().await.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        *self.len.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Pending-count updates, for badges.
    pub fn subscribe_len(&self) -> StateStream<usize> {
        StateStream::new(self.len.subscribe())
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<QueueNotice> {
        self.notices.subscribe()
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn persist(&self, entries: &VecDeque<QueuedWrite>) -> Result<(), CoreError> {
        let raw = serde_json::to_string(entries)?;
        self.store.put(QUEUE_KEY, raw).await
    }

    /// Count one failed attempt against the head and persist it.
    async fn bump_head(&self, entries: &mut VecDeque<QueuedWrite>) -> Result<u32, CoreError> {
        let Some(head) = entries.front_mut() else {
            return Ok(0);
        };
        head.retry_count += 1;
        let attempts = head.retry_count;
        self.persist(entries).await?;
        Ok(attempts)
    }

    /// Discard the head after it ran out of retries.
    async fn drop_head(&self, entries: &mut VecDeque<QueuedWrite>) -> Result<(), CoreError> {
        let Some(head) = entries.pop_front() else {
            return Ok(());
        };
        if let Err(e) = self.persist(entries).await {
            entries.push_front(head);
            return Err(e);
        }
        self.publish_len(entries);
        warn!(id = %head.id, kind = %head.kind, retries = head.retry_count, "discarding write");
        self.notify(QueueNotice::Discarded {
            id: head.id,
            kind: head.kind,
            reason: DiscardReason::RetriesExhausted,
        });
        Ok(())
    }

    fn publish_len(&self, entries: &VecDeque<QueuedWrite>) {
        self.len.send_replace(entries.len());
    }

    fn notify(&self, notice: QueueNotice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::EntityId;

    /// Executor failing writes by id with a scripted error sequence.
    #[derive(Default)]
    struct Scripted {
        failures: StdMutex<HashMap<Uuid, Vec<CoreError>>>,
        applied: StdMutex<Vec<Uuid>>,
    }

    impl Scripted {
        fn fail(&self, id: Uuid, errors: Vec<CoreError>) {
            self.failures.lock().unwrap().insert(id, errors);
        }

        fn applied(&self) -> Vec<Uuid> {
            self.applied.lock().unwrap().clone()
        }
    }

    impl WriteExecutor for Scripted {
        async fn execute(&self, write: &QueuedWrite) -> Result<WriteOutcome, CoreError> {
            if let Some(errors) = self.failures.lock().unwrap().get_mut(&write.id) {
                if !errors.is_empty() {
                    return Err(errors.remove(0));
                }
            }
            self.applied.lock().unwrap().push(write.id);
            Ok(WriteOutcome::Acknowledged)
        }
    }

    fn mark_read(id: &str) -> QueuedWrite {
        QueuedWrite::new(&WriteOp::MarkNotificationRead {
            id: EntityId::from(id),
        })
        .unwrap()
    }

    fn validation() -> CoreError {
        CoreError::Validation {
            message: "invalid".into(),
            fields: Default::default(),
        }
    }

    fn server() -> CoreError {
        CoreError::Server {
            status: 503,
            message: "unavailable".into(),
        }
    }

    fn offline() -> CoreError {
        CoreError::NetworkUnavailable {
            message: "no route".into(),
        }
    }

    async fn queue_with(
        store: MemoryStore,
        writes: &[&QueuedWrite],
    ) -> OfflineQueue<MemoryStore> {
        let queue = OfflineQueue::open(store, QueueConfig::default()).await.unwrap();
        for w in writes {
            queue.enqueue((*w).clone()).await.unwrap();
        }
        queue
    }

    #[tokio::test]
    async fn halts_at_rejected_write_preserving_order() {
        let (a, b, c) = (mark_read("a"), mark_read("b"), mark_read("c"));
        let queue = queue_with(MemoryStore::new(), &[&a, &b, &c]).await;
        let exec = Scripted::default();
        exec.fail(b.id, vec![validation()]);

        let report = queue.drain(&exec).await;

        assert_eq!(report.applied, 1);
        assert_eq!(report.remaining, 2);
        assert_eq!(
            report.stopped,
            DrainStop::Rejected {
                id: b.id,
                error: validation()
            }
        );
        assert_eq!(exec.applied(), vec![a.id]);

        let pending = queue.pending().await;
        assert_eq!(pending[0].id, b.id);
        assert_eq!(pending[0].retry_count, 1);
        assert_eq!(pending[1].id, c.id);
        assert_eq!(pending[1].retry_count, 0);
    }

    #[tokio::test]
    async fn network_failure_keeps_head_and_retry_count() {
        let a = mark_read("a");
        let queue = queue_with(MemoryStore::new(), &[&a]).await;
        let exec = Scripted::default();
        exec.fail(a.id, vec![offline()]);

        let report = queue.drain(&exec).await;

        assert_eq!(report.stopped, DrainStop::Offline);
        assert_eq!(queue.pending().await[0].retry_count, 0);

        let report = queue.drain(&exec).await;
        assert_eq!(report.stopped, DrainStop::Completed);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_halts_without_counting() {
        let a = mark_read("a");
        let queue = queue_with(MemoryStore::new(), &[&a]).await;
        let exec = Scripted::default();
        exec.fail(
            a.id,
            vec![CoreError::Unauthorized {
                message: "expired".into(),
            }],
        );

        let report = queue.drain(&exec).await;

        assert_eq!(report.stopped, DrainStop::Unauthorized);
        assert_eq!(queue.pending().await[0].retry_count, 0);
    }

    #[tokio::test]
    async fn server_error_is_retried_once_within_drain() {
        let (a, b) = (mark_read("a"), mark_read("b"));
        let queue = queue_with(MemoryStore::new(), &[&a, &b]).await;
        let exec = Scripted::default();
        exec.fail(a.id, vec![server()]);

        let report = queue.drain(&exec).await;

        assert_eq!(report.stopped, DrainStop::Completed);
        assert_eq!(report.applied, 2);
        assert_eq!(exec.applied(), vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn repeated_server_error_halts_with_two_attempts_counted() {
        let a = mark_read("a");
        let queue = queue_with(MemoryStore::new(), &[&a]).await;
        let exec = Scripted::default();
        exec.fail(a.id, vec![server(), server()]);

        let report = queue.drain(&exec).await;

        assert_eq!(
            report.stopped,
            DrainStop::ServerError {
                id: a.id,
                error: server()
            }
        );
        assert_eq!(queue.pending().await[0].retry_count, 2);
    }

    #[tokio::test]
    async fn exhausted_write_is_discarded_and_drain_continues() {
        let (a, b) = (mark_read("a"), mark_read("b"));
        let queue = queue_with(MemoryStore::new(), &[&a, &b]).await;
        let mut notices = queue.subscribe_notices();
        let exec = Scripted::default();
        exec.fail(a.id, vec![validation(); 4]);

        for _ in 0..3 {
            let report = queue.drain(&exec).await;
            assert!(matches!(report.stopped, DrainStop::Rejected { .. }));
        }
        let report = queue.drain(&exec).await;

        assert_eq!(report.discarded, 1);
        assert_eq!(report.applied, 1);
        assert_eq!(report.stopped, DrainStop::Completed);
        assert_eq!(exec.applied(), vec![b.id]);

        let mut saw_discard = false;
        while let Ok(notice) = notices.try_recv() {
            if let QueueNotice::Discarded { id, reason, .. } = notice {
                assert_eq!(id, a.id);
                assert_eq!(reason, DiscardReason::RetriesExhausted);
                saw_discard = true;
            }
        }
        assert!(saw_discard);
    }

    #[tokio::test]
    async fn queue_survives_reopen() {
        let store = MemoryStore::new();
        let (a, b) = (mark_read("a"), mark_read("b"));
        drop(queue_with(store.clone(), &[&a, &b]).await);

        let reopened = OfflineQueue::open(store.clone(), QueueConfig::default())
            .await
            .unwrap();
        let ids: Vec<_> = reopened.pending().await.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(reopened.len(), 2);

        let raw: serde_json::Value =
            serde_json::from_str(&store.get(QUEUE_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(raw[0]["kind"], json!("mark_notification_read"));
    }

    #[tokio::test]
    async fn enqueue_beyond_capacity_fails() {
        let config = QueueConfig {
            max_retries: 3,
            max_entries: 1,
        };
        let queue = OfflineQueue::open(MemoryStore::new(), config).await.unwrap();
        queue.enqueue(mark_read("a")).await.unwrap();

        let err = queue.enqueue(mark_read("b")).await.unwrap_err();
        assert_eq!(err, CoreError::QueueFull { capacity: 1 });
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn explicit_discard_removes_entry() {
        let (a, b) = (mark_read("a"), mark_read("b"));
        let queue = queue_with(MemoryStore::new(), &[&a, &b]).await;

        let removed = queue.discard(a.id).await.unwrap();
        assert_eq!(removed.map(|w| w.id), Some(a.id));
        assert_eq!(queue.discard(a.id).await.unwrap(), None);
        assert_eq!(queue.pending().await[0].id, b.id);
    }

    #[tokio::test]
    async fn concurrent_drain_returns_already_draining() {
        struct Gate(tokio::sync::Notify);

        impl WriteExecutor for Gate {
            async fn execute(&self, _: &QueuedWrite) -> Result<WriteOutcome, CoreError> {
                self.0.notified().await;
                Ok(WriteOutcome::Acknowledged)
            }
        }

        let a = mark_read("a");
        let queue = queue_with(MemoryStore::new(), &[&a]).await;
        let gate = Gate(tokio::sync::Notify::new());

        let first = queue.drain(&gate);
        tokio::pin!(first);
        // Poll the first drain until it parks inside the executor.
        assert!(futures_util::poll!(first.as_mut()).is_pending());
        assert!(queue.is_draining());

        let second = queue.drain(&gate).await;
        assert_eq!(second.stopped, DrainStop::AlreadyDraining);

        gate.0.notify_one();
        let report = first.await;
        assert_eq!(report.applied, 1);
        assert!(!queue.is_draining());
    }
}
