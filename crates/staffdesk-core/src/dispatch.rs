// ── Write dispatch ──
//
// Front door for every user write. Online writes go straight to the
// backend; offline writes (or ones that hit a dead network) land in the
// offline queue. A background task replays the queue when connectivity
// returns or the app is foregrounded.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CoreError;
use crate::queue::{
    DrainReport, DrainStop, KeyValueStore, OfflineQueue, QueuedWrite, WriteExecutor, WriteOp, WriteOutcome,
};
use crate::store::ConnectivityStore;

/// How a submitted write was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    Applied(WriteOutcome),
    Queued(Uuid),
}

pub struct WriteDispatcher<K: KeyValueStore, E: WriteExecutor> {
    queue: Arc<OfflineQueue<K>>,
    executor: Arc<E>,
    connectivity: Arc<ConnectivityStore>,
}

impl<K: KeyValueStore, E: WriteExecutor + 'static> WriteDispatcher<K, E> {
    pub fn new(
        queue: Arc<OfflineQueue<K>>,
        executor: Arc<E>,
        connectivity: Arc<ConnectivityStore>,
    ) -> Self {
        Self {
            queue,
            executor,
            connectivity,
        }
    }

    pub fn queue(&self) -> &Arc<OfflineQueue<K>> {
        &self.queue
    }

    /// Send `op` now, or queue it for later.
    ///
    /// Pending writes are replayed first when online; if any remain, `op`
    /// queues behind them so replay order matches submission order.
    /// Errors other than a dead network are returned unchanged.
    pub async fn submit(&self, op: WriteOp) -> Result<Submitted, CoreError> {
        let write = QueuedWrite::new(&op)?;

        if self.connectivity.is_online() && !self.queue.is_empty() {
            let report = self.drain().await;
            debug!(?report, "drained before submit");
        }
        if !self.connectivity.is_online() || !self.queue.is_empty() {
            let id = self.queue.enqueue(write).await?;
            return Ok(Submitted::Queued(id));
        }

        match self.executor.execute(&write).await {
            Ok(outcome) => Ok(Submitted::Applied(outcome)),
            Err(CoreError::NetworkUnavailable { message }) => {
                debug!(%message, kind = %write.kind, "network lost during write, queueing");
                self.connectivity.set_online(false);
                let id = self.queue.enqueue(write).await?;
                Ok(Submitted::Queued(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Replay the queue now. A drain that loses the network marks the
    /// store offline so the next reconnect replays again.
    pub async fn drain(&self) -> DrainReport {
        let report = self.queue.drain(&*self.executor).await;
        mark_offline_on_halt(&self.connectivity, &report);
        report
    }

    /// Drain on every offline→online transition and every foreground
    /// signal until `cancel` fires.
    pub fn spawn_auto_drain(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let queue = Arc::clone(&self.queue);
        let executor = Arc::clone(&self.executor);
        let connectivity = Arc::clone(&self.connectivity);
        let mut rx = self.connectivity.receiver();
        let mut last = *rx.borrow_and_update();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let now = *rx.borrow_and_update();
                        let reconnected = now.online && !last.online;
                        let foregrounded = now.online && now.foreground_epoch != last.foreground_epoch;
                        last = now;

                        if (reconnected || foregrounded) && !queue.is_empty() {
                            let report = queue.drain(&*executor).await;
                            debug!(?report, "auto drain finished");
                            mark_offline_on_halt(&connectivity, &report);
                        }
                    }
                }
            }
            info!("auto drain stopped");
        })
    }
}

/// Without this a drain that hit a dead network while the store still
/// read online would never see another offline→online edge.
fn mark_offline_on_halt(connectivity: &ConnectivityStore, report: &DrainReport) {
    if report.stopped == DrainStop::Offline && connectivity.set_online(false) {
        debug!(remaining = report.remaining, "drain lost the network, marked offline");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::EntityId;
    use crate::queue::{MemoryStore, QueueConfig};

    /// Fails with `NetworkUnavailable` while `down` is set.
    #[derive(Default)]
    struct Flaky {
        down: Mutex<bool>,
        applied: Mutex<Vec<Uuid>>,
    }

    impl WriteExecutor for Flaky {
        async fn execute(&self, write: &QueuedWrite) -> Result<WriteOutcome, CoreError> {
            if *self.down.lock().unwrap() {
                return Err(CoreError::NetworkUnavailable {
                    message: "unreachable".into(),
                });
            }
            self.applied.lock().unwrap().push(write.id);
            Ok(WriteOutcome::Acknowledged)
        }
    }

    fn read(id: &str) -> WriteOp {
        WriteOp::MarkNotificationRead {
            id: EntityId::from(id),
        }
    }

    async fn dispatcher(online: bool) -> WriteDispatcher<MemoryStore, Flaky> {
        let queue = OfflineQueue::open(MemoryStore::new(), QueueConfig::default())
            .await
            .unwrap();
        WriteDispatcher::new(
            Arc::new(queue),
            Arc::new(Flaky::default()),
            Arc::new(ConnectivityStore::new(online)),
        )
    }

    #[tokio::test]
    async fn online_write_is_applied_directly() {
        let d = dispatcher(true).await;
        let result = d.submit(read("n-1")).await.unwrap();
        assert_eq!(result, Submitted::Applied(WriteOutcome::Acknowledged));
        assert!(d.queue().is_empty());
    }

    #[tokio::test]
    async fn offline_write_is_queued() {
        let d = dispatcher(false).await;
        let result = d.submit(read("n-1")).await.unwrap();
        assert!(matches!(result, Submitted::Queued(_)));
        assert_eq!(d.queue().len(), 1);
        assert!(d.executor.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn network_failure_queues_and_marks_offline() {
        let d = dispatcher(true).await;
        *d.executor.down.lock().unwrap() = true;

        let result = d.submit(read("n-1")).await.unwrap();

        assert!(matches!(result, Submitted::Queued(_)));
        assert!(!d.connectivity.is_online());
    }

    #[tokio::test]
    async fn later_write_queues_behind_pending_ones() {
        let d = dispatcher(false).await;
        d.submit(read("n-1")).await.unwrap();
        d.connectivity.set_online(true);

        let second = d.submit(read("n-2")).await.unwrap();

        assert!(matches!(second, Submitted::Queued(_)));
        let report = d.drain().await;
        assert_eq!(report.applied, 2);
        assert_eq!(report.stopped, DrainStop::Completed);
    }

    #[tokio::test]
    async fn online_submit_replays_stranded_writes_first() {
        let d = dispatcher(true).await;
        let stranded = d.queue().enqueue(QueuedWrite::new(&read("n-1")).unwrap()).await.unwrap();

        let second = d.submit(read("n-2")).await.unwrap();

        assert_eq!(second, Submitted::Applied(WriteOutcome::Acknowledged));
        assert!(d.queue().is_empty());
        let applied = d.executor.applied.lock().unwrap().clone();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], stranded);
    }

    #[tokio::test]
    async fn drain_that_loses_network_marks_offline() {
        let d = dispatcher(true).await;
        d.queue().enqueue(QueuedWrite::new(&read("n-1")).unwrap()).await.unwrap();
        *d.executor.down.lock().unwrap() = true;

        let report = d.drain().await;

        assert_eq!(report.stopped, DrainStop::Offline);
        assert!(!d.connectivity.is_online());
        assert_eq!(d.queue().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_drain_retries_after_network_drop() {
        let d = dispatcher(false).await;
        d.submit(read("n-1")).await.unwrap();
        *d.executor.down.lock().unwrap() = true;

        let cancel = CancellationToken::new();
        let handle = d.spawn_auto_drain(cancel.clone());
        let mut connectivity = d.connectivity.subscribe();

        // Reconnect, but the backend is still unreachable.
        d.connectivity.set_online(true);
        tokio::time::timeout(Duration::from_secs(5), async {
            while connectivity.changed().await.is_some_and(|c| c.online) {}
        })
        .await
        .unwrap();
        assert!(!d.connectivity.is_online());
        assert_eq!(d.queue().len(), 1);

        // Next reconnect finds the backend up and replays.
        *d.executor.down.lock().unwrap() = false;
        let mut len = d.queue().subscribe_len();
        d.connectivity.set_online(true);
        tokio::time::timeout(Duration::from_secs(5), async {
            while len.latest() != 0 {
                len.changed().await;
            }
        })
        .await
        .unwrap();

        let later = d.submit(read("n-2")).await.unwrap();
        assert_eq!(later, Submitted::Applied(WriteOutcome::Acknowledged));

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(d.executor.applied.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reconnect_triggers_auto_drain() {
        let d = dispatcher(false).await;
        d.submit(read("n-1")).await.unwrap();

        let cancel = CancellationToken::new();
        let handle = d.spawn_auto_drain(cancel.clone());
        let mut len = d.queue().subscribe_len();

        d.connectivity.set_online(true);
        tokio::time::timeout(Duration::from_secs(5), async {
            while len.latest() != 0 {
                len.changed().await;
            }
        })
        .await
        .unwrap();

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(d.executor.applied.lock().unwrap().len(), 1);
    }
}
