// ── Detail-screen controller ──
//
// Fetch-by-id state holder. Every `load` stamps a request token; a
// response is applied only if its token is still the newest, so an
// abandoned fetch (same or different id) is discarded on arrival.
// Optimistic edits capture the pre-edit value and roll back to it if
// the backend refuses.

use std::future::Future;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{
    AttendanceRecord, Employee, EntityId, LeaveRequest, NewsItem, Payslip, Record, Task,
};
use crate::source::{RecordSource, RemoteSource};
use crate::stream::StateStream;

// ── DetailState ──────────────────────────────────────────────────────

/// Observable state of one detail screen.
#[derive(Debug, Clone)]
pub struct DetailState<T> {
    /// The identifier currently requested.
    pub id: Option<EntityId>,
    /// Last value loaded for `id`; never a value belonging to another id.
    pub value: Option<T>,
    pub is_loading: bool,
    /// An optimistic edit is awaiting confirmation.
    pub pending_mutation: bool,
    pub last_error: Option<CoreError>,
    request: u64,
    /// Stamp of the newest `mutate`; only it may clear `pending_mutation`.
    mutation: u64,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            id: None,
            value: None,
            is_loading: false,
            pending_mutation: false,
            last_error: None,
            request: 0,
            mutation: 0,
        }
    }
}

impl<T> DetailState<T> {
    /// The record is gone on the backend.
    pub fn is_missing(&self) -> bool {
        self.last_error.as_ref().is_some_and(CoreError::is_not_found)
    }
}

/// What a single `load` call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer `load` was issued before this one resolved.
    Superseded,
    Failed(CoreError),
}

/// Result of an optimistic edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend accepted the edit; its copy replaced the local one.
    Committed,
    /// The backend refused; the pre-edit value was restored.
    RolledBack(CoreError),
    /// No value was held, so nothing was edited or sent.
    NoValue,
    /// The screen moved on (new load) before confirmation arrived.
    Superseded,
}

// ── DetailController ─────────────────────────────────────────────────

/// State holder backing a detail screen.
pub struct DetailController<T: Record, S: RecordSource<T>> {
    source: S,
    state: watch::Sender<DetailState<T>>,
}

impl<T: Record, S: RecordSource<T>> DetailController<T, S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(DetailState::default());
        Self { source, state }
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch `id`, superseding any fetch still in flight.
    ///
    /// Switching to a different id clears the held value first so the
    /// previous record is never shown under the new id.
    pub async fn load(&self, id: EntityId) -> FetchOutcome {
        let mut token = 0;
        self.state.send_modify(|s| {
            s.request += 1;
            token = s.request;
            if s.id.as_ref() != Some(&id) {
                s.value = None;
                s.last_error = None;
                s.pending_mutation = false;
                s.id = Some(id.clone());
            }
            s.is_loading = true;
        });

        debug!(%id, token, "fetching record");
        let result = self.source.fetch(&id).await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|s| {
            if s.request != token {
                return false;
            }
            s.is_loading = false;
            match result {
                Ok(value) => {
                    s.value = Some(value);
                    s.last_error = None;
                    outcome = FetchOutcome::Applied;
                }
                Err(err) => {
                    warn!(%id, error = %err, "record fetch failed");
                    s.last_error = Some(err.clone());
                    outcome = FetchOutcome::Failed(err);
                }
            }
            true
        });

        if outcome == FetchOutcome::Superseded {
            debug!(%id, token, "discarding superseded record");
        }
        outcome
    }

    /// Re-fetch the current id, if any.
    pub async fn reload(&self) -> Option<FetchOutcome> {
        let id = self.state.borrow().id.clone()?;
        Some(self.load(id).await)
    }

    // ── Optimistic mutation ──────────────────────────────────────────

    /// Apply `edit` to the held value immediately, then settle on `confirm`.
    ///
    /// On success the confirmed record replaces the local one; on failure
    /// the pre-edit value is restored and the error recorded. If a newer
    /// load was issued in the meantime the result is left to that load.
    pub async fn mutate<F, Fut>(&self, edit: F, confirm: Fut) -> MutationOutcome
    where
        F: FnOnce(&mut T),
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut previous = None;
        let mut token = 0;
        let mut stamp = 0;
        self.state.send_if_modified(|s| {
            let Some(value) = s.value.as_mut() else {
                return false;
            };
            previous = Some(value.clone());
            edit(value);
            s.pending_mutation = true;
            s.mutation += 1;
            stamp = s.mutation;
            token = s.request;
            true
        });

        let Some(previous) = previous else {
            return MutationOutcome::NoValue;
        };

        let result = confirm.await;

        let mut outcome = MutationOutcome::Superseded;
        self.state.send_if_modified(|s| {
            let newest_edit = s.mutation == stamp;
            if s.request != token {
                // A reload owns the value now, but the saving flag is ours.
                let clear = newest_edit && s.pending_mutation;
                if clear {
                    s.pending_mutation = false;
                }
                return clear;
            }
            if newest_edit {
                s.pending_mutation = false;
            }
            match result {
                Ok(confirmed) => {
                    s.value = Some(confirmed);
                    s.last_error = None;
                    outcome = MutationOutcome::Committed;
                }
                Err(err) => {
                    warn!(error = %err, "optimistic edit rolled back");
                    s.value = Some(previous);
                    s.last_error = Some(err.clone());
                    outcome = MutationOutcome::RolledBack(err);
                }
            }
            true
        });
        outcome
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> DetailState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<DetailState<T>> {
        StateStream::new(self.state.subscribe())
    }
}

// ── Per-domain aliases ───────────────────────────────────────────────

pub type EmployeeDetail = DetailController<Employee, RemoteSource>;
pub type AttendanceDetail = DetailController<AttendanceRecord, RemoteSource>;
pub type LeaveRequestDetail = DetailController<LeaveRequest, RemoteSource>;
pub type TaskDetail = DetailController<Task, RemoteSource>;
pub type NewsDetail = DetailController<NewsItem, RemoteSource>;
pub type PayslipDetail = DetailController<Payslip, RemoteSource>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: EntityId,
        name: String,
        status: String,
    }

    impl Record for Person {
        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.into(),
            name: name.into(),
            status: "pending".into(),
        }
    }

    /// Each id answers after its own delay; ids may be scripted to fail.
    #[derive(Default)]
    struct Delayed {
        delays: HashMap<&'static str, u64>,
        failures: Mutex<HashMap<String, CoreError>>,
    }

    impl Delayed {
        fn with(mut self, id: &'static str, delay_ms: u64) -> Self {
            self.delays.insert(id, delay_ms);
            self
        }

        fn fail(&self, id: &str, err: CoreError) {
            self.failures.lock().unwrap().insert(id.to_owned(), err);
        }
    }

    impl RecordSource<Person> for Delayed {
        async fn fetch(&self, id: &EntityId) -> Result<Person, CoreError> {
            let delay = self.delays.get(id.as_str()).copied().unwrap_or(1);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if let Some(err) = self.failures.lock().unwrap().get(id.as_str()).cloned() {
                return Err(err);
            }
            Ok(person(id.as_str(), &format!("name of {id}")))
        }
    }

    fn controller(source: Delayed) -> DetailController<Person, Delayed> {
        DetailController::new(source)
    }

    fn rejected() -> CoreError {
        CoreError::Validation {
            message: "already approved".into(),
            fields: Default::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_previous_id_is_discarded() {
        let detail = controller(Delayed::default().with("emp-1", 100).with("emp-2", 10));

        let (first, second) = tokio::join!(
            detail.load(EntityId::from("emp-1")),
            detail.load(EntityId::from("emp-2"))
        );

        assert_eq!(first, FetchOutcome::Superseded);
        assert_eq!(second, FetchOutcome::Applied);
        let state = detail.snapshot();
        assert_eq!(state.id, Some(EntityId::from("emp-2")));
        assert_eq!(state.value.unwrap().id, EntityId::from("emp-2"));
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_id_clears_value_while_loading() {
        let detail = Arc::new(controller(Delayed::default().with("emp-2", 50)));
        detail.load(EntityId::from("emp-1")).await;
        assert!(detail.snapshot().value.is_some());

        let pending = {
            let detail = Arc::clone(&detail);
            tokio::spawn(async move { detail.load(EntityId::from("emp-2")).await })
        };
        tokio::task::yield_now().await;

        let mid = detail.snapshot();
        assert!(mid.is_loading);
        assert_eq!(mid.value, None);
        assert_eq!(pending.await.unwrap(), FetchOutcome::Applied);
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_load_of_same_id_supersedes() {
        let detail = controller(Delayed::default().with("emp-1", 20));
        let (a, b) = tokio::join!(
            detail.load(EntityId::from("emp-1")),
            detail.load(EntityId::from("emp-1"))
        );
        assert_eq!(a, FetchOutcome::Superseded);
        assert_eq!(b, FetchOutcome::Applied);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_value_for_same_id() {
        let source = Delayed::default();
        let detail = controller(source);
        detail.load(EntityId::from("emp-1")).await;

        detail.source.fail(
            "emp-1",
            CoreError::NotFound {
                entity: "employees".into(),
                id: "emp-1".into(),
            },
        );
        let outcome = detail.reload().await.unwrap();

        assert!(matches!(outcome, FetchOutcome::Failed(CoreError::NotFound { .. })));
        let state = detail.snapshot();
        assert!(state.value.is_some());
        assert!(state.is_missing());
    }

    #[tokio::test(start_paused = true)]
    async fn first_load_failure_leaves_value_absent() {
        let source = Delayed::default();
        source.fail(
            "emp-9",
            CoreError::Server {
                status: 500,
                message: "boom".into(),
            },
        );
        let detail = controller(source);

        detail.load(EntityId::from("emp-9")).await;

        let state = detail.snapshot();
        assert_eq!(state.value, None);
        assert!(state.last_error.is_some());
        assert!(!state.is_missing());
    }

    #[tokio::test(start_paused = true)]
    async fn optimistic_edit_commits_confirmed_value() {
        let detail = controller(Delayed::default());
        detail.load(EntityId::from("lr-1")).await;

        let mut confirmed = person("lr-1", "name of lr-1");
        confirmed.status = "approved".into();
        let outcome = detail
            .mutate(|p| p.status = "approved".into(), async { Ok(confirmed) })
            .await;

        assert_eq!(outcome, MutationOutcome::Committed);
        let state = detail.snapshot();
        assert_eq!(state.value.unwrap().status, "approved");
        assert!(!state.pending_mutation);
    }

    #[tokio::test(start_paused = true)]
    async fn optimistic_edit_is_visible_then_rolled_back() {
        let detail = Arc::new(controller(Delayed::default()));
        detail.load(EntityId::from("lr-1")).await;

        let (tx, rx) = tokio::sync::oneshot::channel::<Result<Person, CoreError>>();
        let pending = {
            let detail = Arc::clone(&detail);
            tokio::spawn(async move {
                detail
                    .mutate(
                        |p| p.status = "approved".into(),
                        async move { rx.await.unwrap() },
                    )
                    .await
            })
        };
        tokio::task::yield_now().await;

        let optimistic = detail.snapshot();
        assert_eq!(optimistic.value.as_ref().unwrap().status, "approved");
        assert!(optimistic.pending_mutation);

        tx.send(Err(rejected())).unwrap();
        assert_eq!(pending.await.unwrap(), MutationOutcome::RolledBack(rejected()));

        let state = detail.snapshot();
        assert_eq!(state.value.unwrap().status, "pending");
        assert_eq!(state.last_error, Some(rejected()));
    }

    #[tokio::test(start_paused = true)]
    async fn mutate_without_value_is_noop() {
        let detail = controller(Delayed::default());
        let outcome = detail
            .mutate(|p| p.status = "x".into(), async { Err(rejected()) })
            .await;
        assert_eq!(outcome, MutationOutcome::NoValue);
    }

    #[tokio::test(start_paused = true)]
    async fn rollback_skipped_after_navigation() {
        let detail = Arc::new(controller(Delayed::default()));
        detail.load(EntityId::from("lr-1")).await;

        let (tx, rx) = tokio::sync::oneshot::channel::<Result<Person, CoreError>>();
        let pending = {
            let detail = Arc::clone(&detail);
            tokio::spawn(async move {
                detail
                    .mutate(|p| p.status = "approved".into(), async move { rx.await.unwrap() })
                    .await
            })
        };
        tokio::task::yield_now().await;

        detail.load(EntityId::from("lr-2")).await;
        tx.send(Err(rejected())).unwrap();

        assert_eq!(pending.await.unwrap(), MutationOutcome::Superseded);
        let state = detail.snapshot();
        assert_eq!(state.id, Some(EntityId::from("lr-2")));
        assert_eq!(state.last_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn reload_during_mutate_clears_saving() {
        let detail = Arc::new(controller(Delayed::default()));
        detail.load(EntityId::from("t-1")).await;

        let (tx, rx) = tokio::sync::oneshot::channel::<Result<Person, CoreError>>();
        let pending = {
            let detail = Arc::clone(&detail);
            tokio::spawn(async move {
                detail
                    .mutate(|p| p.status = "done".into(), async move { rx.await.unwrap() })
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(detail.snapshot().pending_mutation);

        assert_eq!(detail.reload().await, Some(FetchOutcome::Applied));
        tx.send(Ok(person("t-1", "name of t-1"))).unwrap();

        assert_eq!(pending.await.unwrap(), MutationOutcome::Superseded);
        let state = detail.snapshot();
        assert!(!state.pending_mutation);
        assert!(!state.is_loading);
        assert_eq!(state.id, Some(EntityId::from("t-1")));
    }
}
