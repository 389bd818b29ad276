//! Client-side data lifecycle for the staffdesk HR companion.
//!
//! Sits between `staffdesk-api` and whatever renders screens (the CLI in
//! this workspace, a mobile shell elsewhere):
//!
//! - **[`ListController`]**: paginated, refreshable collection state.
//!   `load(true)` starts a new generation and only the newest
//!   generation's response is applied; `load(false)` fetches the next
//!   page unless one is already in flight.
//!
//! - **[`DetailController`]**: fetch-by-id state with last-request-wins
//!   ordering and optimistic edits that roll back on refusal.
//!
//! - **[`OfflineQueue`]**: durable FIFO of writes made while offline,
//!   replayed in order with halt-on-failure and bounded retries. Fronted
//!   by [`WriteDispatcher`], which decides between sending now and
//!   queueing.
//!
//! - **Stores** ([`SessionStore`], [`ConnectivityStore`]): process-wide
//!   state changed only through actions, owned by [`AppContext`].
//!
//! - **[`present`]**: pure helpers turning state into badges, avatars,
//!   formatted values and per-screen view models.
//!
//! Controllers never return errors from `load`; failures land in the
//! state's `last_error` as a [`CoreError`].

pub mod config;
pub mod context;
pub mod convert;
pub mod detail;
pub mod dispatch;
pub mod error;
pub mod list;
pub mod model;
pub mod present;
pub mod queue;
pub mod range;
pub mod source;
pub mod store;
pub mod stream;
pub mod subscription;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ClientConfig;
pub use context::{AppContext, AppQueue};
pub use detail::{DetailController, DetailState, FetchOutcome, MutationOutcome};
pub use dispatch::{Submitted, WriteDispatcher};
pub use error::CoreError;
pub use list::{DEFAULT_PAGE_SIZE, ListController, ListState, LoadOutcome};
pub use queue::{
    DiscardReason, DrainReport, DrainStop, FileStore, KeyValueStore, LocalStore, MemoryStore,
    OfflineQueue, QueueConfig, QueueNotice, QueuedWrite, RemoteExecutor, WriteExecutor,
    WriteKind, WriteOp, WriteOutcome,
};
pub use range::RangeSelection;
pub use source::{PageSource, RecordSource, RemoteSource};
pub use store::{
    Connectivity, ConnectivityAction, ConnectivityStore, SessionAction, SessionState,
    SessionStore, SessionUser,
};
pub use stream::{StateStream, StateWatchStream};
pub use subscription::{NotificationCenter, Subscription};

pub use model::{
    AttendanceRecord, Employee, EntityId, LeaveBalance, LeaveRequest, NewsItem, Notification,
    PayPeriod, Payslip, PayslipLine, Priority, Record, StatusTag, Task,
};

// Wire payloads callers build writes from.
pub use staffdesk_api::{AttendanceMark, CreateLeaveRequest, StatusUpdate};
