// ── Write execution ──
//
// Sends one queued write to the backend. The queue only sees the
// `WriteExecutor` seam; tests substitute scripted executors.

use std::future::Future;
use std::sync::Arc;

use staffdesk_api::ApiClient;
use tracing::debug;

use super::write::{QueuedWrite, WriteOp};
use crate::error::CoreError;
use crate::model::{AttendanceRecord, LeaveRequest, Task};

/// What the backend returned for an applied write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    LeaveRequest(LeaveRequest),
    Attendance(AttendanceRecord),
    Task(Task),
    /// The backend acknowledged without returning a record.
    Acknowledged,
}

pub trait WriteExecutor: Send + Sync {
    fn execute(
        &self,
        write: &QueuedWrite,
    ) -> impl Future<Output = Result<WriteOutcome, CoreError>> + Send;
}

impl<E: WriteExecutor> WriteExecutor for Arc<E> {
    fn execute(
        &self,
        write: &QueuedWrite,
    ) -> impl Future<Output = Result<WriteOutcome, CoreError>> + Send {
        (**self).execute(write)
    }
}

/// Replays writes against the remote API, keyed by the write's id.
#[derive(Clone)]
pub struct RemoteExecutor {
    client: Arc<ApiClient>,
}

impl RemoteExecutor {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl WriteExecutor for RemoteExecutor {
    async fn execute(&self, write: &QueuedWrite) -> Result<WriteOutcome, CoreError> {
        let key = write.idempotency_key();
        let key = Some(key.as_str());
        debug!(id = %write.id, kind = %write.kind, "executing write");

        let outcome = match write.op()? {
            WriteOp::CreateLeaveRequest(body) => WriteOutcome::LeaveRequest(
                self.client.create_leave_request(&body, key).await?.into(),
            ),
            WriteOp::CancelLeaveRequest { id } => WriteOutcome::LeaveRequest(
                self.client
                    .cancel_leave_request(id.as_str(), key)
                    .await?
                    .into(),
            ),
            WriteOp::UpdateLeaveStatus { id, update } => WriteOutcome::LeaveRequest(
                self.client
                    .update_leave_status(id.as_str(), &update, key)
                    .await?
                    .into(),
            ),
            WriteOp::UpdateTaskStatus { id, update } => WriteOutcome::Task(
                self.client
                    .update_task_status(id.as_str(), &update, key)
                    .await?
                    .into(),
            ),
            WriteOp::CheckIn(mark) => {
                WriteOutcome::Attendance(self.client.check_in(&mark, key).await?.into())
            }
            WriteOp::CheckOut(mark) => {
                WriteOutcome::Attendance(self.client.check_out(&mark, key).await?.into())
            }
            WriteOp::MarkNotificationRead { id } => {
                self.client
                    .mark_notification_read(id.as_str(), key)
                    .await?;
                WriteOutcome::Acknowledged
            }
        };
        Ok(outcome)
    }
}
