// ── Queued write model ──
//
// A `WriteOp` is the typed form callers build; a `QueuedWrite` is the
// persisted envelope (kind tag + JSON payload) that survives restarts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use staffdesk_api::types::{AttendanceMark, CreateLeaveRequest, StatusUpdate};
use strum::{AsRefStr, Display, EnumIter};
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::EntityId;

/// Closed set of writes the app can replay.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WriteKind {
    CreateLeaveRequest,
    CancelLeaveRequest,
    UpdateLeaveStatus,
    UpdateTaskStatus,
    CheckIn,
    CheckOut,
    MarkNotificationRead,
}

impl WriteKind {
    /// Human wording for toasts ("Your {label} was sent").
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateLeaveRequest => "leave request",
            Self::CancelLeaveRequest => "leave cancellation",
            Self::UpdateLeaveStatus => "leave decision",
            Self::UpdateTaskStatus => "task update",
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
            Self::MarkNotificationRead => "read receipt",
        }
    }
}

/// A write in typed form.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    CreateLeaveRequest(CreateLeaveRequest),
    CancelLeaveRequest { id: EntityId },
    UpdateLeaveStatus { id: EntityId, update: StatusUpdate },
    UpdateTaskStatus { id: EntityId, update: StatusUpdate },
    CheckIn(AttendanceMark),
    CheckOut(AttendanceMark),
    MarkNotificationRead { id: EntityId },
}

#[derive(Serialize, Deserialize)]
struct TargetRef {
    id: EntityId,
}

#[derive(Serialize, Deserialize)]
struct TargetedUpdate {
    id: EntityId,
    #[serde(flatten)]
    update: StatusUpdate,
}

impl WriteOp {
    pub fn kind(&self) -> WriteKind {
        match self {
            Self::CreateLeaveRequest(_) => WriteKind::CreateLeaveRequest,
            Self::CancelLeaveRequest { .. } => WriteKind::CancelLeaveRequest,
            Self::UpdateLeaveStatus { .. } => WriteKind::UpdateLeaveStatus,
            Self::UpdateTaskStatus { .. } => WriteKind::UpdateTaskStatus,
            Self::CheckIn(_) => WriteKind::CheckIn,
            Self::CheckOut(_) => WriteKind::CheckOut,
            Self::MarkNotificationRead { .. } => WriteKind::MarkNotificationRead,
        }
    }

    fn payload(&self) -> Result<Value, CoreError> {
        let value = match self {
            Self::CreateLeaveRequest(body) => serde_json::to_value(body)?,
            Self::CheckIn(mark) | Self::CheckOut(mark) => serde_json::to_value(mark)?,
            Self::CancelLeaveRequest { id } | Self::MarkNotificationRead { id } => {
                serde_json::to_value(TargetRef { id: id.clone() })?
            }
            Self::UpdateLeaveStatus { id, update } | Self::UpdateTaskStatus { id, update } => {
                serde_json::to_value(TargetedUpdate {
                    id: id.clone(),
                    update: update.clone(),
                })?
            }
        };
        Ok(value)
    }

    fn from_parts(kind: WriteKind, payload: &Value) -> Result<Self, CoreError> {
        let op = match kind {
            WriteKind::CreateLeaveRequest => {
                Self::CreateLeaveRequest(CreateLeaveRequest::deserialize(payload)?)
            }
            WriteKind::CheckIn => Self::CheckIn(AttendanceMark::deserialize(payload)?),
            WriteKind::CheckOut => Self::CheckOut(AttendanceMark::deserialize(payload)?),
            WriteKind::CancelLeaveRequest => Self::CancelLeaveRequest {
                id: TargetRef::deserialize(payload)?.id,
            },
            WriteKind::MarkNotificationRead => Self::MarkNotificationRead {
                id: TargetRef::deserialize(payload)?.id,
            },
            WriteKind::UpdateLeaveStatus => {
                let TargetedUpdate { id, update } = TargetedUpdate::deserialize(payload)?;
                Self::UpdateLeaveStatus { id, update }
            }
            WriteKind::UpdateTaskStatus => {
                let TargetedUpdate { id, update } = TargetedUpdate::deserialize(payload)?;
                Self::UpdateTaskStatus { id, update }
            }
        };
        Ok(op)
    }
}

/// A pending write as persisted in the offline queue.
///
/// `id` doubles as the `Idempotency-Key` on every replay, so a write the
/// backend applied before a dropped response is not applied twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedWrite {
    pub id: Uuid,
    pub kind: WriteKind,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub retry_count: u32,
}

impl QueuedWrite {
    pub fn new(op: &WriteOp) -> Result<Self, CoreError> {
        Ok(Self {
            id: Uuid::new_v4(),
            kind: op.kind(),
            payload: op.payload()?,
            created_at: Utc::now(),
            retry_count: 0,
        })
    }

    /// Decode the payload back into its typed form.
    pub fn op(&self) -> Result<WriteOp, CoreError> {
        WriteOp::from_parts(self.kind, &self.payload)
    }

    pub fn idempotency_key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn status_update_payload_is_flat() {
        let op = WriteOp::UpdateTaskStatus {
            id: "t-4".into(),
            update: StatusUpdate {
                status: "done".into(),
                note: None,
            },
        };
        let write = QueuedWrite::new(&op).unwrap();

        assert_eq!(write.kind, WriteKind::UpdateTaskStatus);
        assert_eq!(write.payload, json!({ "id": "t-4", "status": "done" }));
        assert_eq!(write.op().unwrap(), op);
    }

    #[test]
    fn persisted_envelope_uses_snake_case_kind() {
        let op = WriteOp::CreateLeaveRequest(CreateLeaveRequest {
            leave_type: "annual".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
            reason: None,
        });
        let write = QueuedWrite::new(&op).unwrap();
        let json = serde_json::to_value(&write).unwrap();

        assert_eq!(json["kind"], "create_leave_request");
        assert_eq!(json["retry_count"], 0);
        assert_eq!(json["payload"]["startDate"], "2024-07-01");
    }

    #[test]
    fn mismatched_payload_fails_to_decode() {
        let write = QueuedWrite {
            id: Uuid::new_v4(),
            kind: WriteKind::CheckIn,
            payload: json!({ "id": "n-1" }),
            created_at: Utc::now(),
            retry_count: 0,
        };
        assert!(matches!(
            write.op().unwrap_err(),
            CoreError::Serialization { .. }
        ));
    }
}
