use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Record, StatusTag};

/// A request for time off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: EntityId,
    pub employee_id: Option<EntityId>,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f32,
    pub reason: Option<String>,
    pub status: StatusTag,
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Only pending requests can be withdrawn.
    pub fn can_cancel(&self) -> bool {
        self.status == StatusTag::Pending
    }
}

impl Record for LeaveRequest {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Remaining allowance for one leave type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub leave_type: String,
    pub entitled: f32,
    pub used: f32,
    pub remaining: f32,
}
