use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Record, StatusTag};

/// One day of attendance for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: EntityId,
    pub employee_id: Option<EntityId>,
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: StatusTag,
    pub worked_hours: Option<f64>,
}

impl AttendanceRecord {
    /// Hours worked: the backend figure, else derived from the check-in/out pair.
    pub fn hours(&self) -> Option<f64> {
        self.worked_hours.or_else(|| {
            let (start, end) = (self.check_in?, self.check_out?);
            let minutes = (end - start).num_minutes();
            (minutes >= 0).then(|| f64::from(i32::try_from(minutes).unwrap_or(i32::MAX)) / 60.0)
        })
    }

    /// Checked in but not yet out.
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }
}

impl Record for AttendanceRecord {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
