use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityId, Priority, Record, StatusTag};

/// A unit of assigned work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<EntityId>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: StatusTag,
}

impl Task {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_final() && self.due_date.is_some_and(|due| due < today)
    }
}

impl Record for Task {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
