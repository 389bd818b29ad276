// ── Status & priority tags ──
//
// The backend labels records with free-form strings ("approved",
// "in-progress", "HIGH", ...). They are parsed once, at the edge, into
// closed enums. Anything unrecognized becomes `Unknown` instead of
// failing the whole payload.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Lifecycle tag shared by attendance, leave, tasks and employees.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum StatusTag {
    // Attendance
    Present,
    Absent,
    Late,
    OnLeave,
    HalfDay,
    // Requests
    Pending,
    Approved,
    Rejected,
    #[strum(to_string = "cancelled", serialize = "canceled")]
    Cancelled,
    // Tasks
    Todo,
    InProgress,
    #[strum(to_string = "done", serialize = "completed")]
    Done,
    Blocked,
    // Employees
    Active,
    Inactive,
    Unknown,
}

impl StatusTag {
    /// Parse a backend tag, accepting `-`, spaces and mixed case.
    pub fn parse(raw: &str) -> Self {
        normalize(raw).parse().unwrap_or(Self::Unknown)
    }

    /// Terminal states no longer accept status transitions.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            Self::Approved | Self::Rejected | Self::Cancelled | Self::Done
        )
    }
}

impl From<String> for StatusTag {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<StatusTag> for String {
    fn from(tag: StatusTag) -> Self {
        tag.to_string()
    }
}

/// Task urgency.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[strum(to_string = "medium", serialize = "normal")]
    Medium,
    High,
    #[strum(to_string = "urgent", serialize = "critical")]
    Urgent,
    Unknown,
}

impl Priority {
    pub fn parse(raw: &str) -> Self {
        normalize(raw).parse().unwrap_or(Self::Unknown)
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.to_string()
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().replace(['-', ' '], "_")
}
