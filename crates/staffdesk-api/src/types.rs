// Wire types for the HR backend.
//
// These mirror the JSON the backend emits (camelCase, string tags for
// statuses). `staffdesk-core` converts them into its domain model; nothing
// here interprets the tags.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Pagination ──────────────────────────────────────────────────────

/// One page request: 1-based `page` and the requested `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }

    pub(crate) fn query(self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

/// One page of records as returned by a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    /// The backend signals the final page by returning fewer than `limit` rows.
    pub fn is_last(&self) -> bool {
        self.items.len() < usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}

// ── Identifier helper ───────────────────────────────────────────────

/// Some endpoints emit numeric ids, others strings. Normalize to `String`.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "id_string")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

// ── Employees ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub status: Option<String>,
}

// ── Attendance ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub employee_id: Option<String>,
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: String,
    pub worked_hours: Option<f64>,
}

/// Body for check-in / check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ── Leave ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestResponse {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub employee_id: Option<String>,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Option<f32>,
    pub reason: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalanceResponse {
    pub leave_type: String,
    pub entitled: f32,
    pub used: f32,
    pub remaining: f32,
}

// ── Payslips ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipResponse {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub year: i32,
    pub month: u32,
    pub gross: f64,
    pub deductions: f64,
    pub net: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub issued_at: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<PayslipLineResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipLineResponse {
    pub label: String,
    pub amount: f64,
    #[serde(default)]
    pub kind: Option<String>,
}

fn default_currency() -> String {
    "USD".into()
}

// ── Tasks ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub assignee_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<String>,
    pub status: String,
}

/// Body for status transitions (tasks, leave approvals).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ── News & notifications ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub kind: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

// ── Error body ──────────────────────────────────────────────────────

/// Error payload: `{ "message": "...", "errors": { "field": ["..."] } }`.
///
/// `errors` values may be a single string or a list of strings.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Map<String, serde_json::Value>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_normalize() {
        let a: EmployeeResponse = serde_json::from_value(json!({"id": 42, "name": "Ana"})).unwrap();
        let b: EmployeeResponse =
            serde_json::from_value(json!({"id": "emp-1", "name": "Ben"})).unwrap();
        assert_eq!(a.id, "42");
        assert_eq!(b.id, "emp-1");
        assert_eq!(a.email, None);
    }

    #[test]
    fn optional_employee_id_accepts_number() {
        let rec: AttendanceResponse = serde_json::from_value(json!({
            "id": 7,
            "employeeId": 12,
            "date": "2024-06-03",
            "status": "present"
        }))
        .unwrap();
        assert_eq!(rec.employee_id.as_deref(), Some("12"));
        assert!(rec.check_in.is_none());
    }

    #[test]
    fn page_last_when_short() {
        let full = Page {
            items: vec![1; 20],
            page: 1,
            limit: 20,
        };
        let short = Page {
            items: vec![1; 7],
            page: 2,
            limit: 20,
        };
        assert!(!full.is_last());
        assert!(short.is_last());
    }

    #[test]
    fn create_leave_request_wire_shape() {
        let body = CreateLeaveRequest {
            leave_type: "annual".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
            reason: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"leaveType": "annual", "startDate": "2024-07-01", "endDate": "2024-07-03"})
        );
    }
}
