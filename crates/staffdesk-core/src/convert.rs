// ── API-to-domain type conversions ──
//
// Bridges raw `staffdesk_api` wire types into canonical domain types.
// Status strings are parsed into tags here and nowhere else.

use staffdesk_api::types::{
    AttendanceResponse, EmployeeResponse, LeaveBalanceResponse, LeaveRequestResponse,
    NewsResponse, NotificationResponse, PayslipLineResponse, PayslipResponse, TaskResponse,
};

use crate::model::{
    AttendanceRecord, Employee, EntityId, LeaveBalance, LeaveRequest, NewsItem, Notification,
    PayPeriod, Payslip, PayslipLine, Priority, StatusTag, Task,
};
use crate::range::inclusive_days;

impl From<EmployeeResponse> for Employee {
    fn from(e: EmployeeResponse) -> Self {
        Self {
            id: EntityId::from(e.id),
            name: e.name,
            email: e.email,
            department: e.department,
            position: e.position,
            phone: e.phone,
            avatar_url: e.avatar_url,
            // Directory entries without a status are assumed active.
            status: e
                .status
                .as_deref()
                .map_or(StatusTag::Active, StatusTag::parse),
        }
    }
}

impl From<AttendanceResponse> for AttendanceRecord {
    fn from(a: AttendanceResponse) -> Self {
        Self {
            id: EntityId::from(a.id),
            employee_id: a.employee_id.map(EntityId::from),
            date: a.date,
            check_in: a.check_in,
            check_out: a.check_out,
            status: StatusTag::parse(&a.status),
            worked_hours: a.worked_hours,
        }
    }
}

impl From<LeaveRequestResponse> for LeaveRequest {
    fn from(l: LeaveRequestResponse) -> Self {
        let days = l.days.unwrap_or_else(|| {
            let n = inclusive_days(l.start_date, l.end_date);
            f32::from(u16::try_from(n).unwrap_or(u16::MAX))
        });
        Self {
            id: EntityId::from(l.id),
            employee_id: l.employee_id.map(EntityId::from),
            leave_type: l.leave_type,
            start_date: l.start_date,
            end_date: l.end_date,
            days,
            reason: l.reason,
            status: StatusTag::parse(&l.status),
            created_at: l.created_at,
        }
    }
}

impl From<LeaveBalanceResponse> for LeaveBalance {
    fn from(b: LeaveBalanceResponse) -> Self {
        Self {
            leave_type: b.leave_type,
            entitled: b.entitled,
            used: b.used,
            remaining: b.remaining,
        }
    }
}

impl From<PayslipLineResponse> for PayslipLine {
    fn from(l: PayslipLineResponse) -> Self {
        let deduction = match l.kind.as_deref() {
            Some(kind) => kind.eq_ignore_ascii_case("deduction"),
            None => l.amount < 0.0,
        };
        Self {
            label: l.label,
            amount: l.amount.abs(),
            deduction,
        }
    }
}

impl From<PayslipResponse> for Payslip {
    fn from(p: PayslipResponse) -> Self {
        Self {
            id: EntityId::from(p.id),
            period: PayPeriod {
                year: p.year,
                month: p.month,
            },
            gross: p.gross,
            deductions: p.deductions,
            net: p.net,
            currency: p.currency,
            issued_at: p.issued_at,
            lines: p.items.into_iter().map(PayslipLine::from).collect(),
        }
    }
}

impl From<TaskResponse> for Task {
    fn from(t: TaskResponse) -> Self {
        Self {
            id: EntityId::from(t.id),
            title: t.title,
            description: t.description,
            assignee_id: t.assignee_id.map(EntityId::from),
            due_date: t.due_date,
            priority: t.priority.as_deref().map_or(Priority::Medium, Priority::parse),
            status: StatusTag::parse(&t.status),
        }
    }
}

impl From<NewsResponse> for NewsItem {
    fn from(n: NewsResponse) -> Self {
        Self {
            id: EntityId::from(n.id),
            title: n.title,
            summary: n.summary,
            body: n.body,
            author: n.author,
            published_at: n.published_at,
            image_url: n.image_url,
        }
    }
}

impl From<NotificationResponse> for Notification {
    fn from(n: NotificationResponse) -> Self {
        Self {
            id: EntityId::from(n.id),
            title: n.title,
            body: n.body,
            kind: n.kind,
            created_at: n.created_at,
            read: n.read,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn leave_days_fall_back_to_calendar_span() {
        let resp = LeaveRequestResponse {
            id: "lr-1".into(),
            employee_id: None,
            leave_type: "annual".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
            days: None,
            reason: None,
            status: "Pending".into(),
            created_at: None,
        };
        let leave = LeaveRequest::from(resp);
        assert!((leave.days - 3.0).abs() < f32::EPSILON);
        assert_eq!(leave.status, StatusTag::Pending);
        assert!(leave.can_cancel());
    }

    #[test]
    fn payslip_lines_classified() {
        let earning = PayslipLine::from(PayslipLineResponse {
            label: "Base".into(),
            amount: 3000.0,
            kind: Some("earning".into()),
        });
        let tax = PayslipLine::from(PayslipLineResponse {
            label: "Tax".into(),
            amount: -420.0,
            kind: None,
        });
        assert!(!earning.deduction);
        assert!(tax.deduction);
        assert!((tax.amount - 420.0).abs() < f64::EPSILON);
    }

    #[test]
    fn task_priority_defaults_to_medium() {
        let task = Task::from(TaskResponse {
            id: "t-9".into(),
            title: "Badge photo".into(),
            description: None,
            assignee_id: Some("12".into()),
            due_date: None,
            priority: None,
            status: "in_progress".into(),
        });
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, StatusTag::InProgress);
        assert_eq!(task.assignee_id, Some(EntityId::from("12")));
    }

    #[test]
    fn employee_without_status_is_active() {
        let emp = Employee::from(EmployeeResponse {
            id: "e-1".into(),
            name: "Ana".into(),
            email: None,
            department: None,
            position: None,
            phone: None,
            avatar_url: None,
            status: None,
        });
        assert_eq!(emp.status, StatusTag::Active);
    }
}
