// ── Domain model ──
//
// Canonical record types the screens render. Built from the wire types
// in `staffdesk-api` by `crate::convert`.

pub mod attendance;
pub mod employee;
pub mod entity_id;
pub mod feed;
pub mod leave;
pub mod payslip;
pub mod tags;
pub mod task;

pub use attendance::AttendanceRecord;
pub use employee::Employee;
pub use entity_id::{EntityId, Record};
pub use feed::{NewsItem, Notification};
pub use leave::{LeaveBalance, LeaveRequest};
pub use payslip::{PayPeriod, Payslip, PayslipLine};
pub use tags::{Priority, StatusTag};
pub use task::Task;
