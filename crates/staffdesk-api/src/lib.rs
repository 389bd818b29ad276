// staffdesk-api: Async Rust client for the staffdesk HR backend

pub mod client;
mod endpoints;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{ApiClient, paginate_all};
pub use error::{BuildError, Error, ErrorKind};
pub use session::SessionObserver;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    AttendanceMark, AttendanceResponse, CreateLeaveRequest, EmployeeResponse,
    LeaveBalanceResponse, LeaveRequestResponse, NewsResponse, NotificationResponse, Page,
    PageRequest, PayslipLineResponse, PayslipResponse, StatusUpdate, TaskResponse,
};
