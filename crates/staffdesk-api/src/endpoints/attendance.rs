// Attendance endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{AttendanceMark, AttendanceResponse, Page, PageRequest};

impl ApiClient {
    /// `GET /api/v1/attendance?page=&limit=`
    pub async fn list_attendance(
        &self,
        page: PageRequest,
    ) -> Result<Page<AttendanceResponse>, Error> {
        self.get_page(&["attendance"], page).await
    }

    /// `GET /api/v1/attendance/{id}`
    pub async fn get_attendance(&self, id: &str) -> Result<AttendanceResponse, Error> {
        self.get(&["attendance", id]).await
    }

    /// Record a check-in for the signed-in user.
    ///
    /// `POST /api/v1/attendance/check-in`
    pub async fn check_in(
        &self,
        mark: &AttendanceMark,
        idempotency_key: Option<&str>,
    ) -> Result<AttendanceResponse, Error> {
        self.post(&["attendance", "check-in"], mark, idempotency_key)
            .await
    }

    /// `POST /api/v1/attendance/check-out`
    pub async fn check_out(
        &self,
        mark: &AttendanceMark,
        idempotency_key: Option<&str>,
    ) -> Result<AttendanceResponse, Error> {
        self.post(&["attendance", "check-out"], mark, idempotency_key)
            .await
    }
}
