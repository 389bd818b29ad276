// Leave request and balance endpoints

use serde_json::json;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    CreateLeaveRequest, LeaveBalanceResponse, LeaveRequestResponse, Page, PageRequest,
    StatusUpdate,
};

impl ApiClient {
    /// `GET /api/v1/leave-requests?page=&limit=`
    pub async fn list_leave_requests(
        &self,
        page: PageRequest,
    ) -> Result<Page<LeaveRequestResponse>, Error> {
        self.get_page(&["leave-requests"], page).await
    }

    /// `GET /api/v1/leave-requests/{id}`
    pub async fn get_leave_request(&self, id: &str) -> Result<LeaveRequestResponse, Error> {
        self.get(&["leave-requests", id]).await
    }

    /// Submit a new leave request.
    ///
    /// `POST /api/v1/leave-requests`
    pub async fn create_leave_request(
        &self,
        body: &CreateLeaveRequest,
        idempotency_key: Option<&str>,
    ) -> Result<LeaveRequestResponse, Error> {
        self.post(&["leave-requests"], body, idempotency_key).await
    }

    /// Withdraw a pending request.
    ///
    /// `POST /api/v1/leave-requests/{id}/cancel`
    pub async fn cancel_leave_request(
        &self,
        id: &str,
        idempotency_key: Option<&str>,
    ) -> Result<LeaveRequestResponse, Error> {
        self.post(&["leave-requests", id, "cancel"], &json!({}), idempotency_key)
            .await
    }

    /// Approve or reject (managers), as a status transition.
    ///
    /// `PATCH /api/v1/leave-requests/{id}`
    pub async fn update_leave_status(
        &self,
        id: &str,
        update: &StatusUpdate,
        idempotency_key: Option<&str>,
    ) -> Result<LeaveRequestResponse, Error> {
        self.patch(&["leave-requests", id], update, idempotency_key)
            .await
    }

    /// `GET /api/v1/leave-balances`
    pub async fn leave_balances(&self) -> Result<Vec<LeaveBalanceResponse>, Error> {
        self.get(&["leave-balances"]).await
    }
}
