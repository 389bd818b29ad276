// Payslip endpoints (read-only)

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Page, PageRequest, PayslipResponse};

impl ApiClient {
    /// `GET /api/v1/payslips?page=&limit=`
    pub async fn list_payslips(&self, page: PageRequest) -> Result<Page<PayslipResponse>, Error> {
        self.get_page(&["payslips"], page).await
    }

    /// `GET /api/v1/payslips/{id}`
    pub async fn get_payslip(&self, id: &str) -> Result<PayslipResponse, Error> {
        self.get(&["payslips", id]).await
    }
}
