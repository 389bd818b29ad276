// Employee directory endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{EmployeeResponse, Page, PageRequest};

impl ApiClient {
    /// List employees, one page at a time.
    ///
    /// `GET /api/v1/employees?page=&limit=`
    pub async fn list_employees(
        &self,
        page: PageRequest,
    ) -> Result<Page<EmployeeResponse>, Error> {
        self.get_page(&["employees"], page).await
    }

    /// `GET /api/v1/employees/{id}`
    pub async fn get_employee(&self, id: &str) -> Result<EmployeeResponse, Error> {
        self.get(&["employees", id]).await
    }

    /// The employee record of the signed-in user.
    ///
    /// `GET /api/v1/employees/me`
    pub async fn current_employee(&self) -> Result<EmployeeResponse, Error> {
        self.get(&["employees", "me"]).await
    }
}
