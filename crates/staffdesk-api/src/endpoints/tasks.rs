// Task endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Page, PageRequest, StatusUpdate, TaskResponse};

impl ApiClient {
    /// `GET /api/v1/tasks?page=&limit=`
    pub async fn list_tasks(&self, page: PageRequest) -> Result<Page<TaskResponse>, Error> {
        self.get_page(&["tasks"], page).await
    }

    /// `GET /api/v1/tasks/{id}`
    pub async fn get_task(&self, id: &str) -> Result<TaskResponse, Error> {
        self.get(&["tasks", id]).await
    }

    /// `PATCH /api/v1/tasks/{id}`
    pub async fn update_task_status(
        &self,
        id: &str,
        update: &StatusUpdate,
        idempotency_key: Option<&str>,
    ) -> Result<TaskResponse, Error> {
        self.patch(&["tasks", id], update, idempotency_key).await
    }
}
