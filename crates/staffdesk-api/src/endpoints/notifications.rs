// In-app notification inbox

use serde::de::IgnoredAny;
use serde_json::json;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{NotificationResponse, Page, PageRequest};

impl ApiClient {
    /// `GET /api/v1/notifications?page=&limit=`
    pub async fn list_notifications(
        &self,
        page: PageRequest,
    ) -> Result<Page<NotificationResponse>, Error> {
        self.get_page(&["notifications"], page).await
    }

    /// `POST /api/v1/notifications/{id}/read`
    pub async fn mark_notification_read(
        &self,
        id: &str,
        idempotency_key: Option<&str>,
    ) -> Result<(), Error> {
        let _: IgnoredAny = self
            .post(&["notifications", id, "read"], &json!({}), idempotency_key)
            .await?;
        Ok(())
    }
}
