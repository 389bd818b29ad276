// ── Data sources for screen controllers ──
//
// Controllers only know how to ask for "page N" or "record X". The
// remote implementation forwards to `ApiClient`; tests plug in scripted
// sources.

use std::future::Future;
use std::sync::Arc;

use staffdesk_api::{ApiClient, PageRequest};

use crate::error::CoreError;
use crate::model::{
    AttendanceRecord, Employee, EntityId, LeaveRequest, NewsItem, Notification, Payslip, Task,
};

/// Fetches one page of a remote collection.
pub trait PageSource<T>: Send + Sync {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<T>, CoreError>> + Send;
}

/// Fetches a single record by identifier.
pub trait RecordSource<T>: Send + Sync {
    fn fetch(&self, id: &EntityId) -> impl Future<Output = Result<T, CoreError>> + Send;
}

impl<T, S: PageSource<T>> PageSource<T> for Arc<S> {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Vec<T>, CoreError>> + Send {
        (**self).fetch_page(request)
    }
}

impl<T, S: RecordSource<T>> RecordSource<T> for Arc<S> {
    fn fetch(&self, id: &EntityId) -> impl Future<Output = Result<T, CoreError>> + Send {
        (**self).fetch(id)
    }
}

// ── Remote source ────────────────────────────────────────────────────

/// Backend-backed source for every screen domain.
#[derive(Clone)]
pub struct RemoteSource {
    client: Arc<ApiClient>,
}

impl RemoteSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}

/// Wire a domain type to its list and detail endpoints.
macro_rules! remote_source {
    ($model:ty, list = $list:ident $(, get = $get:ident)?) => {
        impl PageSource<$model> for RemoteSource {
            async fn fetch_page(&self, request: PageRequest) -> Result<Vec<$model>, CoreError> {
                let page = self.client.$list(request).await?;
                Ok(page.items.into_iter().map(<$model>::from).collect())
            }
        }

        $(
            impl RecordSource<$model> for RemoteSource {
                async fn fetch(&self, id: &EntityId) -> Result<$model, CoreError> {
                    Ok(<$model>::from(self.client.$get(id.as_str()).await?))
                }
            }
        )?
    };
}

remote_source!(Employee, list = list_employees, get = get_employee);
remote_source!(AttendanceRecord, list = list_attendance, get = get_attendance);
remote_source!(LeaveRequest, list = list_leave_requests, get = get_leave_request);
remote_source!(Payslip, list = list_payslips, get = get_payslip);
remote_source!(Task, list = list_tasks, get = get_task);
remote_source!(NewsItem, list = list_news, get = get_news);
remote_source!(Notification, list = list_notifications);
