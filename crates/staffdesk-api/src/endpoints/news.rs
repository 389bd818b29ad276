// Company news feed

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{NewsResponse, Page, PageRequest};

impl ApiClient {
    /// `GET /api/v1/news?page=&limit=`
    pub async fn list_news(&self, page: PageRequest) -> Result<Page<NewsResponse>, Error> {
        self.get_page(&["news"], page).await
    }

    /// `GET /api/v1/news/{id}`
    pub async fn get_news(&self, id: &str) -> Result<NewsResponse, Error> {
        self.get(&["news", id]).await
    }
}
