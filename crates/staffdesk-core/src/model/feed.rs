use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Record};

/// A company announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: EntityId,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub published_at: DateTime<Utc>,
    pub image_url: Option<String>,
}

impl Record for NewsItem {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// An inbox entry for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    pub body: Option<String>,
    pub kind: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Record for Notification {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
