use serde::{Deserialize, Serialize};

use super::{EntityId, Record, StatusTag};

/// A person in the company directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub status: StatusTag,
}

impl Record for Employee {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
