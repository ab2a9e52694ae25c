use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sea_orm::Set;
use uuid::Uuid;

/// A persisted message (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Registration input. Ids are always assigned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub author: String,
    pub content: String,
}

/// Update input: the id the caller believes it is editing plus the new content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInput {
    pub id: Uuid,
    pub content: String,
}

impl From<models::message::Model> for Message {
    fn from(m: models::message::Model) -> Self {
        Self {
            id: m.id,
            author: m.author,
            content: m.content,
            like_count: m.like_count,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

impl From<Message> for models::message::ActiveModel {
    fn from(m: Message) -> Self {
        Self {
            id: Set(m.id),
            author: Set(m.author),
            content: Set(m.content),
            like_count: Set(m.like_count),
            created_at: Set(m.created_at.into()),
        }
    }
}
