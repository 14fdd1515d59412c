use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - a label shared between many posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub color: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub const DEFAULT_COLOR: &'static str = "#6c757d";

    pub fn new(name: String, url: String, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            url,
            color: color.unwrap_or_else(|| Self::DEFAULT_COLOR.to_string()),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// A tag with the ids of the posts carrying it.
#[derive(Debug, Clone, Serialize)]
pub struct TagDetails {
    pub tag: Tag,
    pub post_ids: Vec<Uuid>,
}

impl TagDetails {
    pub fn post_count(&self) -> usize {
        self.post_ids.len()
    }
}
