use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tweets::repo_types::TweetWithAuthor;

/// One tweet as exposed to the listing template.
#[derive(Debug, Serialize)]
pub struct TweetView {
    pub id: Uuid,
    pub username: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub photo: Option<String>,
    pub photo_url: Option<String>,
}

impl TweetView {
    pub fn new(t: TweetWithAuthor, photo_url: Option<String>) -> Self {
        Self {
            id: t.id,
            username: t.username,
            content: t.content,
            created_at: t.created_at,
            updated_at: t.updated_at,
            photo: t.photo,
            photo_url,
        }
    }
}

/// Template context of the index page.
#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub tweets: Vec<TweetView>,
}
