use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tweets::services::{summarize, SUMMARY_LEN};

/// Tweet row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tweet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    /// Storage key of the attached photo.
    pub photo: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Tweet joined with its author, as returned by the listing query.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TweetWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub photo: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl fmt::Display for TweetWithAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.username, summarize(&self.content, SUMMARY_LEN))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewTweet<'a> {
    pub user_id: Uuid,
    pub content: &'a str,
    pub photo: Option<&'a str>,
}
