use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::db::is_foreign_key_violation;
use crate::photos::services::{ensure_photo_exists, presign_photo, upload_photo, PhotoUpload};
use crate::state::AppState;
use crate::tweets::dto::{IndexContext, TweetView};
use crate::tweets::error::{TweetError, ValidationError};
use crate::tweets::repo_types::{NewTweet, Tweet, TweetWithAuthor};

pub const MAX_CONTENT_LEN: usize = 280;
/// Length of the content prefix used in a tweet's one-line display form.
pub const SUMMARY_LEN: usize = 50;

/// Where a tweet's photo comes from.
pub enum PhotoInput {
    Upload(PhotoUpload),
    /// Key of an object already present in storage.
    Existing(String),
}

pub struct TweetDraft {
    pub user_id: Uuid,
    pub content: String,
    pub photo: Option<PhotoInput>,
}

/// Partial update. `photo: Some(None)` removes the photo.
#[derive(Default)]
pub struct TweetChanges {
    pub content: Option<String>,
    pub photo: Option<Option<PhotoInput>>,
}

/// First `max_len` characters of `content`.
pub fn summarize(content: &str, max_len: usize) -> String {
    content.chars().take(max_len).collect()
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_LEN {
        return Err(ValidationError::ContentTooLong {
            len,
            max: MAX_CONTENT_LEN,
        });
    }
    Ok(())
}

async fn resolve_photo(
    st: &AppState,
    user_id: Uuid,
    photo: PhotoInput,
) -> Result<String, TweetError> {
    match photo {
        PhotoInput::Upload(upload) => Ok(upload_photo(st, user_id, upload).await?),
        PhotoInput::Existing(key) => {
            ensure_photo_exists(st, &key).await?;
            Ok(key)
        }
    }
}

#[instrument(skip(st, draft), fields(user_id = %draft.user_id))]
pub async fn create_tweet(st: &AppState, draft: TweetDraft) -> Result<Tweet, TweetError> {
    if let Err(e) = validate_content(&draft.content) {
        warn!(error = %e, "rejecting tweet");
        return Err(e.into());
    }
    if st.users.find_user(draft.user_id).await?.is_none() {
        warn!("rejecting tweet for unknown user");
        return Err(ValidationError::UnknownUser(draft.user_id).into());
    }

    let photo = match draft.photo {
        Some(p) => Some(resolve_photo(st, draft.user_id, p).await?),
        None => None,
    };

    let new = NewTweet {
        user_id: draft.user_id,
        content: &draft.content,
        photo: photo.as_deref(),
    };
    let tweet = match st.tweets.insert_tweet(new).await {
        Ok(t) => t,
        // the user vanished between the lookup and the insert
        Err(e) if is_foreign_key_violation(&e) => {
            return Err(ValidationError::UnknownUser(draft.user_id).into());
        }
        Err(e) => {
            error!(error = %e, "insert tweet failed");
            return Err(e.into());
        }
    };

    info!(tweet_id = %tweet.id, has_photo = tweet.photo.is_some(), "tweet created");
    Ok(tweet)
}

pub async fn get_tweet(st: &AppState, id: Uuid) -> Result<Tweet, TweetError> {
    st.tweets.get_tweet(id).await?.ok_or(TweetError::NotFound(id))
}

#[instrument(skip(st, changes))]
pub async fn update_tweet(
    st: &AppState,
    id: Uuid,
    changes: TweetChanges,
) -> Result<Tweet, TweetError> {
    let current = get_tweet(st, id).await?;

    let content = changes.content.unwrap_or(current.content);
    if let Err(e) = validate_content(&content) {
        warn!(error = %e, "rejecting tweet update");
        return Err(e.into());
    }

    let photo = match changes.photo {
        None => current.photo,
        Some(None) => None,
        Some(Some(p)) => Some(resolve_photo(st, current.user_id, p).await?),
    };

    let updated = st
        .tweets
        .update_tweet(id, &content, photo.as_deref())
        .await?
        .ok_or(TweetError::NotFound(id))?;

    info!(tweet_id = %id, "tweet updated");
    Ok(updated)
}

#[instrument(skip(st))]
pub async fn delete_tweet(st: &AppState, id: Uuid) -> Result<(), TweetError> {
    if !st.tweets.delete_tweet(id).await? {
        return Err(TweetError::NotFound(id));
    }
    info!(tweet_id = %id, "tweet deleted");
    Ok(())
}

/// All tweets, newest first.
pub async fn list_tweets(st: &AppState) -> Result<Vec<TweetWithAuthor>, TweetError> {
    Ok(st.tweets.list_recent().await?)
}

/// Listing plus display URLs for attached photos, ready for the template.
#[instrument(skip(st))]
pub async fn build_index(st: &AppState) -> Result<IndexContext, TweetError> {
    let tweets = list_tweets(st).await?;
    let mut views = Vec::with_capacity(tweets.len());
    for t in tweets {
        let photo_url = match t.photo.as_deref() {
            Some(key) => Some(presign_photo(st, key).await?),
            None => None,
        };
        views.push(TweetView::new(t, photo_url));
    }
    Ok(IndexContext { tweets: views })
}
