use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Prefix under which every tweet photo is stored.
pub const PHOTO_PREFIX: &str = "tweet_photos";

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("unsupported photo content type {0:?}")]
    UnsupportedType(String),
    #[error("photo {0:?} not found")]
    Missing(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct PhotoUpload {
    pub body: Bytes,
    pub content_type: String,
}

/// Stores the image and returns its storage key.
#[instrument(skip(st, upload), fields(content_type = %upload.content_type, size = upload.body.len()))]
pub async fn upload_photo(
    st: &AppState,
    user_id: Uuid,
    upload: PhotoUpload,
) -> Result<String, PhotoError> {
    let Some(ext) = ext_from_mime(&upload.content_type) else {
        warn!(content_type = %upload.content_type, "rejecting non-image upload");
        return Err(PhotoError::UnsupportedType(upload.content_type));
    };
    let key = format!("{}/{}/{}.{}", PHOTO_PREFIX, user_id, Uuid::new_v4(), ext);
    st.storage
        .put_object(&key, upload.body, &upload.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    debug!(%key, "photo stored");
    Ok(key)
}

pub async fn ensure_photo_exists(st: &AppState, key: &str) -> Result<(), PhotoError> {
    let exists = st
        .storage
        .object_exists(key)
        .await
        .with_context(|| format!("head_object {}", key))?;
    if !exists {
        return Err(PhotoError::Missing(key.to_string()));
    }
    Ok(())
}

/// Short-lived URL for showing the photo on the page.
pub async fn presign_photo(st: &AppState, key: &str) -> Result<String, PhotoError> {
    let url = st
        .storage
        .presign_get(key, st.config.storage.url_ttl_secs)
        .await
        .with_context(|| format!("presign url for key {}", key))?;
    Ok(url)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
