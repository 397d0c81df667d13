use uuid::Uuid;

use crate::photos::services::PhotoError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("content must not be empty")]
    EmptyContent,
    #[error("content has {len} characters, at most {max} allowed")]
    ContentTooLong { len: usize, max: usize },
    #[error("user {0} does not exist")]
    UnknownUser(Uuid),
    #[error("unsupported photo content type {0:?}")]
    UnsupportedPhotoType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TweetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("tweet {0} not found")]
    NotFound(Uuid),
    #[error("photo {0:?} is missing from storage")]
    MissingPhoto(String),
    #[error("photo storage: {0:#}")]
    Storage(anyhow::Error),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl From<PhotoError> for TweetError {
    fn from(e: PhotoError) -> Self {
        match e {
            PhotoError::UnsupportedType(ct) => ValidationError::UnsupportedPhotoType(ct).into(),
            PhotoError::Missing(key) => TweetError::MissingPhoto(key),
            PhotoError::Storage(e) => TweetError::Storage(e),
        }
    }
}
