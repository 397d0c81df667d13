pub mod dto;
pub mod error;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use error::{TweetError, ValidationError};
pub use repo::TweetRepo;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::read_routes())
}
