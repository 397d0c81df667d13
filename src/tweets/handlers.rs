use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use minijinja::Value;
use tracing::{error, instrument};

use super::services::build_index;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET /, every tweet newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    let ctx = build_index(&state).await.map_err(|e| {
        error!(error = %e, "listing tweets failed");
        internal(e)
    })?;
    let html = state
        .renderer
        .render("index.html", Value::from_serialize(&ctx))
        .map_err(|e| {
            error!(error = %e, "rendering index failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Html(html))
}

fn internal<E: std::error::Error>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
