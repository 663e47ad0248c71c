use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::db::models::ServiceStatus;
use crate::error::AppResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/service/status", get(status))
        .route("/api/service/clear", post(clear))
}

async fn status(State(state): State<AppState>) -> AppResult<Json<ServiceStatus>> {
    Ok(Json(state.store.status()?))
}

async fn clear(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.store.clear()?;
    Ok(StatusCode::OK)
}
