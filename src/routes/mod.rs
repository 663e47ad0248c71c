pub mod forum;
pub mod post;
pub mod service;
pub mod thread;
pub mod user;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::forum::Outcome;
use crate::state::AppState;

/// The full JSON API, ready to serve.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(user::router())
        .merge(forum::router())
        .merge(thread::router())
        .merge(post::router())
        .merge(service::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 201 with the new entity, 409 with what was already stored, 200 after an
/// update.
fn outcome_response<T: Serialize, C: Serialize>(outcome: Outcome<T, C>) -> Response {
    match outcome {
        Outcome::Created(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Outcome::Existing(existing) => (StatusCode::CONFLICT, Json(existing)).into_response(),
        Outcome::Updated(updated) => (StatusCode::OK, Json(updated)).into_response(),
    }
}
