use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::db::models::{Forum, NewForum, NewThread, Thread, User};
use crate::error::AppResult;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::forum::Page;
use crate::routes::outcome_response;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ThreadsQuery {
    #[serde(default)]
    pub limit: u32,
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub desc: bool,
}

#[derive(Deserialize)]
pub struct UsersQuery {
    #[serde(default)]
    pub limit: u32,
    pub since: Option<String>,
    #[serde(default)]
    pub desc: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/forum/create", post(create_forum))
        .route("/api/forum/{slug}/details", get(details))
        .route("/api/forum/{slug}/create", post(create_thread))
        .route("/api/forum/{slug}/threads", get(threads))
        .route("/api/forum/{slug}/users", get(users))
}

async fn create_forum(
    State(state): State<AppState>,
    ApiJson(forum): ApiJson<NewForum>,
) -> AppResult<Response> {
    Ok(outcome_response(state.store.create_forum(&forum)?))
}

async fn details(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> AppResult<Json<Forum>> {
    Ok(Json(state.store.forum(&slug)?))
}

async fn create_thread(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(thread): ApiJson<NewThread>,
) -> AppResult<Response> {
    Ok(outcome_response(state.store.create_thread(&slug, &thread)?))
}

async fn threads(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(query): ApiQuery<ThreadsQuery>,
) -> AppResult<Json<Vec<Thread>>> {
    let page = Page::new(query.since, query.limit, query.desc);
    Ok(Json(state.store.forum_threads(&slug, &page)?))
}

async fn users(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(query): ApiQuery<UsersQuery>,
) -> AppResult<Json<Vec<User>>> {
    let since = query.since.filter(|s| !s.is_empty());
    let page = Page::new(since, query.limit, query.desc);
    Ok(Json(state.store.forum_users(&slug, &page)?))
}
