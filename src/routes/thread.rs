use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::models::{NewPost, Post, Thread, ThreadUpdate, Vote};
use crate::error::AppResult;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::forum::{Outcome, Page, SortMode, ThreadRef};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PostsQuery {
    #[serde(default)]
    pub limit: u32,
    pub since: Option<i64>,
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub desc: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/thread/{slug_or_id}/create", post(create_posts))
        .route("/api/thread/{slug_or_id}/vote", post(vote))
        .route(
            "/api/thread/{slug_or_id}/details",
            get(details).post(update_details),
        )
        .route("/api/thread/{slug_or_id}/posts", get(posts))
}

async fn create_posts(
    State(state): State<AppState>,
    ApiPath(slug_or_id): ApiPath<String>,
    ApiJson(drafts): ApiJson<Vec<NewPost>>,
) -> AppResult<Response> {
    let thread = state.store.thread(&ThreadRef::parse(&slug_or_id))?;
    let posts = state.store.create_posts(&thread, &drafts)?;
    Ok((StatusCode::CREATED, Json(posts)).into_response())
}

async fn vote(
    State(state): State<AppState>,
    ApiPath(slug_or_id): ApiPath<String>,
    ApiJson(vote): ApiJson<Vote>,
) -> AppResult<Json<Thread>> {
    let thread = match state.store.vote(&ThreadRef::parse(&slug_or_id), &vote)? {
        Outcome::Created(thread) | Outcome::Updated(thread) | Outcome::Existing(thread) => thread,
    };
    Ok(Json(thread))
}

async fn details(
    State(state): State<AppState>,
    ApiPath(slug_or_id): ApiPath<String>,
) -> AppResult<Json<Thread>> {
    Ok(Json(state.store.thread(&ThreadRef::parse(&slug_or_id))?))
}

async fn update_details(
    State(state): State<AppState>,
    ApiPath(slug_or_id): ApiPath<String>,
    ApiJson(update): ApiJson<ThreadUpdate>,
) -> AppResult<Json<Thread>> {
    Ok(Json(
        state
            .store
            .update_thread(&ThreadRef::parse(&slug_or_id), &update)?,
    ))
}

async fn posts(
    State(state): State<AppState>,
    ApiPath(slug_or_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<PostsQuery>,
) -> AppResult<Json<Vec<Post>>> {
    // Resolving the thread first separates "no such thread" from an empty page.
    let thread = state.store.thread(&ThreadRef::parse(&slug_or_id))?;
    let page = Page::for_posts(query.since, query.limit, query.desc);
    Ok(Json(state.store.thread_posts(thread.id, query.sort, &page)?))
}
