use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::models::Post;
use crate::error::AppResult;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::forum::lookup::{PostDetails, Related};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DetailsQuery {
    #[serde(default)]
    pub related: String,
}

#[derive(Deserialize)]
pub struct EditPostBody {
    pub message: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/post/{id}/details", get(details).post(edit))
}

async fn details(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<DetailsQuery>,
) -> AppResult<Json<PostDetails>> {
    let related = Related::parse(&query.related);
    Ok(Json(state.store.post_details(id, related)?))
}

async fn edit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<EditPostBody>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.store.update_post(id, body.message.as_deref())?))
}
