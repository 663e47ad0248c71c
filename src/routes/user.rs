use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::models::{User, UserUpdate};
use crate::error::AppResult;
use crate::extractors::{ApiJson, ApiPath};
use crate::routes::outcome_response;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserBody {
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/user/{nickname}/create", post(create_user))
        .route(
            "/api/user/{nickname}/profile",
            get(profile).post(update_profile),
        )
}

async fn create_user(
    State(state): State<AppState>,
    ApiPath(nickname): ApiPath<String>,
    ApiJson(body): ApiJson<CreateUserBody>,
) -> AppResult<Response> {
    let user = User {
        nickname,
        fullname: body.fullname,
        about: body.about,
        email: body.email,
    };

    Ok(outcome_response(state.store.create_user(&user)?))
}

async fn profile(
    State(state): State<AppState>,
    ApiPath(nickname): ApiPath<String>,
) -> AppResult<Json<User>> {
    Ok(Json(state.store.user(&nickname)?))
}

async fn update_profile(
    State(state): State<AppState>,
    ApiPath(nickname): ApiPath<String>,
    ApiJson(update): ApiJson<UserUpdate>,
) -> AppResult<Json<User>> {
    Ok(Json(state.store.update_user(&nickname, &update)?))
}
