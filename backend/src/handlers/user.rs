//! User CRUD handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::models::UserView;
use crate::services::user::{CreateUserInput, UpdateUserInput};
use crate::services::UserService;
use crate::AppState;

/// List all users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserView>>> {
    let service = UserService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserView>> {
    let service = UserService::new(state.db);
    Ok(Json(service.get(user_id).await?))
}

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    let service = UserService::new(state.db);
    let user = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Fully update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<Json<UserView>> {
    let service = UserService::new(state.db);
    Ok(Json(service.update(user_id, input).await?))
}

/// Partially update a user
pub async fn patch_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserView>> {
    let service = UserService::new(state.db);
    Ok(Json(service.patch(user_id, input).await?))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = UserService::new(state.db);
    service.delete(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
