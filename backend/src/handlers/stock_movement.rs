//! Stock movement CRUD handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::StockMovement;
use crate::services::stock_movement::{CreateStockMovementInput, UpdateStockMovementInput};
use crate::services::StockMovementService;
use crate::AppState;

/// List all stock movements
pub async fn list_stock_movements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockMovementService::new(state.db);
    Ok(Json(service.list().await?))
}

/// Get a stock movement by ID
pub async fn get_stock_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<i64>,
) -> AppResult<Json<StockMovement>> {
    let service = StockMovementService::new(state.db);
    Ok(Json(service.get(movement_id).await?))
}

/// Record a stock movement
///
/// `created_by` is stamped from the authenticated caller.
pub async fn create_stock_movement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateStockMovementInput>,
) -> AppResult<(StatusCode, Json<StockMovement>)> {
    let service = StockMovementService::new(state.db);
    let movement = service.create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// Fully update a stock movement
pub async fn update_stock_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<i64>,
    Json(input): Json<CreateStockMovementInput>,
) -> AppResult<Json<StockMovement>> {
    let service = StockMovementService::new(state.db);
    Ok(Json(service.update(movement_id, input).await?))
}

/// Partially update a stock movement
pub async fn patch_stock_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<i64>,
    Json(input): Json<UpdateStockMovementInput>,
) -> AppResult<Json<StockMovement>> {
    let service = StockMovementService::new(state.db);
    Ok(Json(service.patch(movement_id, input).await?))
}

/// Delete a stock movement
pub async fn delete_stock_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<i64>,
) -> AppResult<StatusCode> {
    let service = StockMovementService::new(state.db);
    service.delete(movement_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
