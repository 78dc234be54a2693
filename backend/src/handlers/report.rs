//! Stock report handlers
//!
//! The three /reports endpoints stay up during migration windows: when the
//! store schema does not match the entity definitions yet, they answer 200
//! with an empty/zeroed body and a diagnostic instead of failing, so
//! dashboards keep rendering.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{is_schema_mismatch, AppResult};
use crate::models::Product;
use crate::services::report::FastMovingEntry;
use crate::services::{ProductService, ReportService};
use crate::AppState;

/// Diagnostic attached to recovered report responses
const SCHEMA_MISMATCH_DETAIL: &str = "Store schema mismatch. Run migrations.";

#[derive(Serialize)]
pub struct LowStockAlertsResponse {
    pub low_stock: Vec<Product>,
}

#[derive(Serialize)]
pub struct LowStockReportResponse {
    pub report: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize)]
pub struct FastMovingReportResponse {
    pub fast_moving: Vec<FastMovingEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize)]
pub struct SalesVsRestockResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    pub total_added: i64,
    pub total_removed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Low-stock alert list
pub async fn low_stock_alerts(
    State(state): State<AppState>,
) -> AppResult<Json<LowStockAlertsResponse>> {
    let service = ProductService::new(state.db);
    let low_stock = service.low_stock().await?;
    Ok(Json(LowStockAlertsResponse { low_stock }))
}

/// Low-stock report
pub async fn low_stock_report(
    State(state): State<AppState>,
) -> AppResult<Json<LowStockReportResponse>> {
    let service = ProductService::new(state.db);
    match service.low_stock().await {
        Ok(report) => Ok(Json(LowStockReportResponse {
            report,
            detail: None,
        })),
        Err(err) if is_schema_mismatch(&err) => {
            tracing::warn!("Low-stock report degraded: {}", err);
            Ok(Json(LowStockReportResponse {
                report: Vec::new(),
                detail: Some(SCHEMA_MISMATCH_DETAIL.to_string()),
            }))
        }
        Err(err) => Err(err),
    }
}

/// Fast-moving products report (last 30 days of "sale" movements)
pub async fn fast_moving_report(
    State(state): State<AppState>,
) -> AppResult<Json<FastMovingReportResponse>> {
    let service = ReportService::new(state.db);
    match service.fast_moving().await {
        Ok(fast_moving) => Ok(Json(FastMovingReportResponse {
            fast_moving,
            detail: None,
        })),
        Err(err) if is_schema_mismatch(&err) => {
            tracing::warn!("Fast-moving report degraded: {}", err);
            Ok(Json(FastMovingReportResponse {
                fast_moving: Vec::new(),
                detail: Some(SCHEMA_MISMATCH_DETAIL.to_string()),
            }))
        }
        Err(err) => Err(err),
    }
}

/// Sales-vs-restock totals report (last 30 days)
pub async fn sales_vs_restock_report(
    State(state): State<AppState>,
) -> AppResult<Json<SalesVsRestockResponse>> {
    let service = ReportService::new(state.db);
    match service.sales_vs_restock().await {
        Ok(totals) => Ok(Json(SalesVsRestockResponse {
            since: Some(totals.since),
            total_added: totals.total_added,
            total_removed: totals.total_removed,
            detail: None,
        })),
        Err(err) if is_schema_mismatch(&err) => {
            tracing::warn!("Sales-vs-restock report degraded: {}", err);
            Ok(Json(SalesVsRestockResponse {
                since: None,
                total_added: 0,
                total_removed: 0,
                detail: Some(SCHEMA_MISMATCH_DETAIL.to_string()),
            }))
        }
        Err(err) => Err(err),
    }
}
