//! Stock reporting service
//!
//! Derived read-only views over the stock-movement log: fast-moving products
//! and sales-vs-restock totals, both over a trailing 30-day window. The
//! low-stock report reads straight off the products table and lives in
//! [`crate::services::ProductService`].

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Trailing window for movement-based reports, in days
pub const REPORT_WINDOW_DAYS: i64 = 30;

/// Maximum number of products in the fast-moving report
pub const FAST_MOVING_LIMIT: i64 = 50;

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// One row of the fast-moving report
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FastMovingEntry {
    pub product_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub sales_count: i64,
    pub quantity: i32,
}

/// Aggregate totals for the sales-vs-restock report
///
/// `total_removed` is the magnitude of the summed negative changes, so both
/// totals are non-negative; missing data yields zero, never null.
#[derive(Debug, Serialize)]
pub struct SalesVsRestockTotals {
    pub since: DateTime<Utc>,
    pub total_added: i64,
    pub total_removed: i64,
}

/// Start of the trailing report window relative to `now`
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(REPORT_WINDOW_DAYS)
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Products ranked by count of "sale" movements within the window
    ///
    /// Products with no matching movements are excluded rather than
    /// zero-filled.
    pub async fn fast_moving(&self) -> AppResult<Vec<FastMovingEntry>> {
        let since = window_start(Utc::now());

        let entries = sqlx::query_as::<_, FastMovingEntry>(
            r#"
            SELECT p.id AS product_id, p.name, p.category,
                   COUNT(m.id) AS sales_count, p.quantity
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            WHERE m.reason = 'sale' AND m.created_at >= $1
            GROUP BY p.id, p.name, p.category, p.quantity
            ORDER BY sales_count DESC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(FAST_MOVING_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Total stock added and removed within the window
    pub async fn sales_vs_restock(&self) -> AppResult<SalesVsRestockTotals> {
        let since = window_start(Utc::now());

        let (total_added, total_removed) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COALESCE(SUM(change) FILTER (WHERE change > 0), 0)::BIGINT AS total_added,
                   COALESCE(-SUM(change) FILTER (WHERE change < 0), 0)::BIGINT AS total_removed
            FROM stock_movements
            WHERE created_at >= $1
            "#,
        )
        .bind(since)
        .fetch_one(&self.db)
        .await?;

        Ok(SalesVsRestockTotals {
            since,
            total_added,
            total_removed,
        })
    }
}
