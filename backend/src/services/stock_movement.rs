//! Stock movement service
//!
//! Movements are the audit trail of quantity changes. Creating one stamps
//! the authenticated user as `created_by`; the product quantity itself is a
//! separately maintained field and is not adjusted here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::{MovementReason, Product, StockMovement, Supplier};

/// Stock movement service
#[derive(Clone)]
pub struct StockMovementService {
    db: PgPool,
}

/// Input for recording a stock movement (also the full-update shape)
///
/// `created_by` and `created_at` are server-assigned; unknown fields are
/// rejected so a caller supplying them gets a validation error instead of a
/// silent ignore.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStockMovementInput {
    pub product_id: i64,
    pub change: i32,
    pub reason: MovementReason,
    pub note: Option<String>,
}

/// Input for partially updating a stock movement
///
/// `note` uses a double `Option`: omitted means "leave untouched", an
/// explicit `null` clears it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStockMovementInput {
    pub product_id: Option<i64>,
    pub change: Option<i32>,
    pub reason: Option<MovementReason>,
    #[serde(default, deserialize_with = "super::patch_field")]
    pub note: Option<Option<String>>,
}

/// Flat row for the movement + product + supplier join
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: i64,
    change: i32,
    reason: String,
    note: Option<String>,
    created_by: Option<i64>,
    created_at: DateTime<Utc>,
    product_id: i64,
    product_name: String,
    product_category: Option<String>,
    product_quantity: i32,
    product_min_stock_level: i32,
    product_cost_price: Decimal,
    product_selling_price: Decimal,
    product_image_url: Option<String>,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
    supplier_id: Option<i64>,
    supplier_name: Option<String>,
    supplier_contact_email: Option<String>,
    supplier_phone: Option<String>,
    supplier_address: Option<String>,
    supplier_created_at: Option<DateTime<Utc>>,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let reason = MovementReason::parse(&row.reason).ok_or_else(|| {
            AppError::Internal(format!("Unknown movement reason '{}' in store", row.reason))
        })?;

        let supplier = match (row.supplier_id, row.supplier_name, row.supplier_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Supplier {
                id,
                name,
                contact_email: row.supplier_contact_email,
                phone: row.supplier_phone,
                address: row.supplier_address,
                created_at,
            }),
            _ => None,
        };

        Ok(StockMovement {
            id: row.id,
            product: Product {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
                quantity: row.product_quantity,
                min_stock_level: row.product_min_stock_level,
                cost_price: row.product_cost_price,
                selling_price: row.product_selling_price,
                supplier,
                image_url: row.product_image_url,
                created_at: row.product_created_at,
                updated_at: row.product_updated_at,
            },
            change: row.change,
            reason,
            note: row.note,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

const MOVEMENT_SELECT: &str = r#"
    SELECT m.id, m.change, m.reason, m.note, m.created_by, m.created_at,
           p.id AS product_id, p.name AS product_name, p.category AS product_category,
           p.quantity AS product_quantity, p.min_stock_level AS product_min_stock_level,
           p.cost_price AS product_cost_price, p.selling_price AS product_selling_price,
           p.image_url AS product_image_url, p.created_at AS product_created_at,
           p.updated_at AS product_updated_at,
           s.id AS supplier_id, s.name AS supplier_name,
           s.contact_email AS supplier_contact_email, s.phone AS supplier_phone,
           s.address AS supplier_address, s.created_at AS supplier_created_at
    FROM stock_movements m
    JOIN products p ON p.id = m.product_id
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

impl StockMovementService {
    /// Create a new StockMovementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all stock movements, newest first
    pub async fn list(&self) -> AppResult<Vec<StockMovement>> {
        let sql = format!("{} ORDER BY m.created_at DESC", MOVEMENT_SELECT);
        sqlx::query_as::<_, MovementRow>(&sql)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(StockMovement::try_from)
            .collect()
    }

    /// Get a stock movement by ID
    pub async fn get(&self, movement_id: i64) -> AppResult<StockMovement> {
        let sql = format!("{} WHERE m.id = $1", MOVEMENT_SELECT);
        let row = sqlx::query_as::<_, MovementRow>(&sql)
            .bind(movement_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock movement".to_string()))?;

        row.try_into()
    }

    /// Record a stock movement
    ///
    /// `created_by` comes from the authenticated caller; any value in the
    /// request body has already been rejected at deserialization.
    pub async fn create(
        &self,
        created_by: i64,
        input: CreateStockMovementInput,
    ) -> AppResult<StockMovement> {
        self.ensure_product_exists(input.product_id).await?;

        let movement_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO stock_movements (product_id, change, reason, note, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.change)
        .bind(input.reason.as_str())
        .bind(&input.note)
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        self.get(movement_id).await
    }

    /// Fully update a stock movement, replacing every writable field
    pub async fn update(
        &self,
        movement_id: i64,
        input: CreateStockMovementInput,
    ) -> AppResult<StockMovement> {
        self.ensure_product_exists(input.product_id).await?;

        let result = sqlx::query(
            r#"
            UPDATE stock_movements
            SET product_id = $1, change = $2, reason = $3, note = $4
            WHERE id = $5
            "#,
        )
        .bind(input.product_id)
        .bind(input.change)
        .bind(input.reason.as_str())
        .bind(&input.note)
        .bind(movement_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock movement".to_string()));
        }

        self.get(movement_id).await
    }

    /// Partially update a stock movement
    pub async fn patch(
        &self,
        movement_id: i64,
        input: UpdateStockMovementInput,
    ) -> AppResult<StockMovement> {
        let existing = self.get(movement_id).await?;

        let merged = CreateStockMovementInput {
            product_id: input.product_id.unwrap_or(existing.product.id),
            change: input.change.unwrap_or(existing.change),
            reason: input.reason.unwrap_or(existing.reason),
            note: input.note.unwrap_or(existing.note),
        };

        self.update(movement_id, merged).await
    }

    /// Delete a stock movement
    pub async fn delete(&self, movement_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stock_movements WHERE id = $1")
            .bind(movement_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock movement".to_string()));
        }

        Ok(())
    }

    async fn ensure_product_exists(&self, product_id: i64) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(&self.db)
            .await?;

        if exists == 0 {
            return Err(AppError::Validation {
                field: "product_id".to_string(),
                message: format!("Invalid product id {}", product_id),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_parses_known_fields() {
        let input: CreateStockMovementInput = serde_json::from_str(
            r#"{"product_id": 3, "change": -5, "reason": "sale", "note": "walk-in"}"#,
        )
        .unwrap();

        assert_eq!(input.product_id, 3);
        assert_eq!(input.change, -5);
        assert_eq!(input.reason, MovementReason::Sale);
        assert_eq!(input.note.as_deref(), Some("walk-in"));
    }

    #[test]
    fn test_create_input_rejects_server_assigned_fields() {
        let with_created_by = serde_json::from_str::<CreateStockMovementInput>(
            r#"{"product_id": 3, "change": 2, "reason": "add", "created_by": 1}"#,
        );
        assert!(with_created_by.is_err());

        let with_created_at = serde_json::from_str::<CreateStockMovementInput>(
            r#"{"product_id": 3, "change": 2, "reason": "add", "created_at": "2024-01-01T00:00:00Z"}"#,
        );
        assert!(with_created_at.is_err());
    }

    #[test]
    fn test_create_input_rejects_unknown_reason() {
        let result = serde_json::from_str::<CreateStockMovementInput>(
            r#"{"product_id": 3, "change": 2, "reason": "shrinkage"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_input_fields_are_optional() {
        let input: UpdateStockMovementInput = serde_json::from_str(r#"{"change": 7}"#).unwrap();

        assert_eq!(input.change, Some(7));
        assert!(input.product_id.is_none());
        assert!(input.reason.is_none());
        assert!(input.note.is_none());
    }

    #[test]
    fn test_patch_input_explicit_null_clears_note() {
        let input: UpdateStockMovementInput =
            serde_json::from_str(r#"{"note": null}"#).unwrap();

        assert_eq!(input.note, Some(None));
    }
}
