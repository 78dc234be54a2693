//! Supplier management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::Supplier;

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Input for creating a supplier (also the full-update shape)
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for partially updating a supplier
///
/// Nullable fields use a double `Option`: omitted means "leave untouched",
/// an explicit `null` clears the stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::patch_field")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::patch_field")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::patch_field")]
    pub address: Option<Option<String>>,
}

/// Row shape matching the suppliers table
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: i64,
    name: String,
    contact_email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            contact_email: row.contact_email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all suppliers, newest first
    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, contact_email, phone, address, created_at
            FROM suppliers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(Supplier::from)
        .collect();

        Ok(suppliers)
    }

    /// Get a supplier by ID
    pub async fn get(&self, supplier_id: i64) -> AppResult<Supplier> {
        let supplier = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, contact_email, phone, address, created_at
            FROM suppliers
            WHERE id = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(supplier.into())
    }

    /// Create a supplier
    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Supplier name cannot be empty".to_string(),
            });
        }

        let supplier = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, contact_email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, contact_email, phone, address, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact_email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier.into())
    }

    /// Fully update a supplier, replacing every writable field
    pub async fn update(&self, supplier_id: i64, input: CreateSupplierInput) -> AppResult<Supplier> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Supplier name cannot be empty".to_string(),
            });
        }

        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $1, contact_email = $2, phone = $3, address = $4
            WHERE id = $5
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact_email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(supplier_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        self.get(supplier_id).await
    }

    /// Partially update a supplier
    pub async fn patch(&self, supplier_id: i64, input: UpdateSupplierInput) -> AppResult<Supplier> {
        let existing = self.get(supplier_id).await?;

        let merged = CreateSupplierInput {
            name: input.name.unwrap_or(existing.name),
            contact_email: input.contact_email.unwrap_or(existing.contact_email),
            phone: input.phone.unwrap_or(existing.phone),
            address: input.address.unwrap_or(existing.address),
        };

        self.update(supplier_id, merged).await
    }

    /// Delete a supplier
    ///
    /// Products referencing the supplier survive; their supplier reference is
    /// cleared by the store (ON DELETE SET NULL).
    pub async fn delete(&self, supplier_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }
}
