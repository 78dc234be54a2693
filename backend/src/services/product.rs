//! Product management service
//!
//! Products carry their supplier as a nested read-only object; writes
//! reference the supplier by id. `updated_at` refreshes on every mutation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::{Product, Supplier};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product (also the full-update shape)
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub min_stock_level: i32,
    #[serde(default)]
    pub cost_price: Decimal,
    #[serde(default)]
    pub selling_price: Decimal,
    pub supplier_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Input for partially updating a product
///
/// Nullable fields use a double `Option`: omitted means "leave untouched",
/// an explicit `null` clears the stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::patch_field")]
    pub category: Option<Option<String>>,
    pub quantity: Option<i32>,
    pub min_stock_level: Option<i32>,
    pub cost_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    #[serde(default, deserialize_with = "super::patch_field")]
    pub supplier_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "super::patch_field")]
    pub image_url: Option<Option<String>>,
}

/// Flat row for the product + supplier join
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    name: String,
    category: Option<String>,
    quantity: i32,
    min_stock_level: i32,
    cost_price: Decimal,
    selling_price: Decimal,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    supplier_id: Option<i64>,
    supplier_name: Option<String>,
    supplier_contact_email: Option<String>,
    supplier_phone: Option<String>,
    supplier_address: Option<String>,
    supplier_created_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
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

        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            quantity: row.quantity,
            min_stock_level: row.min_stock_level,
            cost_price: row.cost_price,
            selling_price: row.selling_price,
            supplier,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Shared SELECT for the product + supplier join
pub(crate) const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.category, p.quantity, p.min_stock_level,
           p.cost_price, p.selling_price, p.image_url, p.created_at, p.updated_at,
           s.id AS supplier_id, s.name AS supplier_name,
           s.contact_email AS supplier_contact_email, s.phone AS supplier_phone,
           s.address AS supplier_address, s.created_at AS supplier_created_at
    FROM products p
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all products, most recently updated first
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let sql = format!("{} ORDER BY p.updated_at DESC", PRODUCT_SELECT);
        let products = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(Product::from)
            .collect();

        Ok(products)
    }

    /// Get a product by ID
    pub async fn get(&self, product_id: i64) -> AppResult<Product> {
        let sql = format!("{} WHERE p.id = $1", PRODUCT_SELECT);
        let product = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product.into())
    }

    /// Products at or below their minimum stock level, lowest quantity first
    pub async fn low_stock(&self) -> AppResult<Vec<Product>> {
        let sql = format!(
            "{} WHERE p.quantity <= p.min_stock_level ORDER BY p.quantity ASC",
            PRODUCT_SELECT
        );
        let products = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(Product::from)
            .collect();

        Ok(products)
    }

    /// Create a product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        self.validate(&input).await?;

        let product_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name, category, quantity, min_stock_level,
                                  cost_price, selling_price, supplier_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.min_stock_level)
        .bind(input.cost_price)
        .bind(input.selling_price)
        .bind(input.supplier_id)
        .bind(&input.image_url)
        .fetch_one(&self.db)
        .await?;

        self.get(product_id).await
    }

    /// Fully update a product, replacing every writable field
    pub async fn update(&self, product_id: i64, input: CreateProductInput) -> AppResult<Product> {
        self.validate(&input).await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, category = $2, quantity = $3, min_stock_level = $4,
                cost_price = $5, selling_price = $6, supplier_id = $7, image_url = $8,
                updated_at = NOW()
            WHERE id = $9
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.min_stock_level)
        .bind(input.cost_price)
        .bind(input.selling_price)
        .bind(input.supplier_id)
        .bind(&input.image_url)
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        self.get(product_id).await
    }

    /// Partially update a product
    pub async fn patch(&self, product_id: i64, input: UpdateProductInput) -> AppResult<Product> {
        let existing = self.get(product_id).await?;

        let merged = CreateProductInput {
            name: input.name.unwrap_or(existing.name),
            category: input.category.unwrap_or(existing.category),
            quantity: input.quantity.unwrap_or(existing.quantity),
            min_stock_level: input.min_stock_level.unwrap_or(existing.min_stock_level),
            cost_price: input.cost_price.unwrap_or(existing.cost_price),
            selling_price: input.selling_price.unwrap_or(existing.selling_price),
            supplier_id: input
                .supplier_id
                .unwrap_or(existing.supplier.map(|s| s.id)),
            image_url: input.image_url.unwrap_or(existing.image_url),
        };

        self.update(product_id, merged).await
    }

    /// Delete a product
    ///
    /// The store cascades the delete to the product's stock movements.
    pub async fn delete(&self, product_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    async fn validate(&self, input: &CreateProductInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name cannot be empty".to_string(),
            });
        }

        if let Some(supplier_id) = input.supplier_id {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM suppliers WHERE id = $1",
            )
            .bind(supplier_id)
            .fetch_one(&self.db)
            .await?;

            if exists == 0 {
                return Err(AppError::Validation {
                    field: "supplier_id".to_string(),
                    message: format!("Invalid supplier id {}", supplier_id),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_input_omitted_fields_stay_untouched() {
        let input: UpdateProductInput = serde_json::from_str(r#"{"quantity": 9}"#).unwrap();

        assert_eq!(input.quantity, Some(9));
        assert!(input.supplier_id.is_none());
        assert!(input.category.is_none());
        assert!(input.image_url.is_none());
    }

    #[test]
    fn test_patch_input_explicit_null_clears_nullable_fields() {
        let input: UpdateProductInput =
            serde_json::from_str(r#"{"supplier_id": null, "category": null}"#).unwrap();

        assert_eq!(input.supplier_id, Some(None));
        assert_eq!(input.category, Some(None));
        // Untouched, not cleared
        assert!(input.image_url.is_none());
    }

    #[test]
    fn test_patch_input_value_replaces_nullable_fields() {
        let input: UpdateProductInput =
            serde_json::from_str(r#"{"supplier_id": 4, "category": "coffee"}"#).unwrap();

        assert_eq!(input.supplier_id, Some(Some(4)));
        assert_eq!(input.category, Some(Some("coffee".to_string())));
    }
}
