//! Product models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Supplier;

/// A tracked product
///
/// `quantity` is an independently writable field; it is not derived from the
/// stock-movement log. Callers that record movements are responsible for
/// keeping the two consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    /// Current quantity on hand. May go negative.
    pub quantity: i32,
    /// Threshold at or below which the product counts as low stock
    pub min_stock_level: i32,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    /// Nested supplier on read; writes reference a supplier by id instead
    pub supplier: Option<Supplier>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is at or below its minimum stock level
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock_level
    }
}
