//! Supplier models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supplier that products can be sourced from
///
/// Owns zero or more products. Deleting a supplier keeps its products and
/// clears their supplier reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
