//! Business logic services for the Inventory Tracker backend

use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod product;
pub mod report;
pub mod stock_movement;
pub mod supplier;
pub mod user;

/// Deserializer for nullable PATCH fields
///
/// Paired with `#[serde(default)]` on an `Option<Option<T>>` field: an
/// omitted field stays `None` (leave untouched), an explicit `null` becomes
/// `Some(None)` (clear the stored value), and a value becomes
/// `Some(Some(v))`.
pub(crate) fn patch_field<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub use auth::AuthService;
pub use product::ProductService;
pub use report::ReportService;
pub use stock_movement::StockMovementService;
pub use supplier::SupplierService;
pub use user::UserService;
