//! Stock movement models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// Why a stock movement happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementReason {
    Add,
    Remove,
    Sale,
    Restock,
    Adjust,
}

impl MovementReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementReason::Add => "add",
            MovementReason::Remove => "remove",
            MovementReason::Sale => "sale",
            MovementReason::Restock => "restock",
            MovementReason::Adjust => "adjust",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "add" => Some(MovementReason::Add),
            "remove" => Some(MovementReason::Remove),
            "sale" => Some(MovementReason::Sale),
            "restock" => Some(MovementReason::Restock),
            "adjust" => Some(MovementReason::Adjust),
            _ => None,
        }
    }
}

/// A single recorded change to a product's quantity
///
/// Movements form an append-only audit trail. Deleting a product deletes its
/// movements; deleting the creating user keeps the movement and clears
/// `created_by`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    /// Nested product on read; writes reference a product by id instead
    pub product: Product,
    /// Positive to add stock, negative to remove
    pub change: i32,
    pub reason: MovementReason,
    pub note: Option<String>,
    /// User id of the authenticated creator, stamped server-side
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_round_trip() {
        for reason in [
            MovementReason::Add,
            MovementReason::Remove,
            MovementReason::Sale,
            MovementReason::Restock,
            MovementReason::Adjust,
        ] {
            assert_eq!(MovementReason::parse(reason.as_str()), Some(reason));
        }
    }

    #[test]
    fn test_reason_rejects_unknown() {
        assert_eq!(MovementReason::parse("transfer"), None);
        assert_eq!(MovementReason::parse("Sale"), None);
        assert_eq!(MovementReason::parse(""), None);
    }

    #[test]
    fn test_reason_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&MovementReason::Restock).unwrap(),
            "\"restock\""
        );
        let parsed: MovementReason = serde_json::from_str("\"adjust\"").unwrap();
        assert_eq!(parsed, MovementReason::Adjust);
    }
}
