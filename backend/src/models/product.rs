//! Catalogue entries and the payloads that create or change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::ProductId;

/// Largest unit count a product may hold.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Largest price accepted for a single unit.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Largest quantity a single sale or purchase may move.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    /// Units on hand. Never negative.
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 120, message = "Product name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description is too long"))]
    pub description: String,
    #[validate(range(min = 0, max = 100_000_000_000i64, message = "Price must be between 0 and 100000000000 cents"))]
    pub price_cents: i64,
    #[serde(default)]
    #[validate(range(min = 0, max = 1_000_000_000, message = "Stock must be between 0 and 1000000000"))]
    pub stock: i64,
}

impl ProductPayload {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_rejects_negative_amounts() {
        let payload = ProductPayload {
            name: "Yerba".into(),
            description: String::new(),
            price_cents: -1,
            stock: -5,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price_cents"));
        assert!(fields.contains_key("stock"));
    }

    #[test]
    fn description_and_stock_default_when_omitted() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"name":" Yerba ","price_cents":1500}"#).unwrap();
        let payload = payload.normalized();
        assert_eq!(payload.name, "Yerba");
        assert_eq!(payload.description, "");
        assert_eq!(payload.stock, 0);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn payload_caps_price_and_stock() {
        let at_limit = ProductPayload {
            name: "Yerba".into(),
            description: String::new(),
            price_cents: MAX_PRICE_CENTS,
            stock: MAX_STOCK,
        };
        assert!(at_limit.validate().is_ok());

        let over = ProductPayload {
            price_cents: MAX_PRICE_CENTS + 1,
            stock: MAX_STOCK + 1,
            ..at_limit
        };
        let errors = over.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price_cents"));
        assert!(fields.contains_key("stock"));
    }
}
