use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{ProductId, PurchaseId, UserId};

/// Stock bought in from a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    pub id: PurchaseId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub created_by: UserId,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseView {
    pub id: PurchaseId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub created_by: Option<String>,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePurchaseRequest {
    pub product_id: ProductId,
    #[validate(range(min = 1, max = 1_000_000, message = "Quantity must be between 1 and 1000000"))]
    pub quantity: i64,
    #[validate(range(min = 0, max = 100_000_000_000i64, message = "Unit price must be between 0 and 100000000000 cents"))]
    pub unit_price_cents: i64,
}
