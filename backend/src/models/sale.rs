use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{ProductId, SaleId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Product price at the moment of sale.
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Sale joined with the product name and the seller's username, as listed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SaleView {
    pub id: SaleId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSaleRequest {
    pub product_id: ProductId,
    #[validate(range(min = 1, max = 1_000_000, message = "Quantity must be between 1 and 1000000"))]
    pub quantity: i64,
}
