use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::ProductId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub quantity_sold: i64,
}

/// Daily figures for the admin dashboard. `date` is the local calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub sales_total_cents: i64,
    pub sales_count: i64,
    pub purchases_total_cents: i64,
    pub top_products: Vec<TopProduct>,
}
