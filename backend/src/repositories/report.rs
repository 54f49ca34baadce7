use chrono::{DateTime, Utc};

use crate::{db::connection::DbPool, models::report::TopProduct};

const TOP_PRODUCTS_LIMIT: i64 = 5;

/// Sum and count of sales with `created_at` in `[from, to)`.
pub async fn sales_totals(
    pool: &DbPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT COALESCE(SUM(total_cents), 0), COUNT(*) FROM sales \
         WHERE created_at >= ? AND created_at < ?",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await
}

pub async fn purchases_total(
    pool: &DbPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_cents), 0) FROM purchases \
         WHERE purchase_date >= ? AND purchase_date < ?",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await
}

/// Best sellers of all time by units sold; ties broken by name.
pub async fn top_products(pool: &DbPool) -> Result<Vec<TopProduct>, sqlx::Error> {
    sqlx::query_as::<_, TopProduct>(
        "SELECT p.id AS product_id, p.name AS name, SUM(s.quantity) AS quantity_sold \
         FROM sales AS s JOIN products AS p ON p.id = s.product_id \
         GROUP BY p.id, p.name \
         ORDER BY quantity_sold DESC, p.name ASC \
         LIMIT ?",
    )
    .bind(TOP_PRODUCTS_LIMIT)
    .fetch_all(pool)
    .await
}
