use chrono::{DateTime, Utc};

use crate::{
    db::connection::DbPool,
    models::sale::{Sale, SaleView},
    types::{ProductId, UserId},
};

#[derive(Debug)]
pub enum SaleOutcome {
    Recorded(Sale),
    ProductNotFound,
    InsufficientStock { available: i64 },
    /// `quantity * unit price` does not fit in an `i64`.
    AmountTooLarge,
}

const SALE_VIEW_QUERY: &str = "SELECT s.id, s.product_id, p.name AS product_name, s.quantity, \
     s.unit_price_cents, s.total_cents, u.username AS created_by, s.created_at \
     FROM sales AS s \
     JOIN products AS p ON s.product_id = p.id \
     LEFT JOIN users AS u ON s.created_by = u.id";

/// Decrements stock and records the sale in one transaction. The decrement
/// is conditional on enough stock being on hand, so two concurrent sales can
/// never drive stock negative; when it does not apply nothing is written.
pub async fn record_sale(
    pool: &DbPool,
    product_id: ProductId,
    quantity: i64,
    seller: UserId,
    now: DateTime<Utc>,
) -> Result<SaleOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let unit_price: Option<i64> = sqlx::query_scalar(
        "UPDATE products SET stock = stock - ?1, updated_at = ?3 \
         WHERE id = ?2 AND stock >= ?1 RETURNING price_cents",
    )
    .bind(quantity)
    .bind(product_id)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(unit_price_cents) = unit_price else {
        let available: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.rollback().await?;
        return Ok(match available {
            Some(available) => SaleOutcome::InsufficientStock { available },
            None => SaleOutcome::ProductNotFound,
        });
    };

    let Some(total_cents) = unit_price_cents.checked_mul(quantity) else {
        tx.rollback().await?;
        return Ok(SaleOutcome::AmountTooLarge);
    };

    let sale = sqlx::query_as::<_, Sale>(
        "INSERT INTO sales (product_id, quantity, unit_price_cents, total_cents, created_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id, product_id, quantity, unit_price_cents, total_cents, created_by, created_at",
    )
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price_cents)
    .bind(total_cents)
    .bind(seller)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(SaleOutcome::Recorded(sale))
}

pub async fn list_sales(pool: &DbPool) -> Result<Vec<SaleView>, sqlx::Error> {
    let query = format!("{SALE_VIEW_QUERY} ORDER BY s.created_at DESC, s.id DESC");
    sqlx::query_as::<_, SaleView>(&query).fetch_all(pool).await
}

pub async fn list_sales_by_user(pool: &DbPool, user_id: UserId) -> Result<Vec<SaleView>, sqlx::Error> {
    let query =
        format!("{SALE_VIEW_QUERY} WHERE s.created_by = ? ORDER BY s.created_at DESC, s.id DESC");
    sqlx::query_as::<_, SaleView>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
