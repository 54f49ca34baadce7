use chrono::{DateTime, Utc};

use crate::{
    db::connection::DbPool,
    models::{
        product::MAX_STOCK,
        purchase::{CreatePurchaseRequest, Purchase, PurchaseView},
    },
    types::UserId,
};

const PURCHASE_VIEW_QUERY: &str = "SELECT s.id, s.product_id, p.name AS product_name, s.quantity, \
     s.unit_price_cents, s.total_cents, u.username AS created_by, s.purchase_date \
     FROM purchases AS s \
     JOIN products AS p ON s.product_id = p.id \
     LEFT JOIN users AS u ON s.created_by = u.id";

#[derive(Debug)]
pub enum PurchaseOutcome {
    Recorded(Purchase),
    ProductNotFound,
    /// The total overflows, or the new stock level would pass `MAX_STOCK`.
    AmountTooLarge,
}

/// Adds the bought units to stock and records the purchase atomically.
pub async fn record_purchase(
    pool: &DbPool,
    request: &CreatePurchaseRequest,
    buyer: UserId,
    now: DateTime<Utc>,
) -> Result<PurchaseOutcome, sqlx::Error> {
    let Some(total_cents) = request.unit_price_cents.checked_mul(request.quantity) else {
        return Ok(PurchaseOutcome::AmountTooLarge);
    };

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE products SET stock = stock + ?1, updated_at = ?2 \
         WHERE id = ?3 AND stock <= ?4 - ?1",
    )
    .bind(request.quantity)
    .bind(now)
    .bind(request.product_id)
    .bind(MAX_STOCK)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?")
            .bind(request.product_id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.rollback().await?;
        return Ok(match exists {
            Some(_) => PurchaseOutcome::AmountTooLarge,
            None => PurchaseOutcome::ProductNotFound,
        });
    }

    let purchase = sqlx::query_as::<_, Purchase>(
        "INSERT INTO purchases (product_id, quantity, unit_price_cents, total_cents, created_by, purchase_date) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id, product_id, quantity, unit_price_cents, total_cents, created_by, purchase_date",
    )
    .bind(request.product_id)
    .bind(request.quantity)
    .bind(request.unit_price_cents)
    .bind(total_cents)
    .bind(buyer)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(PurchaseOutcome::Recorded(purchase))
}

pub async fn list_purchases(pool: &DbPool) -> Result<Vec<PurchaseView>, sqlx::Error> {
    let query = format!("{PURCHASE_VIEW_QUERY} ORDER BY s.purchase_date DESC, s.id DESC");
    sqlx::query_as::<_, PurchaseView>(&query).fetch_all(pool).await
}

pub async fn list_purchases_by_user(
    pool: &DbPool,
    user_id: UserId,
) -> Result<Vec<PurchaseView>, sqlx::Error> {
    let query = format!(
        "{PURCHASE_VIEW_QUERY} WHERE s.created_by = ? ORDER BY s.purchase_date DESC, s.id DESC"
    );
    sqlx::query_as::<_, PurchaseView>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
