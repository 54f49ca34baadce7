use chrono::{DateTime, Utc};

use crate::{
    db::connection::DbPool,
    models::product::{Product, ProductPayload},
    types::ProductId,
};

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, stock, created_at, updated_at";

pub async fn list_products(pool: &DbPool) -> Result<Vec<Product>, sqlx::Error> {
    let query = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
    sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
}

pub async fn find_product(pool: &DbPool, id: ProductId) -> Result<Option<Product>, sqlx::Error> {
    let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
    sqlx::query_as::<_, Product>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_product(
    pool: &DbPool,
    payload: &ProductPayload,
    now: DateTime<Utc>,
) -> Result<Product, sqlx::Error> {
    let query = format!(
        "INSERT INTO products (name, description, price_cents, stock, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as::<_, Product>(&query)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price_cents)
        .bind(payload.stock)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub async fn update_product(
    pool: &DbPool,
    id: ProductId,
    payload: &ProductPayload,
    now: DateTime<Utc>,
) -> Result<Option<Product>, sqlx::Error> {
    let query = format!(
        "UPDATE products SET name = ?, description = ?, price_cents = ?, stock = ?, \
         updated_at = ? WHERE id = ? RETURNING {PRODUCT_COLUMNS}"
    );
    sqlx::query_as::<_, Product>(&query)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price_cents)
        .bind(payload.stock)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns `false` when no row has that id.
pub async fn delete_product(pool: &DbPool, id: ProductId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
