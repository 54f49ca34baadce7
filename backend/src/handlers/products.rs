use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::product::{Product, ProductPayload},
    repositories::product as product_repo,
    state::AppState,
    types::ProductId,
};

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(product_repo::list_products(&state.pool).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    product_repo::find_product(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(product_not_found)
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let product = product_repo::insert_product(&state.pool, &payload, state.clock.now())
        .await
        .map_err(map_name_conflict)?;
    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    product_repo::update_product(&state.pool, id, &payload, state.clock.now())
        .await
        .map_err(map_name_conflict)?
        .map(Json)
        .ok_or_else(product_not_found)
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    match product_repo::delete_product(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(product_id = %id, "product deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(product_not_found()),
        Err(err) if is_foreign_key_violation(&err) => Err(AppError::Conflict(
            "Product has recorded sales or purchases".to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn map_name_conflict(err: sqlx::Error) -> AppError {
    let duplicate = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());
    if duplicate {
        AppError::Conflict("A product with that name already exists".to_string())
    } else {
        err.into()
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
