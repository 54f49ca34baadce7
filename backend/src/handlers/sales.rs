use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppError,
    middleware::auth::CurrentUser,
    models::sale::{CreateSaleRequest, Sale, SaleView},
    repositories::sale::{self as sale_repo, SaleOutcome},
    state::AppState,
};

pub(crate) const AMOUNT_TOO_LARGE: &str = "Amount too large";

pub async fn create_sale(
    State(state): State<AppState>,
    CurrentUser(seller): CurrentUser,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    payload.validate()?;

    let outcome = sale_repo::record_sale(
        &state.pool,
        payload.product_id,
        payload.quantity,
        seller.id,
        state.clock.now(),
    )
    .await?;

    match outcome {
        SaleOutcome::Recorded(sale) => {
            tracing::info!(
                sale_id = %sale.id,
                product_id = %sale.product_id,
                quantity = sale.quantity,
                "sale recorded"
            );
            Ok((StatusCode::CREATED, Json(sale)))
        }
        SaleOutcome::ProductNotFound => Err(AppError::NotFound("Product not found".to_string())),
        SaleOutcome::InsufficientStock { available } => {
            tracing::debug!(
                product_id = %payload.product_id,
                requested = payload.quantity,
                available,
                "sale refused"
            );
            Err(AppError::Conflict("Insufficient stock".to_string()))
        }
        SaleOutcome::AmountTooLarge => Err(AppError::BadRequest(AMOUNT_TOO_LARGE.to_string())),
    }
}

pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<SaleView>>, AppError> {
    Ok(Json(sale_repo::list_sales(&state.pool).await?))
}

pub async fn my_sales(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SaleView>>, AppError> {
    Ok(Json(sale_repo::list_sales_by_user(&state.pool, user.id).await?))
}
