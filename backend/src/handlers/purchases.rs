use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppError,
    middleware::auth::CurrentUser,
    models::purchase::{CreatePurchaseRequest, Purchase, PurchaseView},
    handlers::sales::AMOUNT_TOO_LARGE,
    repositories::purchase::{self as purchase_repo, PurchaseOutcome},
    state::AppState,
};

pub async fn create_purchase(
    State(state): State<AppState>,
    CurrentUser(buyer): CurrentUser,
    Json(payload): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<Purchase>), AppError> {
    payload.validate()?;

    let outcome =
        purchase_repo::record_purchase(&state.pool, &payload, buyer.id, state.clock.now()).await?;
    let purchase = match outcome {
        PurchaseOutcome::Recorded(purchase) => purchase,
        PurchaseOutcome::ProductNotFound => {
            return Err(AppError::NotFound("Product not found".to_string()))
        }
        PurchaseOutcome::AmountTooLarge => {
            return Err(AppError::BadRequest(AMOUNT_TOO_LARGE.to_string()))
        }
    };
    tracing::info!(
        purchase_id = %purchase.id,
        product_id = %purchase.product_id,
        quantity = purchase.quantity,
        "purchase recorded"
    );
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn list_purchases(
    State(state): State<AppState>,
) -> Result<Json<Vec<PurchaseView>>, AppError> {
    Ok(Json(purchase_repo::list_purchases(&state.pool).await?))
}

pub async fn my_purchases(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PurchaseView>>, AppError> {
    Ok(Json(
        purchase_repo::list_purchases_by_user(&state.pool, user.id).await?,
    ))
}
