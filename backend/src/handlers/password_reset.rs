use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    error::AppError,
    models::password_reset::{
        ForgotPasswordRequest, MessageResponse, ResetPasswordRequest, RESET_REQUESTED_MESSAGE,
    },
    services::password_reset::PasswordResetService,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ResetLinkStatus {
    pub valid: bool,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Json<MessageResponse> {
    PasswordResetService::from_state(&state)
        .request_reset(&payload.email)
        .await;
    Json(MessageResponse::new(RESET_REQUESTED_MESSAGE))
}

pub async fn check_reset_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ResetLinkStatus>, AppError> {
    PasswordResetService::from_state(&state).check_token(&token)?;
    Ok(Json(ResetLinkStatus { valid: true }))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    PasswordResetService::from_state(&state)
        .complete_reset(&token, payload)
        .await?;
    Ok(Json(MessageResponse::new(
        "Your password has been updated. You can log in now.",
    )))
}
