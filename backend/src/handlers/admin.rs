//! Account administration for ADMIN users.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppError,
    middleware::auth::CurrentUser,
    models::user::{UpdateRoleRequest, UpdateStatusRequest, UserResponse, UserRole, UserStatus},
    repositories::user as user_repo,
    state::AppState,
    types::UserId,
};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_repo::list_users(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn update_role(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if user_id == admin.id && payload.role != UserRole::Admin {
        return Err(AppError::BadRequest(
            "You cannot remove your own admin role".to_string(),
        ));
    }

    let user = user_repo::update_role(&state.pool, user_id, payload.role, state.clock.now())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    tracing::info!(
        admin_id = %admin.id,
        user_id = %user.id,
        role = user.role.as_str(),
        "user role changed"
    );
    Ok(Json(UserResponse::from(user)))
}

pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if user_id == admin.id && payload.status != UserStatus::Active {
        return Err(AppError::BadRequest(
            "You cannot suspend your own account".to_string(),
        ));
    }

    let user = user_repo::update_status(&state.pool, user_id, payload.status, state.clock.now())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    tracing::info!(
        admin_id = %admin.id,
        user_id = %user.id,
        status = user.status.as_str(),
        "user status changed"
    );
    Ok(Json(UserResponse::from(user)))
}
