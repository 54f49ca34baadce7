use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::AppError,
    middleware::auth::CurrentUser,
    models::{
        password_reset::MessageResponse,
        user::{LoginRequest, RegisterRequest, UserResponse},
    },
    services::auth::AuthService,
    state::AppState,
    utils::cookies::{build_clear_session_cookie, build_session_cookie},
};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::from_state(&state).register(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let session = AuthService::from_state(&state).login(payload).await?;
    let cookie = build_session_cookie(
        &session.token,
        state.session_max_age(),
        state.cookie_options(),
    );

    let mut response = Json(LoginResponse {
        user: UserResponse::from(session.user),
    })
    .into_response();
    set_cookie(&mut response, &cookie)?;
    Ok(response)
}

/// Always succeeds, with or without a session.
pub async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    let cookie = build_clear_session_cookie(state.cookie_options());
    let mut response = Json(MessageResponse::new("Logged out")).into_response();
    set_cookie(&mut response, &cookie)?;
    Ok(response)
}

pub async fn profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

fn set_cookie(response: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("invalid cookie: {}", e)))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}
