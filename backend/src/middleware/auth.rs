use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::{
    error::AppError,
    models::user::{User, UserRole},
    services::{auth::AuthService, authorization},
    state::AppState,
    utils::cookies::{extract_cookie_value, SESSION_COOKIE_NAME},
};

/// Who is making the request, resolved once from the session cookie.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<User>,
}

/// The account that passed the route's guard.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

const STAFF_ROLES: &[UserRole] = &[UserRole::User, UserRole::Admin];
const ADMIN_ROLES: &[UserRole] = &[UserRole::Admin];

/// Resolves the session cookie into a [`RequestContext`]. Never rejects; a
/// bad or missing cookie just leaves the request anonymous.
pub async fn load_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| extract_cookie_value(raw, SESSION_COOKIE_NAME));

    let user = AuthService::from_state(&state)
        .resolve_session(token.as_deref())
        .await;
    request.extensions_mut().insert(RequestContext { user });
    next.run(request).await
}

pub async fn require_login(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user = {
        let context = request.extensions().get::<RequestContext>();
        authorization::require_login(context.and_then(|c| c.user.as_ref()))?.clone()
    };
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Any logged-in USER or ADMIN.
pub async fn require_staff(request: Request, next: Next) -> Result<Response, AppError> {
    require_roles(STAFF_ROLES, request, next).await
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    require_roles(ADMIN_ROLES, request, next).await
}

async fn require_roles(
    allowed: &[UserRole],
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = {
        let context = request.extensions().get::<RequestContext>();
        authorization::require_role(context.and_then(|c| c.user.as_ref()), allowed)?.clone()
    };
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::LoginRequired)
    }
}
