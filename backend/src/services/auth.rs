//! Registration, login and session resolution.

use std::{sync::Arc, time::Duration};

use validator::Validate;

use crate::{
    db::connection::DbPool,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User, UserRole},
    repositories::user::{self as user_repo, NewUser, UniqueConflict},
    state::AppState,
    utils::{
        password::{hash_password, verify_against_dummy, verify_password},
        signed_token::SignedTokenCodec,
        time::Clock,
    },
};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// A freshly established login: the signed cookie value and who it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    sessions: SignedTokenCodec,
    clock: Arc<dyn Clock>,
    session_max_age: Duration,
}

impl AuthService {
    pub fn new(
        pool: DbPool,
        sessions: SignedTokenCodec,
        clock: Arc<dyn Clock>,
        session_max_age: Duration,
    ) -> Self {
        Self {
            pool,
            sessions,
            clock,
            session_max_age,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.pool.clone(),
            state.sessions.clone(),
            state.clock.clone(),
            state.session_max_age(),
        )
    }

    /// Creates a USER account. The whole row is written by one INSERT, so a
    /// rejected registration leaves nothing behind.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        let request = request.normalized();
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let new_user = NewUser {
            firstname: &request.firstname,
            lastname: &request.lastname,
            email: &request.email,
            username: &request.username,
            password_hash: &password_hash,
            role: UserRole::User,
        };

        match user_repo::insert_user(&self.pool, &new_user, self.clock.now()).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "account registered");
                Ok(user)
            }
            Err(err) => match user_repo::unique_conflict(&err) {
                Some(UniqueConflict::Username) => Err(AppError::Conflict(
                    "That username is already taken.".to_string(),
                )),
                Some(UniqueConflict::Email) => Err(AppError::Conflict(
                    "That email is already registered.".to_string(),
                )),
                Some(UniqueConflict::Other) => Err(AppError::Conflict(
                    "Registration could not be completed.".to_string(),
                )),
                None => Err(err.into()),
            },
        }
    }

    /// Checks credentials and opens a session. Unknown usernames, wrong
    /// passwords and suspended accounts all get the same answer.
    pub async fn login(&self, request: LoginRequest) -> Result<Session, AppError> {
        let request = LoginRequest {
            username: request.username.trim().to_string(),
            password: request.password,
        };
        request.validate()?;

        let Some(user) = user_repo::find_by_username(&self.pool, &request.username).await? else {
            verify_against_dummy(&request.password);
            return Err(invalid_credentials());
        };

        let matches = verify_password(&request.password, &user.password_hash).unwrap_or_else(|err| {
            tracing::warn!(user_id = %user.id, error = %err, "stored password hash unreadable");
            false
        });
        if !matches || !user.is_active() {
            return Err(invalid_credentials());
        }

        let now = self.clock.now();
        let last_login_at = match user_repo::record_login(&self.pool, user.id, now).await {
            Ok(()) => Some(now),
            Err(err) => {
                tracing::warn!(user_id = %user.id, error = %err, "failed to record last login");
                user.last_login_at
            }
        };

        let token = self.sessions.issue(user.id)?;
        let user = User {
            last_login_at,
            ..user
        };
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(Session { token, user })
    }

    /// Maps a session cookie to its account. Anything short of a fresh,
    /// authentic token pointing at an existing row counts as anonymous.
    pub async fn resolve_session(&self, token: Option<&str>) -> Option<User> {
        let user_id = self.sessions.verify(token?, self.session_max_age)?;
        match user_repo::find_by_id(&self.pool, user_id).await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "session lookup failed; treating request as anonymous");
                None
            }
        }
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
}
