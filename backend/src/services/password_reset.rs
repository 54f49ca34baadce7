//! Forgotten-password flow built on stateless signed links.
//!
//! Nothing is stored per request: the link itself proves which account it is
//! for and when it was minted. It stays usable until it ages out.

use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use url::Url;
use validator::Validate;

use crate::{
    db::connection::DbPool,
    error::AppError,
    models::{password_reset::ResetPasswordRequest, user::normalize_email},
    repositories::user as user_repo,
    services::notification::NotificationDispatcher,
    state::AppState,
    types::UserId,
    utils::{password::hash_password, signed_token::SignedTokenCodec, time::Clock},
};

#[derive(Clone)]
pub struct PasswordResetService {
    pool: DbPool,
    tokens: SignedTokenCodec,
    notifications: NotificationDispatcher,
    base_url: String,
    max_age: Duration,
    clock: Arc<dyn Clock>,
}

impl PasswordResetService {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            tokens: state.reset_tokens.clone(),
            notifications: NotificationDispatcher::new(state.mailer.clone()),
            base_url: state.config.app_base_url.clone(),
            max_age: state.reset_token_max_age(),
            clock: state.clock.clone(),
        }
    }

    /// Sends a reset link when `email` belongs to an account. Returns nothing
    /// either way so callers cannot tell the difference.
    pub async fn request_reset(&self, email: &str) {
        let email = normalize_email(email);
        if email.is_empty() {
            return;
        }

        let user = match user_repo::find_by_email(&self.pool, &email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!("password reset requested for unknown address");
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "password reset lookup failed");
                return;
            }
        };

        let link = self
            .tokens
            .issue(user.id)
            .and_then(|token| reset_link(&self.base_url, &token));
        match link {
            Ok(url) => {
                self.notifications
                    .send_password_reset(&user.email, &url, self.max_age)
                    .await
            }
            Err(err) => tracing::error!(user_id = %user.id, error = %err, "could not build reset link"),
        }
    }

    /// Tells whether `token` is still good enough to show the reset form.
    pub fn check_token(&self, token: &str) -> Result<UserId, AppError> {
        self.tokens
            .verify(token, self.max_age)
            .ok_or(AppError::InvalidResetLink)
    }

    pub async fn complete_reset(
        &self,
        token: &str,
        request: ResetPasswordRequest,
    ) -> Result<(), AppError> {
        let user_id = self.check_token(token)?;
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let updated =
            user_repo::update_password(&self.pool, user_id, &password_hash, self.clock.now())
                .await?;
        if !updated {
            return Err(AppError::InvalidResetLink);
        }
        tracing::info!(user_id = %user_id, "password reset completed");
        Ok(())
    }
}

/// `{base}/validate/reset/{token}`, keeping any path prefix on `base`.
pub fn reset_link(base: &str, token: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("APP_BASE_URL cannot carry a path: {}", base))?
        .pop_if_empty()
        .extend(["validate", "reset", token]);
    Ok(url)
}
