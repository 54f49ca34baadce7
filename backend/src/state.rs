use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    db::connection::DbPool,
    utils::{
        cookies::CookieOptions,
        email::Mailer,
        signed_token::{SignedTokenCodec, SESSION_TOKEN_SALT},
        time::Clock,
    },
};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub sessions: SignedTokenCodec,
    pub reset_tokens: SignedTokenCodec,
    pub mailer: Arc<dyn Mailer>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        config: Config,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sessions = SignedTokenCodec::new(&config.secret_key, SESSION_TOKEN_SALT, clock.clone());
        let reset_tokens =
            SignedTokenCodec::new(&config.secret_key, &config.reset_token_salt, clock.clone());
        Self {
            pool,
            config: Arc::new(config),
            sessions,
            reset_tokens,
            mailer,
            clock,
        }
    }

    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            secure: self.config.cookie_secure,
            same_site: self.config.cookie_same_site,
        }
    }

    pub fn session_max_age(&self) -> Duration {
        Duration::from_secs(self.config.session_max_age_secs())
    }

    pub fn reset_token_max_age(&self) -> Duration {
        Duration::from_secs(self.config.reset_token_max_age_secs)
    }
}
