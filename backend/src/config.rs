use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

use crate::utils::cookies::SameSite;

/// Upper bound for how long a session cookie may live.
pub const MAX_SESSION_LIFETIME_DAYS: u64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub reset_token_salt: String,
    pub reset_token_max_age_secs: u64,
    pub session_lifetime_days: u64,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    pub app_base_url: String,
    pub host: String,
    pub port: u16,
    pub time_zone: Tz,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://stockbook.db?mode=rwc".to_string());

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("SECRET_KEY not set; falling back to an insecure development key");
            "dev".to_string()
        });

        let reset_token_salt =
            env::var("RESET_TOKEN_SALT").unwrap_or_else(|_| "pwd-reset".to_string());

        let reset_token_max_age_secs = env::var("RESET_TOKEN_MAX_AGE_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        let session_lifetime_days = env::var("SESSION_LIFETIME_DAYS")
            .unwrap_or_else(|_| MAX_SESSION_LIFETIME_DAYS.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_SESSION_LIFETIME_DAYS)
            .clamp(1, MAX_SESSION_LIFETIME_DAYS);

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let cookie_same_site = match env::var("COOKIE_SAMESITE") {
            Ok(raw) => raw.parse::<SameSite>()?,
            Err(_) => SameSite::Lax,
        };

        let app_base_url =
            env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .unwrap_or(5000);

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => Some(SmtpConfig {
                host,
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .unwrap_or(587),
                username: env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty()),
                password: env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty()),
                from_address: env::var("SMTP_FROM_ADDRESS")
                    .unwrap_or_else(|_| "noreply@stockbook.local".to_string()),
                timeout_secs: env::var("SMTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            secret_key,
            reset_token_salt,
            reset_token_max_age_secs,
            session_lifetime_days,
            cookie_secure,
            cookie_same_site,
            app_base_url,
            host,
            port,
            time_zone,
            smtp,
        })
    }

    pub fn session_max_age_secs(&self) -> u64 {
        self.session_lifetime_days.min(MAX_SESSION_LIFETIME_DAYS) * 24 * 60 * 60
    }
}
