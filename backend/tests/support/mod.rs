#![allow(dead_code)]
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use stockbook_backend::{
    config::Config,
    db::connection::run_migrations,
    models::user::{User, UserRole, UserStatus},
    repositories::user::{self as user_repo, NewUser},
    routes,
    state::AppState,
    utils::{
        cookies::SameSite,
        email::Mailer,
        password::hash_password,
        time::{Clock, ManualClock},
    },
};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "a_secure_token_that_is_long_enough_123";
pub const DEFAULT_PASSWORD: &str = "secret123";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        secret_key: TEST_SECRET.into(),
        reset_token_salt: "pwd-reset".into(),
        reset_token_max_age_secs: 3600,
        session_lifetime_days: 7,
        cookie_secure: false,
        cookie_same_site: SameSite::Lax,
        app_base_url: "http://localhost:5000".into(),
        host: "127.0.0.1".into(),
        port: 5000,
        time_zone: chrono_tz::UTC,
        smtp: None,
    }
}

/// Single-connection in-memory database; the connection never recycles so
/// the schema lives as long as the pool.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("parse sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("connect in-memory sqlite");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Captures outgoing mail; can be told to fail every send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("lock mailer").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.sent.lock().expect("lock mailer").push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.fail {
            anyhow::bail!("smtp unavailable");
        }
        Ok(())
    }
}

pub struct TestApp {
    pub pool: SqlitePool,
    pub state: AppState,
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_mailer(RecordingMailer::default()).await
    }

    pub async fn with_mailer(mailer: RecordingMailer) -> Self {
        let pool = test_pool().await;
        let mailer = Arc::new(mailer);
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(),
        ));
        let state = AppState::new(
            pool.clone(),
            test_config(),
            mailer.clone(),
            clock.clone() as Arc<dyn Clock>,
        );
        let router = routes::router(state.clone());
        Self {
            pool,
            state,
            router,
            mailer,
            clock,
        }
    }

    pub async fn call(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router call")
    }

    /// Logs in through the API and returns the `session=...` cookie pair.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .call(json_request(
                "POST",
                "/auth/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login for {username} failed");
        session_cookie_pair(&response).expect("session cookie")
    }

    pub async fn seed_user(&self, username: &str, role: UserRole) -> User {
        seed_user(&self.pool, username, &format!("{username}@x.com"), role).await
    }

    pub async fn seed_and_login(&self, username: &str, role: UserRole) -> (User, String) {
        let user = self.seed_user(username, role).await;
        let cookie = self.login(username, DEFAULT_PASSWORD).await;
        (user, cookie)
    }

    pub async fn suspend(&self, user: &User) {
        user_repo::update_status(&self.pool, user.id, UserStatus::Suspended, Utc::now())
            .await
            .expect("suspend user")
            .expect("user exists");
    }
}

pub async fn seed_user(pool: &SqlitePool, username: &str, email: &str, role: UserRole) -> User {
    let password_hash = hash_password(DEFAULT_PASSWORD).expect("hash password");
    user_repo::insert_user(
        pool,
        &NewUser {
            firstname: "Test",
            lastname: "User",
            email,
            username,
            password_hash: &password_hash,
            role,
        },
        Utc::now(),
    )
    .await
    .expect("insert user")
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("build request")
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `name=value` part of the response's Set-Cookie, ready for a Cookie header.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    let header = set_cookie_header(response)?;
    header
        .split(';')
        .next()
        .map(str::trim)
        .filter(|pair| pair.starts_with("session=") && pair.len() > "session=".len())
        .map(str::to_string)
}

/// Pulls the token out of the reset link in a recorded mail body.
pub fn reset_token_from_body(body: &str) -> Option<String> {
    let marker = "/validate/reset/";
    let start = body.find(marker)? + marker.len();
    let token: String = body[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    Some(token).filter(|t| !t.is_empty())
}
