//! Credential store: account rows and the queries that touch them.

use chrono::{DateTime, Utc};

use crate::{
    db::connection::DbPool,
    models::user::{User, UserRole, UserStatus},
    types::UserId,
};

const USER_COLUMNS: &str = "id, firstname, lastname, email, username, password_hash, role, \
     status, last_login_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: UserRole,
}

/// Which unique column an insert collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConflict {
    Username,
    Email,
    Other,
}

/// Classifies a unique-constraint failure by the column named in the
/// driver's message. Returns `None` for any other kind of error.
pub fn unique_conflict(err: &sqlx::Error) -> Option<UniqueConflict> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }
    let message = db_err.message();
    Some(if message.contains("users.username") {
        UniqueConflict::Username
    } else if message.contains("users.email") {
        UniqueConflict::Email
    } else {
        UniqueConflict::Other
    })
}

pub async fn insert_user(
    pool: &DbPool,
    user: &NewUser<'_>,
    now: DateTime<Utc>,
) -> Result<User, sqlx::Error> {
    let query = format!(
        "INSERT INTO users (firstname, lastname, email, username, password_hash, role, status, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&query)
        .bind(user.firstname)
        .bind(user.lastname)
        .bind(user.email)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(UserStatus::Active)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
}

/// Creates the account, or refreshes the one already holding `email` with the
/// given names, password and role. The account comes out ACTIVE either way.
pub async fn upsert_by_email(
    pool: &DbPool,
    user: &NewUser<'_>,
    now: DateTime<Utc>,
) -> Result<User, sqlx::Error> {
    let query = format!(
        "INSERT INTO users (firstname, lastname, email, username, password_hash, role, status, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT (email) DO UPDATE SET firstname = excluded.firstname, \
         lastname = excluded.lastname, username = excluded.username, \
         password_hash = excluded.password_hash, role = excluded.role, \
         status = excluded.status, updated_at = excluded.updated_at RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&query)
        .bind(user.firstname)
        .bind(user.lastname)
        .bind(user.email)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(UserStatus::Active)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
}

/// Case-insensitive: the column is declared `COLLATE NOCASE`.
pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
    sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &DbPool, id: UserId) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_users(pool: &DbPool) -> Result<Vec<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
    sqlx::query_as::<_, User>(&query).fetch_all(pool).await
}

/// Returns `false` when no row has that id.
pub async fn update_password(
    pool: &DbPool,
    id: UserId,
    password_hash: &str,
    now: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn record_login(pool: &DbPool, id: UserId, now: DateTime<Utc>) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .map(|_| ())
}

pub async fn update_role(
    pool: &DbPool,
    id: UserId,
    role: UserRole,
    now: DateTime<Utc>,
) -> Result<Option<User>, sqlx::Error> {
    let query =
        format!("UPDATE users SET role = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}");
    sqlx::query_as::<_, User>(&query)
        .bind(role)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_status(
    pool: &DbPool,
    id: UserId,
    status: UserStatus,
    now: DateTime<Utc>,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        "UPDATE users SET status = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&query)
        .bind(status)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
}
