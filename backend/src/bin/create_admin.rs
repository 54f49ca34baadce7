//! Operator tool: creates an ADMIN account, or promotes the account that
//! already owns the given email.
//!
//! Usage: create_admin --email <e> --username <u> --firstname <f> --lastname <l> --password <p>

use anyhow::{anyhow, bail};
use stockbook_backend::{
    config::Config,
    db::connection::{create_pool, run_migrations},
    models::user::{normalize_email, UserRole},
    repositories::user::{self as user_repo, NewUser},
    utils::password::{hash_password, meets_password_policy, MIN_PASSWORD_LENGTH},
    validation::rules::validate_email_shape,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, PartialEq, Eq)]
struct AdminOptions {
    email: String,
    username: String,
    firstname: String,
    lastname: String,
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockbook_backend=info,create_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = parse_options(std::env::args().skip(1))?;
    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let password_hash = hash_password(&options.password)?;
    let user = user_repo::upsert_by_email(
        &pool,
        &NewUser {
            firstname: &options.firstname,
            lastname: &options.lastname,
            email: &options.email,
            username: &options.username,
            password_hash: &password_hash,
            role: UserRole::Admin,
        },
        chrono::Utc::now(),
    )
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "admin account ready");
    pool.close().await;
    Ok(())
}

fn parse_options<I>(args: I) -> anyhow::Result<AdminOptions>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut email = None;
    let mut username = None;
    let mut firstname = None;
    let mut lastname = None;
    let mut password = None;

    let mut args = args.into_iter();
    while let Some(flag) = args.next() {
        let slot = match flag.as_ref() {
            "--email" => &mut email,
            "--username" => &mut username,
            "--firstname" => &mut firstname,
            "--lastname" => &mut lastname,
            "--password" => &mut password,
            other => bail!("unknown argument: {}", other),
        };
        let value = args
            .next()
            .ok_or_else(|| anyhow!("{} needs a value", flag.as_ref()))?;
        *slot = Some(value.as_ref().trim().to_string());
    }

    let required = |value: Option<String>, name: &str| -> anyhow::Result<String> {
        value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("--{} is required", name))
    };
    let options = AdminOptions {
        email: normalize_email(&required(email, "email")?),
        username: required(username, "username")?,
        firstname: required(firstname, "firstname")?,
        lastname: required(lastname, "lastname")?,
        password: required(password, "password")?,
    };

    if validate_email_shape(&options.email).is_err() {
        bail!("--email does not look like an email address");
    }
    if !meets_password_policy(&options.password) {
        bail!(
            "--password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Vec<String> {
        let mut all = vec![
            "--email", "Boss@X.com", "--username", "boss", "--firstname", "Ada",
            "--lastname", "King",
        ];
        all.extend_from_slice(extra);
        all.into_iter().map(String::from).collect()
    }

    #[test]
    fn parses_complete_arguments() {
        let options = parse_options(args(&["--password", "admin1234"])).unwrap();
        assert_eq!(options.email, "boss@x.com");
        assert_eq!(options.username, "boss");
        assert_eq!(options.password, "admin1234");
    }

    #[test]
    fn rejects_missing_or_short_password() {
        assert!(parse_options(args(&[])).is_err());
        assert!(parse_options(args(&["--password", "short"])).is_err());
    }

    #[test]
    fn rejects_unknown_flags_and_dangling_values() {
        assert!(parse_options(args(&["--password", "admin1234", "--role", "x"])).is_err());
        assert!(parse_options(args(&["--password"])).is_err());
    }
}
