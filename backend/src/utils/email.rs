use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// Outbound mail seam. Implementations report delivery failure as an error;
/// deciding whether that matters is up to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let timeout = Some(Duration::from_secs(config.timeout_secs));
        let transport = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                let creds = Credentials::new(username.clone(), password.clone());
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                    .port(config.port)
                    .credentials(creds)
                    .timeout(timeout)
                    .build()
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                .port(config.port)
                .timeout(timeout)
                .build(),
        };

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.transport.send(email).await?;
        Ok(())
    }
}

/// Stand-in used when no SMTP relay is configured. Every send fails, which
/// routes reset links to the log instead.
#[derive(Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
        anyhow::bail!("mail delivery is not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_mailer_always_fails() {
        let err = DisabledMailer
            .send("ana@x.com", "subject", "body")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[tokio::test]
    async fn smtp_mailer_builds_without_connecting() {
        let config = SmtpConfig {
            host: "localhost".into(),
            port: 2525,
            username: None,
            password: None,
            from_address: "noreply@stockbook.local".into(),
            timeout_secs: 1,
        };
        assert!(SmtpMailer::new(&config).is_ok());
    }
}
