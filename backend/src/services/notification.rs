use std::{sync::Arc, time::Duration};

use url::Url;

use crate::utils::email::Mailer;

pub const PASSWORD_RESET_SUBJECT: &str = "Reset your password";

/// Sends user-facing mail. Delivery problems never reach the caller; they are
/// logged together with anything the user would have needed from the message.
#[derive(Clone)]
pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
}

impl NotificationDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub async fn send_password_reset(&self, to: &str, reset_url: &Url, valid_for: Duration) {
        let body = password_reset_body(reset_url, valid_for);
        match self.mailer.send(to, PASSWORD_RESET_SUBJECT, &body).await {
            Ok(()) => tracing::info!("password reset mail dispatched"),
            Err(err) => tracing::warn!(
                error = %err,
                reset_url = %reset_url,
                "password reset mail not delivered; link logged instead"
            ),
        }
    }
}

fn password_reset_body(reset_url: &Url, valid_for: Duration) -> String {
    format!(
        "To reset your password, follow this link: {}\n\nThis link expires in {}.",
        reset_url,
        describe_duration(valid_for)
    )
}

fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        3600 => "1 hour".to_string(),
        s if s % 3600 == 0 => format!("{} hours", s / 3600),
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}
