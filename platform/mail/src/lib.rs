//! Outbound mail over an authenticated STARTTLS relay.
//!
//! Delivery is advisory: [`Mailer::send`] swallows every failure after
//! logging it, so callers can fire and move on.

use std::time::Duration;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            timeout: Duration::from_secs(15),
        }
    }
}

impl MailConfig {
    fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|v| !v.trim().is_empty())?;
        let password = self.password.as_deref().filter(|v| !v.is_empty())?;
        Some((username, password))
    }
}

#[derive(Clone, Debug)]
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    /// Sends one plain-text message. Never fails; without credentials it
    /// does nothing at all.
    #[instrument(name = "mail.send", skip_all)]
    pub async fn send(&self, to: &str, subject: &str, body: &str) {
        let Some((username, password)) = self.config.credentials() else {
            debug!("mail credentials not set; skipping delivery");
            return;
        };
        match self.deliver(username, password, to, subject, body).await {
            Ok(()) => info!("welcome mail delivered"),
            Err(err) => warn!(error = %err, "mail delivery failed"),
        }
    }

    async fn deliver(
        &self,
        username: &str,
        password: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), MailError> {
        let message = Message::builder()
            .from(username.parse::<Mailbox>()?)
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(self.config.timeout))
            .build();

        transport.send(message).await?;
        Ok(())
    }
}
